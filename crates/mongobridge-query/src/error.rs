/// Failure taxonomy for one bridge invocation.
///
/// Nothing is recovered locally — every variant aborts the invocation at the
/// top-level boundary, which writes the message to stderr and exits nonzero.
#[derive(Debug)]
pub enum BridgeError {
    MalformedInput(String),
    Configuration(String),
    Connection(String),
    Query(String),
    Encoding(String),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            // Configuration messages are fixed diagnostics, printed verbatim
            BridgeError::Configuration(msg) => write!(f, "{msg}"),
            BridgeError::Connection(msg) => write!(f, "connection error: {msg}"),
            BridgeError::Query(msg) => write!(f, "query error: {msg}"),
            BridgeError::Encoding(msg) => write!(f, "encoding error: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::MalformedInput(e.to_string())
    }
}
