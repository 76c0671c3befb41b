use mongobridge_query::BridgeError;

/// The one required environment variable: the MongoDB connection URI.
pub const URI_ENV: &str = "MONGODB_URI_DOCKER";

/// Immutable startup configuration, resolved once in `main` and passed down.
/// Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, BridgeError> {
        match std::env::var(URI_ENV) {
            Ok(uri) if !uri.is_empty() => Ok(Self { uri }),
            _ => Err(BridgeError::Configuration(format!("{URI_ENV} not set"))),
        }
    }
}
