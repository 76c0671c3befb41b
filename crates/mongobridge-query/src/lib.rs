mod encode;
mod envelope;
mod error;
mod request;
mod rewrite;

pub use encode::{encode_document, encode_value};
pub use envelope::ResultEnvelope;
pub use error::BridgeError;
pub use request::{DEFAULT_LIMIT, Mode, QueryRequest};
pub use rewrite::{rewrite_bson, rewrite_document, rewrite_pipeline};
