use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use crate::error::BridgeError;

/// Convert one BSON value into its JSON-safe form.
///
/// The conversion table is closed over the types result documents are
/// expected to carry:
/// - ObjectId → its 24-hex string (lowercase)
/// - DateTime → RFC 3339 string
/// - Decimal128 → nearest f64 (lossy, kept for output compatibility)
/// - Binary → lowercase hex string
/// - documents and arrays recurse
/// - JSON-native scalars pass through
///
/// Anything else (Timestamp, RegularExpression, MinKey, ...) is an encoding
/// error — the bridge would rather fail the invocation than guess at a
/// serialization no caller has agreed on.
pub fn encode_value(value: &Bson) -> Result<Value, BridgeError> {
    match value {
        Bson::ObjectId(oid) => Ok(Value::String(oid.to_hex())),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .map_err(|e| BridgeError::Encoding(format!("unrepresentable datetime: {e}"))),
        Bson::Decimal128(dec) => {
            let raw = dec.to_string();
            let parsed: f64 = raw
                .parse()
                .map_err(|_| BridgeError::Encoding(format!("unrepresentable decimal: {raw}")))?;
            Ok(float(parsed))
        }
        Bson::Binary(bin) => Ok(Value::String(lower_hex(&bin.bytes))),
        Bson::Document(doc) => encode_document(doc).map(Value::Object),
        Bson::Array(items) => items
            .iter()
            .map(encode_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Bson::String(s) => Ok(Value::String(s.clone())),
        Bson::Boolean(b) => Ok(Value::Bool(*b)),
        Bson::Null => Ok(Value::Null),
        Bson::Int32(n) => Ok(Value::Number((*n).into())),
        Bson::Int64(n) => Ok(Value::Number((*n).into())),
        Bson::Double(f) => Ok(float(*f)),
        other => Err(BridgeError::Encoding(format!(
            "unsupported BSON type: {:?}",
            other.element_type()
        ))),
    }
}

/// Encode a whole document, preserving key order.
pub fn encode_document(doc: &Document) -> Result<Map<String, Value>, BridgeError> {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc {
        map.insert(key.clone(), encode_value(value)?);
    }
    Ok(map)
}

// JSON has no NaN/Infinity; those become null rather than invalid output.
fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn lower_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
