use bson::Document;
use serde::Serialize;
use serde_json::Value;

use crate::encode::encode_document;
use crate::error::BridgeError;

/// The JSON envelope written to stdout on success.
///
/// `columns` is a display hint taken from the first row only — later rows may
/// carry different fields and no schema is implied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub rows: Vec<Value>,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub execution_time: u64,
}

impl ResultEnvelope {
    /// Encode the materialized result set. `execution_time` is the elapsed
    /// milliseconds between dispatch and materialization, measured by the
    /// executor.
    pub fn from_documents(
        docs: Vec<Document>,
        execution_time: u64,
    ) -> Result<Self, BridgeError> {
        let columns = docs
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        let rows: Vec<Value> = docs
            .iter()
            .map(|row| encode_document(row).map(Value::Object))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            row_count: rows.len(),
            rows,
            columns,
            execution_time,
        })
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use bson::oid::ObjectId;

    #[test]
    fn zero_rows_gives_empty_columns() {
        let env = ResultEnvelope::from_documents(vec![], 3).unwrap();
        assert!(env.rows.is_empty());
        assert!(env.columns.is_empty());
        assert_eq!(env.row_count, 0);
        assert_eq!(env.execution_time, 3);
    }

    #[test]
    fn columns_come_from_first_row_only() {
        let env = ResultEnvelope::from_documents(
            vec![
                doc! { "_id": 1, "name": "a" },
                doc! { "name": "b", "extra": true },
            ],
            0,
        )
        .unwrap();
        assert_eq!(env.columns, ["_id", "name"]);
        assert_eq!(env.row_count, 2);
    }

    #[test]
    fn columns_preserve_first_row_key_order() {
        let env =
            ResultEnvelope::from_documents(vec![doc! { "z": 1, "a": 2, "m": 3 }], 0).unwrap();
        assert_eq!(env.columns, ["z", "a", "m"]);
    }

    #[test]
    fn row_count_matches_rows_length() {
        let docs: Vec<Document> = (0..7).map(|i| doc! { "n": i }).collect();
        let env = ResultEnvelope::from_documents(docs, 0).unwrap();
        assert_eq!(env.row_count, env.rows.len());
        assert_eq!(env.row_count, 7);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let env =
            ResultEnvelope::from_documents(vec![doc! { "_id": oid, "n": 1 }], 12).unwrap();
        let json = env.to_json().unwrap();
        assert!(json.contains("\"rowCount\":1"), "{json}");
        assert!(json.contains("\"executionTime\":12"), "{json}");
        assert!(json.contains("\"507f1f77bcf86cd799439011\""), "{json}");
    }

    #[test]
    fn native_types_in_rows_are_converted() {
        let env = ResultEnvelope::from_documents(
            vec![doc! { "when": bson::DateTime::from_millis(0) }],
            0,
        )
        .unwrap();
        assert_eq!(env.rows[0]["when"], "1970-01-01T00:00:00Z");
    }
}
