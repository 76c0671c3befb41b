use bson::oid::ObjectId;
use bson::{Bson, Document};

/// Recursively convert ObjectId-shaped strings into real ObjectIds.
///
/// A string qualifies iff it is exactly 24 hexadecimal characters, case
/// insensitive — the grammar `ObjectId::parse_str` accepts. The bridge has no
/// schema awareness of which fields are "really" identifiers, so the
/// heuristic applies uniformly at every depth, inside arrays and nested
/// documents alike. A legitimate 24-hex string that is not an identifier will
/// be coerced; that ambiguity is a deliberate trade-off of the protocol, not
/// a bug to fix here.
pub fn rewrite_bson(value: Bson) -> Bson {
    match value {
        Bson::String(s) => match ObjectId::parse_str(&s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s),
        },
        Bson::Array(items) => Bson::Array(items.into_iter().map(rewrite_bson).collect()),
        Bson::Document(doc) => Bson::Document(rewrite_document(doc)),
        other => other,
    }
}

/// Rewrite every value of a filter (or stage) document.
pub fn rewrite_document(doc: Document) -> Document {
    doc.into_iter().map(|(k, v)| (k, rewrite_bson(v))).collect()
}

/// Rewrite every stage of an aggregation pipeline.
pub fn rewrite_pipeline(stages: Vec<Document>) -> Vec<Document> {
    stages.into_iter().map(rewrite_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    const HEX24: &str = "507f1f77bcf86cd799439011";

    #[test]
    fn hex24_string_becomes_object_id() {
        let out = rewrite_bson(Bson::String(HEX24.into()));
        match out {
            Bson::ObjectId(oid) => assert_eq!(oid.to_hex(), HEX24),
            other => panic!("expected ObjectId, got {other:?}"),
        }
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let out = rewrite_bson(Bson::String(HEX24.to_uppercase()));
        assert!(matches!(out, Bson::ObjectId(_)));
    }

    #[test]
    fn twenty_three_chars_is_untouched() {
        let s = &HEX24[..23];
        let out = rewrite_bson(Bson::String(s.into()));
        assert_eq!(out, Bson::String(s.into()));
    }

    #[test]
    fn twenty_five_chars_is_untouched() {
        let s = format!("{HEX24}a");
        let out = rewrite_bson(Bson::String(s.clone()));
        assert_eq!(out, Bson::String(s));
    }

    #[test]
    fn non_hex_char_is_untouched() {
        let s = "507f1f77bcf86cd79943901g";
        let out = rewrite_bson(Bson::String(s.into()));
        assert_eq!(out, Bson::String(s.into()));
    }

    #[test]
    fn non_string_values_pass_through() {
        assert_eq!(rewrite_bson(Bson::Int64(42)), Bson::Int64(42));
        assert_eq!(rewrite_bson(Bson::Boolean(true)), Bson::Boolean(true));
        assert_eq!(rewrite_bson(Bson::Null), Bson::Null);
        assert_eq!(rewrite_bson(Bson::Double(1.5)), Bson::Double(1.5));
    }

    #[test]
    fn rewrites_inside_arrays() {
        let doc = rewrite_document(doc! { "_id": { "$in": [HEX24, "not-an-id", HEX24] } });
        let ids = doc.get_document("_id").unwrap().get_array("$in").unwrap();
        assert!(matches!(ids[0], Bson::ObjectId(_)));
        assert_eq!(ids[1], Bson::String("not-an-id".into()));
        assert!(matches!(ids[2], Bson::ObjectId(_)));
    }

    #[test]
    fn rewrites_at_depth() {
        let doc = rewrite_document(doc! {
            "$or": [
                { "parent": { "child": HEX24 } },
                { "list": [[HEX24]] },
            ]
        });
        let branches = doc.get_array("$or").unwrap();
        let nested = branches[0]
            .as_document()
            .unwrap()
            .get_document("parent")
            .unwrap();
        assert!(matches!(nested.get("child"), Some(Bson::ObjectId(_))));
        let inner = branches[1].as_document().unwrap().get_array("list").unwrap();
        let Bson::Array(innermost) = &inner[0] else {
            panic!("expected nested array");
        };
        assert!(matches!(innermost[0], Bson::ObjectId(_)));
    }

    #[test]
    fn document_key_order_survives_rewrite() {
        let doc = rewrite_document(doc! { "b": 1, "a": HEX24, "c": 2 });
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn pipeline_stages_are_each_rewritten() {
        let stages = rewrite_pipeline(vec![
            doc! { "$match": { "owner": HEX24 } },
            doc! { "$limit": 5 },
        ]);
        let m = stages[0].get_document("$match").unwrap();
        assert!(matches!(m.get("owner"), Some(Bson::ObjectId(_))));
        assert_eq!(stages[1].get_i32("$limit").unwrap(), 5);
    }
}
