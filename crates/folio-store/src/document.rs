//! The decoded form of a stored document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_types::{ObjectRef, StorageKey};

use crate::error::{StoreError, StoreResult};

/// A document as produced by ingestion.
///
/// Only the fields navigation needs are typed; the rest of the ingested
/// payload (sections, signatures, examples) is carried opaquely in `content`
/// for the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestedDocument {
    /// Fully qualified name of the documented object.
    pub qualname: String,
    /// Package version the document was ingested from, if recorded.
    #[serde(default)]
    pub version: Option<String>,
    /// Objects this document mentions.
    #[serde(default)]
    pub refs: Vec<ObjectRef>,
    /// Documents that mention this one. Filled from the store's index on load.
    #[serde(default)]
    pub backrefs: Vec<ObjectRef>,
    /// Remaining ingested payload.
    #[serde(default)]
    pub content: Value,
}

impl IngestedDocument {
    pub fn new(qualname: impl Into<String>) -> Self {
        Self {
            qualname: qualname.into(),
            version: None,
            refs: Vec::new(),
            backrefs: Vec::new(),
            content: Value::Null,
        }
    }

    /// Decode from stored bytes.
    pub fn decode(key: &StorageKey, data: &[u8]) -> StoreResult<Self> {
        serde_json::from_slice(data).map_err(|e| StoreError::MalformedDocument {
            key: key.clone(),
            reason: e.to_string(),
        })
    }

    /// Encode for storage. Backrefs are index-derived and not written.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        let stored = Self {
            backrefs: Vec::new(),
            ..self.clone()
        };
        serde_json::to_vec(&stored).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_minimal_document() {
        let key = ObjectRef::module("pkg", "1.0", "pkg.f");
        let doc = IngestedDocument::decode(&key, br#"{"qualname": "pkg.f"}"#).unwrap();
        assert_eq!(doc.qualname, "pkg.f");
        assert!(doc.refs.is_empty());
        assert_eq!(doc.content, Value::Null);
    }

    #[test]
    fn malformed_bytes_carry_the_key() {
        let key = ObjectRef::module("pkg", "1.0", "pkg.f");
        let err = IngestedDocument::decode(&key, b"not json").unwrap_err();
        match err {
            StoreError::MalformedDocument { key: k, .. } => assert_eq!(k, key),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_drops_backrefs() {
        let key = ObjectRef::module("pkg", "1.0", "pkg.f");
        let mut doc = IngestedDocument::new("pkg.f");
        doc.refs.push(ObjectRef::module("pkg", "1.0", "pkg.g"));
        doc.backrefs.push(ObjectRef::module("pkg", "1.0", "pkg.h"));
        let decoded = IngestedDocument::decode(&key, &doc.encode().unwrap()).unwrap();
        assert_eq!(decoded.refs, doc.refs);
        assert!(decoded.backrefs.is_empty());
    }
}
