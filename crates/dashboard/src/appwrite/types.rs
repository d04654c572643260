//! Appwrite REST payloads.

use serde::Deserialize;

use bazaar_core::{Store, StoreId, StoreKind, UserId};

/// A store document as stored in either store collection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDocument {
    #[serde(rename = "$id")]
    pub id: StoreId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "ownerId")]
    pub owner_id: UserId,
}

impl StoreDocument {
    /// Attach the kind implied by the collection the document came from.
    #[must_use]
    pub fn into_store(self, kind: StoreKind) -> Store {
        Store {
            id: self.id,
            kind,
            owner_id: self.owner_id,
            name: self.name,
        }
    }
}

/// A page of documents from a list call.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_document_into_store() {
        let doc: StoreDocument = serde_json::from_str(
            r#"{"$id": "s1", "$collectionId": "physicalStores", "name": "Corner Shop", "ownerId": "u1"}"#,
        )
        .unwrap();
        let store = doc.into_store(StoreKind::Physical);
        assert_eq!(store.id.as_str(), "s1");
        assert_eq!(store.owner_id.as_str(), "u1");
        assert_eq!(store.kind, StoreKind::Physical);
        assert_eq!(store.name, "Corner Shop");
    }

    #[test]
    fn test_store_document_requires_owner() {
        let result = serde_json::from_str::<StoreDocument>(r#"{"$id": "s1", "name": "Orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_document_list() {
        let list: DocumentList<StoreDocument> = serde_json::from_str(
            r#"{"total": 1, "documents": [{"$id": "s1", "ownerId": "u1"}]}"#,
        )
        .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.documents.len(), 1);
        assert_eq!(list.documents[0].name, "");
    }

    #[test]
    fn test_error_body() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message": "User (role: guests) missing scope (account)", "code": 401, "type": "general_unauthorized_scope", "version": "1.6.0"}"#,
        )
        .unwrap();
        assert_eq!(body.code, 401);
        assert_eq!(body.kind, "general_unauthorized_scope");
    }
}
