//! Document and tenant remote-coordinate models
//!
//! Serde field names (`hash`, `updatedAt`, camelCase coordinates) follow the
//! wire format expected by the companion editor client and must not change.

use serde::{Deserialize, Serialize};

/// A live text document tracked by the registry.
///
/// Identity is the relative `path`; `content` and `fingerprint` change
/// together. The registry recomputes the fingerprint when a caller passes an
/// empty one, but does not verify a caller-supplied value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Relative path within the vault (unique key, no traversal segments)
    pub path: String,
    /// Full document text
    pub content: String,
    /// Content fingerprint, see [`crate::content_fingerprint`]
    #[serde(rename = "hash")]
    pub fingerprint: String,
    /// Wall-clock capture at mutation time, Unix milliseconds
    #[serde(rename = "updatedAt")]
    pub updated_at_ms: i64,
}

/// Remote repository coordinates for one tenant.
///
/// Set by an external "link this tenant to this repo" operation and read on
/// every reconciliation. An empty credential means "not configured", which
/// downstream consumers treat as a successful no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCoords {
    /// Access token for the remote content host
    pub credential: String,
    pub repo_owner: String,
    pub repo_name: String,
}

/// Point-in-time copy of one tenant's registry state.
///
/// Fully materialized: callers iterating a snapshot never observe mutations
/// made after it was taken. Ordering of both collections is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All live documents
    #[serde(rename = "files")]
    pub documents: Vec<Document>,
    /// All tombstoned paths
    pub deleted: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_wire_field_names() {
        let doc = Document {
            path: "notes/a.md".to_string(),
            content: "hello".to_string(),
            fingerprint: "sha256:2tlu35".to_string(),
            updated_at_ms: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "notes/a.md",
                "content": "hello",
                "hash": "sha256:2tlu35",
                "updatedAt": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn remote_coords_camel_case() {
        let coords: RemoteCoords = serde_json::from_value(serde_json::json!({
            "credential": "tk",
            "repoOwner": "o",
            "repoName": "r",
        }))
        .unwrap();
        assert_eq!(coords.repo_owner, "o");
        assert_eq!(coords.repo_name, "r");
    }
}
