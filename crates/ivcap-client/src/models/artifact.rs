//! Artifact store models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::NavLinks;

/// Store view of a single artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "mime-type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "account-id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Link for fetching the artifact's content
    #[serde(rename = "data-href", skip_serializing_if = "Option::is_none")]
    pub data_href: Option<String>,
    #[serde(flatten)]
    pub additional_properties: BTreeMap<String, Value>,
}

/// Abbreviated artifact record returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactListItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "mime-type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(flatten)]
    pub additional_properties: BTreeMap<String, Value>,
}

/// One page of artifact records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<ArtifactListItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<NavLinks>,
    #[serde(flatten)]
    pub additional_properties: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_status_round_trip() {
        let input = json!({
            "id": "urn:ivcap:artifact:b2d38fcb",
            "mime-type": "image/png",
            "size": 12345,
            "data-href": "https://api.ivcap.net/1/artifacts/b2d38fcb/data",
            "etag": "abc",
        });

        let status: ArtifactStatus = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(status.mime_type.as_deref(), Some("image/png"));
        assert_eq!(status.size, Some(12345));
        assert_eq!(status.additional_properties.get("etag"), Some(&json!("abc")));
        assert_eq!(serde_json::to_value(&status).unwrap(), input);
    }
}
