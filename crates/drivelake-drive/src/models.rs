//! Serde types for the Drive v3 JSON surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// MIME type Drive uses for folder objects.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Custom property key carrying the content digest.
pub const SHA256_PROPERTY: &str = "sha256";

/// A remote file or folder as returned by list/create calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Response shape of `files.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// Metadata body for create and update calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_properties: Option<BTreeMap<String, String>>,
}

impl FileMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        FileMetadata {
            name: name.into(),
            parents: Vec::new(),
            mime_type: None,
            app_properties: None,
        }
    }

    /// Metadata for a new folder object.
    pub fn folder(name: &str, parent_id: Option<&str>) -> Self {
        let mut meta = FileMetadata::new(name).with_mime_type(FOLDER_MIME_TYPE);
        if let Some(parent) = parent_id {
            meta = meta.with_parent(parent);
        }
        meta
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parents.push(parent_id.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Attach the content digest as a custom property.
    pub fn with_sha256(mut self, digest: &str) -> Self {
        self.app_properties
            .get_or_insert_with(BTreeMap::new)
            .insert(SHA256_PROPERTY.to_string(), digest.to_string());
        self
    }

    /// Copy for an in-place update. `parents` is not writable on update, so
    /// it is dropped; the file stays where it already is.
    pub fn for_update(&self) -> Self {
        FileMetadata {
            parents: Vec::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_camel_case() {
        let meta = FileMetadata::new("photo.jpg")
            .with_parent("folder1")
            .with_mime_type("image/jpeg")
            .with_sha256("deadbeef");
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["name"], "photo.jpg");
        assert_eq!(json["parents"][0], "folder1");
        assert_eq!(json["mimeType"], "image/jpeg");
        assert_eq!(json["appProperties"]["sha256"], "deadbeef");
    }

    #[test]
    fn test_metadata_omits_empty_fields() {
        let json = serde_json::to_value(FileMetadata::new("a.bin")).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("parents"));
        assert!(!obj.contains_key("mimeType"));
        assert!(!obj.contains_key("appProperties"));
    }

    #[test]
    fn test_for_update_drops_parents() {
        let meta = FileMetadata::new("a.bin")
            .with_parent("folder1")
            .with_sha256("cafe");
        let update = meta.for_update();
        assert!(update.parents.is_empty());
        assert_eq!(update.name, "a.bin");
        assert!(update.app_properties.is_some());
    }

    #[test]
    fn test_folder_metadata() {
        let meta = FileMetadata::folder("images", Some("parent1"));
        assert_eq!(meta.mime_type.as_deref(), Some(FOLDER_MIME_TYPE));
        assert_eq!(meta.parents, vec!["parent1".to_string()]);

        let root = FileMetadata::folder("DataLake", None);
        assert!(root.parents.is_empty());
    }

    #[test]
    fn test_file_list_deserializes() {
        let list: FileList = serde_json::from_str(
            r#"{"files": [{"id": "f1", "name": "a.jpg", "mimeType": "image/jpeg"}]}"#,
        )
        .unwrap();
        assert_eq!(list.files.len(), 1);
        assert_eq!(list.files[0].id, "f1");
        assert_eq!(list.files[0].mime_type.as_deref(), Some("image/jpeg"));

        let empty: FileList = serde_json::from_str("{}").unwrap();
        assert!(empty.files.is_empty());
    }
}
