use crate::error::{ConvertError, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::io;
use std::path::Path;

/// Unencrypted Bitwarden JSON export.
///
/// Only the fields needed for conversion are modelled; everything else in
/// the export (item names, notes, cards, identities, ...) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub folders: Vec<Folder>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub login: Option<LoginData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub uris: Vec<LoginUri>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUri {
    #[serde(default)]
    pub uri: Option<String>,
}

impl ExportDocument {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Bytes that are not valid UTF-8 are a parse error, not an I/O error.
    pub fn from_slice(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    /// Number of items carrying login data.
    pub fn login_count(&self) -> usize {
        self.items.iter().filter(|item| item.login.is_some()).count()
    }
}

impl Item {
    pub fn is_login(&self) -> bool {
        self.login.is_some()
    }

    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_id.as_deref() == Some(folder_id)
    }
}

/// Bitwarden writes `null` rather than `[]` for some empty collections.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub fn load_document<P: AsRef<Path>>(path: P) -> Result<ExportDocument> {
    let path = path.as_ref();

    let content = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::NotFound {
            path: path.display().to_string(),
        },
        _ => ConvertError::Io(e),
    })?;

    ExportDocument::from_slice(&content).map_err(|source| ConvertError::Parse {
        path: path.display().to_string(),
        source,
    })
}
