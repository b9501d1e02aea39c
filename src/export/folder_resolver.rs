use crate::export::ExportDocument;

/// Outcome of looking a folder name up in an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderResolution {
    /// Exactly one folder carries the name.
    Unique(String),
    /// Several folders share the name; the first one in export order wins.
    Ambiguous { id: String, matches: usize },
    NotFound,
}

impl FolderResolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            FolderResolution::Unique(id) => Some(id),
            FolderResolution::Ambiguous { id, .. } => Some(id),
            FolderResolution::NotFound => None,
        }
    }
}

impl ExportDocument {
    /// Id of the first folder whose name equals `name` exactly.
    pub fn folder_id_by_name(&self, name: &str) -> Option<&str> {
        self.folders
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.id.as_str())
    }

    pub fn folders_named(&self, name: &str) -> usize {
        self.folders.iter().filter(|f| f.name == name).count()
    }

    pub fn resolve_folder(&self, name: &str) -> FolderResolution {
        match self.folder_id_by_name(name) {
            None => FolderResolution::NotFound,
            Some(id) => match self.folders_named(name) {
                1 => FolderResolution::Unique(id.to_string()),
                matches => FolderResolution::Ambiguous {
                    id: id.to_string(),
                    matches,
                },
            },
        }
    }
}
