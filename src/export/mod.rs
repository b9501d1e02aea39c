pub mod document;
pub mod folder_resolver;

pub use document::{load_document, ExportDocument, Folder, Item, LoginData, LoginUri};
pub use folder_resolver::FolderResolution;
