use crate::google_drive::DriveId;
use crate::remote::RemoteChild;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
/// Every native Google document type shares this prefix.
pub const NATIVE_MIME_PREFIX: &str = "application/vnd.google-apps.";

/// Root-relative path of `name` inside `parent_path`.
///
/// Both trees build their keys through this function, so source and
/// destination paths compare as plain strings.
pub fn join_path(parent_path: &str, name: &str) -> String {
    format!("{}/{}", parent_path.trim_matches('/'), name)
        .trim_matches('/')
        .to_string()
}

/// Folder part of a root-relative file path, empty for files at the root.
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// A node of the source or destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub id: DriveId,
    pub name: String,
    pub mime_type: String,
    pub modified_time: String,
    pub path: String,
}

impl RemoteEntry {
    pub fn from_child(parent_path: &str, child: RemoteChild) -> Self {
        Self {
            path: join_path(parent_path, &child.name),
            id: child.id,
            name: child.name,
            mime_type: child.mime_type,
            modified_time: child.modified_time,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    pub fn is_native_document(&self) -> bool {
        self.mime_type.starts_with(NATIVE_MIME_PREFIX) && !self.is_folder()
    }
}
