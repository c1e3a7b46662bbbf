use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::error::MirrorError;
use crate::google_drive::DriveId;
use crate::mirror::listing::walk_tree;
use crate::remote::RemoteStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationIndexEntry {
    pub id: DriveId,
    pub modified_time: String,
}

/// Snapshot of every destination file, keyed by root-relative path.
///
/// Taken once per run and never refreshed, so files uploaded during the run
/// are not visible in it.
#[derive(Debug, Clone, Default)]
pub struct DestinationIndex {
    files: HashMap<String, DestinationIndexEntry>,
}

impl DestinationIndex {
    pub fn get(&self, path: &str) -> Option<&DestinationIndexEntry> {
        self.files.get(path)
    }
    pub fn len(&self) -> usize {
        self.files.len()
    }
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, DestinationIndexEntry)> for DestinationIndex {
    fn from_iter<T: IntoIterator<Item = (String, DestinationIndexEntry)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Destination folder ids by root-relative path.
///
/// The empty path is the destination root and cannot be overwritten.
#[derive(Debug, Clone)]
pub struct FolderIdCache {
    root_id: DriveId,
    folders: HashMap<String, DriveId>,
}

impl FolderIdCache {
    pub fn new(root_id: DriveId) -> Self {
        let mut folders = HashMap::new();
        folders.insert(String::new(), root_id.clone());
        Self { root_id, folders }
    }

    pub fn root_id(&self) -> &DriveId {
        &self.root_id
    }

    pub fn get(&self, path: &str) -> Option<&DriveId> {
        self.folders.get(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, id: DriveId) {
        let path = path.into();
        if path.is_empty() {
            return;
        }
        self.folders.insert(path, id);
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }
}

/// Walks the whole destination tree once, splitting it into the file index
/// and the folder cache.
#[instrument(skip(storage))]
pub async fn index_destination(
    storage: &dyn RemoteStorage,
    dest_root_id: &DriveId,
) -> Result<(DestinationIndex, FolderIdCache), MirrorError> {
    let mut files = HashMap::new();
    let mut folders = FolderIdCache::new(dest_root_id.clone());
    for entry in walk_tree(storage, dest_root_id, "").await? {
        if entry.is_folder() {
            debug!("indexed folder {} as {}", entry.path, entry.id);
            folders.insert(entry.path, entry.id);
        } else {
            files.insert(
                entry.path,
                DestinationIndexEntry {
                    id: entry.id,
                    modified_time: entry.modified_time,
                },
            );
        }
    }
    info!(
        "destination index: {} files, {} folders",
        files.len(),
        folders.len()
    );
    Ok((DestinationIndex { files }, folders))
}
