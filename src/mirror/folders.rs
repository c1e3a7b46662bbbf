use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::google_drive::DriveId;
use crate::mirror::FolderIdCache;
use crate::prelude::*;
use crate::remote::RemoteStorage;

/// Creates missing destination folders, at most once per path.
///
/// The cache lock is held for a whole [`FolderResolver::ensure_folder`] call,
/// so two transfers resolving the same new path never both create it.
#[derive(Debug)]
pub struct FolderResolver {
    storage: Arc<dyn RemoteStorage>,
    cache: Mutex<FolderIdCache>,
}

impl FolderResolver {
    pub fn new(storage: Arc<dyn RemoteStorage>, cache: FolderIdCache) -> Self {
        Self {
            storage,
            cache: Mutex::new(cache),
        }
    }

    /// Id of the destination folder at `relative_path`, creating every
    /// missing segment below the deepest one that already exists.
    #[instrument(skip(self))]
    pub async fn ensure_folder(&self, relative_path: &str) -> Result<DriveId> {
        let mut cache = self.cache.lock().await;
        let mut parent_id = cache.root_id().clone();
        let mut current_path = String::new();
        for segment in relative_path.split('/').filter(|segment| !segment.is_empty()) {
            if !current_path.is_empty() {
                current_path.push('/');
            }
            current_path.push_str(segment);

            if let Some(id) = cache.get(&current_path) {
                parent_id = id.clone();
                continue;
            }

            debug!("creating folder {:?} in {}", segment, parent_id);
            let id = self
                .storage
                .create_folder(segment, &parent_id)
                .await
                .with_context(|| format!("could not create folder {}", current_path))?;
            info!("created folder {}", current_path);
            cache.insert(current_path.clone(), id.clone());
            parent_id = id;
        }
        Ok(parent_id)
    }

    pub fn into_cache(self) -> FolderIdCache {
        self.cache.into_inner()
    }
}
