use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::MirrorError;
use crate::google_drive::{helpers, DriveId};
use crate::mirror::{destination_name, RemoteEntry, TransferPlan};
use crate::prelude::*;
use crate::remote::{FileBuffer, RemoteStorage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { id: DriveId, name: String },
    /// Native document type without an export format; nothing was transferred.
    Unsupported { mime_type: String },
}

/// Moves one file's bytes from the source tree into a destination folder.
#[derive(Debug)]
pub struct FileCopier {
    storage: Arc<dyn RemoteStorage>,
}

impl FileCopier {
    pub fn new(storage: Arc<dyn RemoteStorage>) -> Self {
        Self { storage }
    }

    /// Downloads (or exports) `entry` into memory and uploads it as a new
    /// file in `destination_folder_id`.
    #[instrument(skip(self, entry), fields(path = %entry.path))]
    pub async fn copy(
        &self,
        entry: &RemoteEntry,
        destination_folder_id: &DriveId,
    ) -> Result<CopyOutcome, MirrorError> {
        let (name, upload_mime) = match TransferPlan::for_mime_type(&entry.mime_type) {
            TransferPlan::Unsupported => {
                warn!(
                    "native file type cannot be exported: {} ({})",
                    entry.path, entry.mime_type
                );
                return Ok(CopyOutcome::Unsupported {
                    mime_type: entry.mime_type.clone(),
                });
            }
            TransferPlan::Export(format) => (destination_name(entry), format.mime_type.to_string()),
            TransferPlan::Download => (destination_name(entry), entry.mime_type.clone()),
        };

        let id = self
            .transfer(entry, destination_folder_id, &name, &upload_mime)
            .await
            .map_err(|source| MirrorError::Transfer {
                path: entry.path.clone(),
                source,
            })?;
        Ok(CopyOutcome::Copied { id, name })
    }

    async fn transfer(
        &self,
        entry: &RemoteEntry,
        destination_folder_id: &DriveId,
        name: &str,
        upload_mime: &str,
    ) -> Result<DriveId> {
        let stream = if entry.is_native_document() {
            self.storage.export_file(&entry.id, upload_mime).await?
        } else {
            self.storage.download_file(&entry.id).await?
        };
        let content = FileBuffer::read_from(stream).await?;
        debug!("downloaded {} bytes of {}", content.len(), entry.path);

        let mime_type = helpers::get_mime_for_upload(upload_mime);
        self.storage
            .upload_file(name, destination_folder_id, &mime_type, content)
            .await
    }
}
