use std::fmt::Debug;
use std::io::Cursor;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use mime::Mime;
use tracing::{debug, trace};

use crate::google_drive::DriveId;
use crate::prelude::*;

/// Body of a download or export, yielded chunk by chunk.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A direct child of a remote folder as the listing API reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChild {
    pub id: DriveId,
    pub name: String,
    pub mime_type: String,
    /// RFC 3339 timestamp, empty when the remote did not report one.
    pub modified_time: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    pub children: Vec<RemoteChild>,
    pub next_page_token: Option<String>,
}

/// The remote calls the mirror engine needs.
#[async_trait]
pub trait RemoteStorage: Send + Sync + Debug {
    async fn list_children(
        &self,
        folder_id: &DriveId,
        page_token: Option<&str>,
    ) -> Result<ChildPage>;

    async fn create_folder(&self, name: &str, parent_id: &DriveId) -> Result<DriveId>;

    /// Server-side conversion of a native document into `target_mime`.
    async fn export_file(&self, file_id: &DriveId, target_mime: &str) -> Result<ContentStream>;

    async fn download_file(&self, file_id: &DriveId) -> Result<ContentStream>;

    async fn upload_file(
        &self,
        name: &str,
        parent_id: &DriveId,
        mime_type: &Mime,
        content: FileBuffer,
    ) -> Result<DriveId>;
}

/// Whole file content held in memory between download and upload.
#[derive(Debug, Clone, Default)]
pub struct FileBuffer {
    content: BytesMut,
}

impl FileBuffer {
    /// Drains `stream` until the remote reports the transfer complete.
    pub async fn read_from(mut stream: ContentStream) -> Result<Self> {
        let mut content = BytesMut::new();
        let mut counter = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            trace!("read_from(): chunk counter: {}", counter);
            content.extend_from_slice(&chunk);
            counter += 1;
        }
        debug!("read_from(): {} bytes in {} chunks", content.len(), counter);
        Ok(Self { content })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Rewound reader over the buffered content.
    pub fn into_reader(self) -> Cursor<Bytes> {
        Cursor::new(self.content.freeze())
    }
}
