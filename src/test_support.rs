//! In-memory drive used by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use mime::Mime;

use crate::google_drive::DriveId;
use crate::mirror::{MirrorEvent, MirrorObserver, FOLDER_MIME_TYPE};
use crate::prelude::*;
use crate::remote::{ChildPage, ContentStream, FileBuffer, RemoteChild, RemoteStorage};

pub const SOURCE_ROOT: &str = "source-root";
pub const DEST_ROOT: &str = "dest-root";

/// Modified time the fake stamps on uploads, later than any test source file.
const UPLOAD_TIME: &str = "2030-01-01T00:00:00.000Z";
/// Bodies are streamed in chunks this small to exercise the read loop.
const CHUNK_SIZE: usize = 4;

#[derive(Debug, Clone)]
struct FakeNode {
    id: DriveId,
    parent: DriveId,
    name: String,
    mime_type: String,
    modified_time: String,
    content: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub id: DriveId,
    pub name: String,
    pub parent_id: DriveId,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct FakeState {
    nodes: Vec<FakeNode>,
    next_id: usize,
    list_calls: usize,
    folder_creations: Vec<(String, DriveId)>,
    uploads: Vec<Upload>,
    exports: Vec<(DriveId, String)>,
    downloads: Vec<DriveId>,
    failing_listings: HashSet<DriveId>,
    failing_downloads: HashSet<DriveId>,
    failing_folders: HashSet<String>,
}

impl FakeState {
    fn add_node(
        &mut self,
        parent: &DriveId,
        name: &str,
        mime_type: &str,
        modified_time: &str,
        content: Bytes,
    ) -> DriveId {
        self.next_id += 1;
        let id = DriveId::from(format!("id-{}", self.next_id));
        self.nodes.push(FakeNode {
            id: id.clone(),
            parent: parent.clone(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            modified_time: modified_time.to_string(),
            content,
        });
        id
    }

    fn node(&self, id: &DriveId) -> Result<&FakeNode> {
        self.nodes
            .iter()
            .find(|node| &node.id == id)
            .ok_or_else(|| anyhow!("file not found: {}", id))
    }
}

#[derive(Debug)]
pub struct FakeDrive {
    page_size: usize,
    state: Mutex<FakeState>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self {
            page_size: 100,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn add_folder(&self, parent: &DriveId, name: &str) -> DriveId {
        self.state.lock().unwrap().add_node(
            parent,
            name,
            FOLDER_MIME_TYPE,
            "2024-01-01T00:00:00Z",
            Bytes::new(),
        )
    }

    pub fn add_file(
        &self,
        parent: &DriveId,
        name: &str,
        mime_type: &str,
        modified_time: &str,
        content: &[u8],
    ) -> DriveId {
        self.state.lock().unwrap().add_node(
            parent,
            name,
            mime_type,
            modified_time,
            Bytes::copy_from_slice(content),
        )
    }

    pub fn fail_listing(&self, folder_id: &DriveId) {
        self.state
            .lock()
            .unwrap()
            .failing_listings
            .insert(folder_id.clone());
    }

    pub fn fail_download(&self, file_id: &DriveId) {
        self.state
            .lock()
            .unwrap()
            .failing_downloads
            .insert(file_id.clone());
    }

    pub fn fail_folder_creation(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_folders
            .insert(name.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// `(name, parent)` of every folder created through the trait.
    pub fn folder_creations(&self) -> Vec<(String, DriveId)> {
        self.state.lock().unwrap().folder_creations.clone()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn exports(&self) -> Vec<(DriveId, String)> {
        self.state.lock().unwrap().exports.clone()
    }

    pub fn downloads(&self) -> Vec<DriveId> {
        self.state.lock().unwrap().downloads.clone()
    }
}

fn chunked(content: Bytes) -> ContentStream {
    let chunks: Vec<Result<Bytes>> = content
        .chunks(CHUNK_SIZE)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    Box::pin(stream::iter(chunks))
}

#[async_trait]
impl RemoteStorage for FakeDrive {
    async fn list_children(
        &self,
        folder_id: &DriveId,
        page_token: Option<&str>,
    ) -> Result<ChildPage> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.failing_listings.contains(folder_id) {
            return Err(anyhow!("listing {} failed", folder_id));
        }
        let offset: usize = page_token.map(str::parse::<usize>).transpose()?.unwrap_or(0);
        let children: Vec<RemoteChild> = state
            .nodes
            .iter()
            .filter(|node| &node.parent == folder_id)
            .map(|node| RemoteChild {
                id: node.id.clone(),
                name: node.name.clone(),
                mime_type: node.mime_type.clone(),
                modified_time: node.modified_time.clone(),
            })
            .collect();
        let end = (offset + self.page_size).min(children.len());
        let next_page_token = (end < children.len()).then(|| end.to_string());
        Ok(ChildPage {
            children: children[offset.min(end)..end].to_vec(),
            next_page_token,
        })
    }

    async fn create_folder(&self, name: &str, parent_id: &DriveId) -> Result<DriveId> {
        // let concurrent callers interleave here
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        if state.failing_folders.contains(name) {
            return Err(anyhow!("permission denied creating {}", name));
        }
        state
            .folder_creations
            .push((name.to_string(), parent_id.clone()));
        Ok(state.add_node(parent_id, name, FOLDER_MIME_TYPE, UPLOAD_TIME, Bytes::new()))
    }

    async fn export_file(&self, file_id: &DriveId, target_mime: &str) -> Result<ContentStream> {
        let mut state = self.state.lock().unwrap();
        let content = state.node(file_id)?.content.clone();
        state
            .exports
            .push((file_id.clone(), target_mime.to_string()));
        Ok(chunked(content))
    }

    async fn download_file(&self, file_id: &DriveId) -> Result<ContentStream> {
        let mut state = self.state.lock().unwrap();
        if state.failing_downloads.contains(file_id) {
            return Err(anyhow!("download of {} failed", file_id));
        }
        let content = state.node(file_id)?.content.clone();
        state.downloads.push(file_id.clone());
        Ok(chunked(content))
    }

    async fn upload_file(
        &self,
        name: &str,
        parent_id: &DriveId,
        mime_type: &Mime,
        content: FileBuffer,
    ) -> Result<DriveId> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        let bytes = Bytes::copy_from_slice(content.as_bytes());
        let id = state.add_node(parent_id, name, mime_type.as_ref(), UPLOAD_TIME, bytes);
        state.uploads.push(Upload {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.clone(),
            mime_type: mime_type.to_string(),
            content: content.as_bytes().to_vec(),
        });
        Ok(id)
    }
}

/// Keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<MirrorEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MirrorObserver for RecordingObserver {
    fn on_event(&self, event: &MirrorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
