use std::fmt::{Debug, Display};
use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use google_drive3::api::{File, Scope};
use google_drive3::hyper::client::HttpConnector;
use google_drive3::hyper_rustls::HttpsConnector;
use google_drive3::DriveHub;
use google_drive3::{hyper_rustls, oauth2};
use hyper::Client;
use mime::Mime;
use tracing::{debug, instrument};

use crate::google_drive::{helpers, DriveId};
use crate::mirror::FOLDER_MIME_TYPE;
use crate::prelude::*;
use crate::remote::{ChildPage, ContentStream, FileBuffer, RemoteStorage};

/// Content above this size goes through a resumable upload session.
const RESUMABLE_UPLOAD_THRESHOLD: usize = 5 * 1024 * 1024;

/// How the drive client obtains its access tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveAuth {
    ServiceAccount {
        key_file: PathBuf,
    },
    /// Browser consent on first use, tokens persisted to `token_cache`.
    InstalledFlow {
        client_secret: PathBuf,
        token_cache: PathBuf,
    },
}

#[derive(Clone)]
pub struct GoogleDrive {
    hub: DriveHub<HttpsConnector<HttpConnector>>,
}

impl GoogleDrive {
    #[instrument]
    pub async fn new(auth: &DriveAuth) -> Result<Self> {
        let auth = match auth {
            DriveAuth::ServiceAccount { key_file } => {
                let key = oauth2::read_service_account_key(key_file)
                    .await
                    .with_context(|| format!("could not read {}", key_file.display()))?;
                oauth2::ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await?
            }
            DriveAuth::InstalledFlow {
                client_secret,
                token_cache,
            } => {
                let secret = oauth2::read_application_secret(client_secret)
                    .await
                    .with_context(|| format!("could not read {}", client_secret.display()))?;
                oauth2::InstalledFlowAuthenticator::builder(
                    secret,
                    oauth2::InstalledFlowReturnMethod::HTTPRedirect,
                )
                .persist_tokens_to_disk(token_cache)
                .build()
                .await?
            }
        };
        let http_client = Client::builder().build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()?
                .https_or_http()
                .enable_http1()
                .enable_http2()
                .build(),
        );
        let hub = DriveHub::new(http_client, auth);

        Ok(GoogleDrive { hub })
    }
}

#[async_trait]
impl RemoteStorage for GoogleDrive {
    #[instrument(skip(self))]
    async fn list_children(
        &self,
        folder_id: &DriveId,
        page_token: Option<&str>,
    ) -> Result<ChildPage> {
        let query = helpers::children_query(folder_id)?;
        let mut request = self
            .hub
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .param("fields", helpers::FIELDS_LISTING)
            .add_scope(Scope::Full);
        if let Some(page_token) = page_token {
            request = request.page_token(page_token);
        }
        let (_response, result) = request
            .doit()
            .await
            .with_context(|| format!("could not list children of {}", folder_id))?;
        let files = result.files.unwrap_or_default();
        debug!("list_children: response: {:?}", files.len());
        let children = files
            .into_iter()
            .map(helpers::child_from_file)
            .collect::<Result<Vec<_>>>()?;
        Ok(ChildPage {
            children,
            next_page_token: result.next_page_token,
        })
    }

    #[instrument(skip(self))]
    async fn create_folder(&self, name: &str, parent_id: &DriveId) -> Result<DriveId> {
        let metadata = File {
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: Some(vec![parent_id.to_string()]),
            ..Default::default()
        };
        let (_response, folder) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id")
            .add_scope(Scope::Full)
            .upload(
                Cursor::new(Vec::<u8>::new()),
                helpers::get_mime_for_upload(FOLDER_MIME_TYPE),
            )
            .await
            .with_context(|| format!("could not create folder {:?} in {}", name, parent_id))?;
        let id = folder.id.context("created folder has no id")?;
        debug!("create_folder: id: {}", id);
        Ok(DriveId::from(id))
    }

    #[instrument(skip(self))]
    async fn export_file(&self, file_id: &DriveId, target_mime: &str) -> Result<ContentStream> {
        let response = self
            .hub
            .files()
            .export(file_id.as_str(), target_mime)
            .add_scope(Scope::Full)
            .doit()
            .await
            .with_context(|| format!("could not export {} as {}", file_id, target_mime))?;
        debug!("export_file: status: {}", response.status());
        Ok(helpers::body_stream(response))
    }

    #[instrument(skip(self))]
    async fn download_file(&self, file_id: &DriveId) -> Result<ContentStream> {
        let (response, _file) = self
            .hub
            .files()
            .get(file_id.as_str())
            .add_scope(Scope::Full)
            .acknowledge_abuse(true)
            .param("alt", "media")
            .doit()
            .await
            .with_context(|| format!("could not download {}", file_id))?;
        debug!("download_file: status: {}", response.status());
        Ok(helpers::body_stream(response))
    }

    #[instrument(skip(self, content), fields(size = content.len()))]
    async fn upload_file(
        &self,
        name: &str,
        parent_id: &DriveId,
        mime_type: &Mime,
        content: FileBuffer,
    ) -> Result<DriveId> {
        let metadata = File {
            name: Some(name.to_string()),
            parents: Some(vec![parent_id.to_string()]),
            ..Default::default()
        };
        let resumable = content.len() > RESUMABLE_UPLOAD_THRESHOLD;
        let request = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id")
            .add_scope(Scope::Full);
        debug!("starting upload (resumable: {})", resumable);
        let (_response, file) = if resumable {
            request
                .upload_resumable(content.into_reader(), mime_type.clone())
                .await
        } else {
            request.upload(content.into_reader(), mime_type.clone()).await
        }
        .with_context(|| format!("could not upload {:?} to {}", name, parent_id))?;
        debug!("upload done!");
        let id = file.id.context("uploaded file has no id")?;
        Ok(DriveId::from(id))
    }
}

impl Debug for GoogleDrive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleDrive")
    }
}

impl Display for GoogleDrive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleDrive")
    }
}
