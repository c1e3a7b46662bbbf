use std::str::FromStr;

use anyhow::anyhow;
use futures::TryStreamExt;
use google_drive3::api::File;
use google_drive3::chrono::SecondsFormat;
use google_drive3::hyper::{Body, Response};
use mime::Mime;
use tracing::warn;

use crate::error::MirrorError;
use crate::google_drive::DriveId;
use crate::prelude::*;
use crate::remote::{ContentStream, RemoteChild};

/// Fields requested on every folder listing.
pub(crate) const FIELDS_LISTING: &str = "nextPageToken, files(id, name, mimeType, modifiedTime)";

/// Query for the non-trashed direct children of `folder_id`.
pub fn children_query(folder_id: &DriveId) -> Result<String> {
    let folder_id = folder_id.as_str();
    if folder_id.is_empty() {
        return Err(anyhow!("folder_id is empty"));
    }
    if folder_id.contains('\'') {
        return Err(anyhow!("folder_id contains invalid character"));
    }
    Ok(format!("'{}' in parents and trashed = false", folder_id))
}

pub fn child_from_file(file: File) -> Result<RemoteChild> {
    let id = file.id.ok_or(MirrorError::MissingField("id"))?;
    let name = file.name.ok_or(MirrorError::MissingField("name"))?;
    let mime_type = file
        .mime_type
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
    // An absent time stays empty so the decision step reports it instead of guessing.
    let modified_time = file
        .modified_time
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();
    Ok(RemoteChild {
        id: DriveId::from(id),
        name,
        mime_type,
        modified_time,
    })
}

pub fn get_mime_for_upload(mime_type: &str) -> Mime {
    match Mime::from_str(mime_type) {
        Ok(mime) => mime,
        Err(e) => {
            warn!(
                "could not parse mime type {:?} ({}), uploading as octet-stream",
                mime_type, e
            );
            mime::APPLICATION_OCTET_STREAM
        }
    }
}

pub fn body_stream(response: Response<Body>) -> ContentStream {
    Box::pin(response.into_body().map_err(anyhow::Error::from))
}
