//! One-way mirror of a Google Drive folder tree into another folder.
//!
//! Files already present at the same path in the destination are only copied
//! again when the source is newer. Native Google documents are exported to
//! office formats on the way.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use prelude::*;

use crate::config::Args;
use crate::google_drive::GoogleDrive;
use crate::mirror::{Mirror, MirrorSummary};

pub mod config;
pub mod error;
pub mod google_drive;
pub mod mirror;
pub mod prelude;
pub mod remote;

#[cfg(test)]
mod test_support;


/// Connects to Google Drive with the configured credentials and mirrors the
/// source folder into the destination folder once.
pub async fn mirror_drive(args: &Args, cancel: CancellationToken) -> Result<MirrorSummary> {
    let drive = GoogleDrive::new(&args.auth()).await?;
    let mirror = Mirror::new(Arc::new(drive), args.settings()).with_cancellation(cancel);
    Ok(mirror.run().await?)
}
