use std::path::PathBuf;

use clap::Parser;

use crate::google_drive::{DriveAuth, DriveId};

pub use settings::*;

mod settings;

/// Command line and environment configuration of the mirror binary.
///
/// Values may also come from a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "drive_mirror")]
#[command(about = "One-way mirror of a Google Drive folder tree into another folder")]
pub struct Args {
    /// Id of the folder to copy from
    #[arg(long, env = "SOURCE_FOLDER_ID")]
    pub source_folder_id: String,

    /// Id of the folder to copy into
    #[arg(long, env = "DEST_FOLDER_ID")]
    pub dest_folder_id: String,

    /// Service account key; when absent the installed-app OAuth flow is used
    #[arg(long, env = "SERVICE_ACCOUNT_FILE")]
    pub service_account_file: Option<PathBuf>,

    /// OAuth client secret for the installed-app flow
    #[arg(long, default_value = "auth/client_secret.json", env = "CLIENT_SECRET_FILE")]
    pub client_secret: PathBuf,

    /// Where the installed-app flow persists its tokens
    #[arg(long, default_value = "auth/tokens.json", env = "TOKEN_CACHE_FILE")]
    pub token_cache: PathBuf,

    /// Number of files transferred at the same time
    #[arg(long, default_value = "1", env = "MIRROR_CONCURRENCY",
          value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Only report what would be copied
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> MirrorSettings {
        MirrorSettings::new(
            DriveId::from(self.source_folder_id.as_str()),
            DriveId::from(self.dest_folder_id.as_str()),
        )
        .with_concurrency(usize::from(self.concurrency))
        .with_dry_run(self.dry_run)
    }

    pub fn auth(&self) -> DriveAuth {
        match &self.service_account_file {
            Some(key_file) => DriveAuth::ServiceAccount {
                key_file: key_file.clone(),
            },
            None => DriveAuth::InstalledFlow {
                client_secret: self.client_secret.clone(),
                token_cache: self.token_cache.clone(),
            },
        }
    }
}
