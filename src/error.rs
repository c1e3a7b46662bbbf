use thiserror::Error;

/// Failures the mirror engine tells apart.
///
/// Remote calls and plumbing report through `anyhow`; these variants wrap
/// them once the engine knows which stage a failure belongs to.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Listing a folder failed. Nothing indexed after this point can be trusted.
    #[error("could not enumerate folder {folder_id}: {source}")]
    Enumeration {
        folder_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid modified time {value:?} on {path}")]
    InvalidTimestamp { path: String, value: String },

    /// Download, export or upload of a single file failed.
    #[error("transfer of {path} failed: {source}")]
    Transfer {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("remote entry is missing its {0}")]
    MissingField(&'static str),
}
