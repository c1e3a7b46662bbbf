use google_drive3::chrono::{DateTime, FixedOffset};
use tracing::trace;

use crate::error::MirrorError;
use crate::mirror::{destination_path, DestinationIndex, RemoteEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing exists at the path in the destination.
    CopyMissing,
    /// The source was modified after the destination copy.
    CopyNewer,
    UpToDate,
}

impl Decision {
    pub fn should_copy(self) -> bool {
        !matches!(self, Decision::UpToDate)
    }
}

/// Parses an RFC 3339 modified time; a trailing `Z` is read as `+00:00`.
pub fn parse_modified_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(without_zone) => format!("{}+00:00", without_zone),
        None => value.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).ok()
}

fn modified_time_of(path: &str, value: &str) -> Result<DateTime<FixedOffset>, MirrorError> {
    parse_modified_time(value).ok_or_else(|| MirrorError::InvalidTimestamp {
        path: path.to_string(),
        value: value.to_string(),
    })
}

/// Newer wins: a file is copied when it is missing from the destination or
/// strictly newer than the copy there. Equal times skip.
///
/// Native documents are looked up under their exported name (`Budget.xlsx`).
///
/// The source time is validated even when the destination has no copy, so a
/// malformed time is always reported instead of silently copied.
pub fn decide(source: &RemoteEntry, index: &DestinationIndex) -> Result<Decision, MirrorError> {
    let source_time = modified_time_of(&source.path, &source.modified_time)?;
    let Some(dest) = index.get(&destination_path(source)) else {
        return Ok(Decision::CopyMissing);
    };
    let dest_time = modified_time_of(&source.path, &dest.modified_time)?;
    trace!(
        "decide {}: source {} destination {}",
        source.path,
        source_time,
        dest_time
    );
    if source_time > dest_time {
        Ok(Decision::CopyNewer)
    } else {
        Ok(Decision::UpToDate)
    }
}

pub fn should_copy(source: &RemoteEntry, index: &DestinationIndex) -> Result<bool, MirrorError> {
    decide(source, index).map(Decision::should_copy)
}
