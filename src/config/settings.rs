use std::fmt::{Display, Formatter};

use crate::google_drive::DriveId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    /// Folder whose tree is copied
    source_root: DriveId,
    /// Folder the tree is copied into
    destination_root: DriveId,
    /// How many files may be in flight at once
    ///
    /// every in-flight file is held in memory in full
    concurrency: usize,
    /// Decide and report without creating folders or uploading
    dry_run: bool,
}

impl MirrorSettings {
    pub fn new(source_root: DriveId, destination_root: DriveId) -> Self {
        Self {
            source_root,
            destination_root,
            concurrency: 1,
            dry_run: false,
        }
    }
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

// region getters
impl MirrorSettings {
    pub fn source_root(&self) -> &DriveId {
        &self.source_root
    }
    pub fn destination_root(&self) -> &DriveId {
        &self.destination_root
    }
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

// endregion
impl Display for MirrorSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MirrorSettings {{ source: {}, destination: {}, concurrency: {}, dry_run: {} }}",
            self.source_root, self.destination_root, self.concurrency, self.dry_run
        )
    }
}
