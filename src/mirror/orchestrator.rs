use std::sync::Arc;

use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::MirrorSettings;
use crate::error::MirrorError;
use crate::mirror::{
    decide, index_destination, list_all, parent_path, CopyOutcome, DestinationIndex, FileCopier,
    FolderResolver, MirrorEvent, MirrorObserver, MirrorSummary, RemoteEntry, TracingObserver,
    TransferPlan,
};
use crate::remote::RemoteStorage;

/// Drives one mirror run from destination indexing to the final summary.
pub struct Mirror {
    storage: Arc<dyn RemoteStorage>,
    settings: MirrorSettings,
    observer: Arc<dyn MirrorObserver>,
    cancel: CancellationToken,
}

/// Per-run state shared by the file transfers.
struct RunState {
    index: DestinationIndex,
    resolver: FolderResolver,
    copier: FileCopier,
}

impl Mirror {
    pub fn new(storage: Arc<dyn RemoteStorage>, settings: MirrorSettings) -> Self {
        Self {
            storage,
            settings,
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MirrorObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Once `cancel` fires no further file is started.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the whole pipeline.
    ///
    /// Only enumeration failures abort the run; every per-file problem ends up
    /// in the returned summary.
    #[instrument(skip(self), fields(settings = %self.settings))]
    pub async fn run(&self) -> Result<MirrorSummary, MirrorError> {
        info!("indexing destination");
        let (index, folders) =
            index_destination(self.storage.as_ref(), self.settings.destination_root()).await?;

        info!("listing source");
        let sources = list_all(self.storage.as_ref(), self.settings.source_root(), "").await?;
        info!("{} source files", sources.len());

        let state = RunState {
            index,
            resolver: FolderResolver::new(self.storage.clone(), folders),
            copier: FileCopier::new(self.storage.clone()),
        };

        let mut summary = MirrorSummary::default();
        let mut events = stream::iter(sources.iter())
            .map(|entry| self.process(entry, &state))
            .buffer_unordered(self.settings.concurrency());
        while let Some(event) = events.next().await {
            if let Some(event) = event {
                self.observer.on_event(&event);
                summary.record(&event);
            }
        }

        summary.cancelled = self.cancel.is_cancelled();
        if summary.cancelled {
            warn!("mirror run cancelled: {}", summary);
        } else {
            info!("mirror run done: {}", summary);
        }
        Ok(summary)
    }

    /// Handles one source file; `None` when the run was cancelled first.
    async fn process(&self, entry: &RemoteEntry, state: &RunState) -> Option<MirrorEvent> {
        if self.cancel.is_cancelled() {
            debug!("cancelled before {}", entry.path);
            return None;
        }
        let path = entry.path.clone();

        match decide(entry, &state.index) {
            Err(e) => {
                return Some(MirrorEvent::Failed {
                    path,
                    error: e.to_string(),
                })
            }
            Ok(decision) if !decision.should_copy() => return Some(MirrorEvent::Skipped { path }),
            Ok(decision) => debug!("{:?}: {}", decision, path),
        }

        if let TransferPlan::Unsupported = TransferPlan::for_mime_type(&entry.mime_type) {
            return Some(MirrorEvent::Unsupported {
                path,
                mime_type: entry.mime_type.clone(),
            });
        }

        if self.settings.dry_run() {
            return Some(MirrorEvent::Planned { path });
        }

        let folder_id = match state.resolver.ensure_folder(parent_path(&entry.path)).await {
            Ok(folder_id) => folder_id,
            Err(source) => {
                let error = MirrorError::Transfer { path: path.clone(), source };
                return Some(MirrorEvent::Failed {
                    path,
                    error: error.to_string(),
                });
            }
        };

        Some(match state.copier.copy(entry, &folder_id).await {
            Ok(CopyOutcome::Copied { id, name }) => MirrorEvent::Copied { path, name, id },
            Ok(CopyOutcome::Unsupported { mime_type }) => {
                MirrorEvent::Unsupported { path, mime_type }
            }
            Err(e) => MirrorEvent::Failed {
                path,
                error: e.to_string(),
            },
        })
    }
}
