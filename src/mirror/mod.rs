//! Incremental one-way mirror of a remote folder tree.
//!
//! A run indexes the destination once, lists the source, and for every
//! source file decides, resolves its destination folder and copies.

pub use copier::*;
pub use decision::*;
pub use entry::*;
pub use events::*;
pub use export::*;
pub use folders::*;
pub use index::*;
pub use listing::*;
pub use orchestrator::*;

mod copier;
mod decision;
mod entry;
mod events;
mod export;
mod folders;
mod index;
mod listing;
mod orchestrator;
