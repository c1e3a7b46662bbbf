pub use drive::*;
pub use drive_id::*;

mod drive;
mod drive_id;
pub mod helpers;
