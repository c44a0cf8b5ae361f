//! Domain types shared across the workspace.

mod element;
mod file;
mod snapshot;

pub use element::{ElementKind, ElementRecord};
pub use file::FileRecord;
pub use snapshot::{IndexSnapshot, SelectorEntry};
