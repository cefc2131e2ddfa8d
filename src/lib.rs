pub mod config;
pub mod coords;
pub mod designer;
pub mod drag;
pub mod editor;
pub mod error;
pub mod event;
pub mod layout;
pub mod presets;
pub mod resize;

pub use config::Config;
pub use designer::{Designer, Hover, Selection};
pub use error::{Rejected, Violation};
pub use layout::{Cabinet, LayoutParams, Partition, PartitionId, Shelf, ShelfId};
