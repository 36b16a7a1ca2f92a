//! Core types and traits for the network visualization gallery.
//!
//! Everything the other crates build on lives here: the entry index that
//! mirrors the server's catalog, the browse/create/edit mode machine, the
//! status bar, spreadsheet link handling, and the trait seams behind which
//! the rendering surfaces and the remote backend sit.

pub mod entry;
pub mod link;
pub mod mode;
pub mod remote;
pub mod session;
pub mod status;
pub mod surface;

pub use entry::{DatasetRef, EntryIndex, VisEntry, VisId};
pub use mode::{Mode, SaveLabel};
pub use remote::{GraphData, GraphLink, GraphNode, IndexRow, RemoteAuthority, VisForm};
pub use session::Session;
pub use status::{StatusBar, DEFAULT_AUTOHIDE, ERROR_PREFIX};
pub use surface::{
    EntryBinding, EntryList, FormField, History, PageChrome, StatusSurface, ViewportSurface,
};
