//! View/state synchronization controller for the single-page network
//! visualization gallery.
//!
//! [`Gallery`] owns the in-memory entry index, drives the rendering
//! surfaces and keeps both consistent with the remote authority across
//! optimistic mutations, background reconciliation polling and user
//! navigation.

pub mod config;
pub mod content;
pub mod gallery;
pub mod reconcile;

mod modes;
mod ops;

#[cfg(test)]
pub(crate) mod testkit;

pub use config::{GalleryConfig, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY};
pub use content::{AjaxRegion, FullDocument, ViewContent, ViewScope};
pub use gallery::{Gallery, Surfaces};
pub use reconcile::{PollOutcome, Reconciler};
