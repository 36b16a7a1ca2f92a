//! The gallery controller proper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use nv_core::{
    EntryIndex, EntryList, GraphData, History, PageChrome, RemoteAuthority, Session, StatusBar,
    StatusSurface, ViewportSurface, VisId,
};

use crate::config::GalleryConfig;
use crate::content::ViewContent;

/// Rendering surfaces the controller drives.
pub struct Surfaces {
    pub status: Arc<dyn StatusSurface>,
    pub list: Arc<dyn EntryList>,
    pub viewport: Arc<dyn ViewportSurface>,
    pub history: Arc<dyn History>,
    pub chrome: Arc<dyn PageChrome>,
}

/// The single-page gallery controller.
///
/// Cheap to clone; clones share all state. Operations apply their local
/// mutations synchronously and then confirm against the remote in spawned
/// tasks, so surfaces never wait on the network. Callbacks that outlive
/// their trigger re-check identity (active id, status epoch) before
/// touching anything.
#[derive(Clone)]
pub struct Gallery {
    pub remote: Arc<dyn RemoteAuthority>,
    pub index: Arc<EntryIndex>,
    pub session: Arc<Session>,
    pub status: StatusBar,
    pub list: Arc<dyn EntryList>,
    pub viewport: Arc<dyn ViewportSurface>,
    pub history: Arc<dyn History>,
    pub chrome: Arc<dyn PageChrome>,
    pub config: Arc<GalleryConfig>,
    content: Arc<dyn ViewContent>,
    embed_open: Arc<AtomicBool>,
}

impl Gallery {
    pub fn new(
        remote: Arc<dyn RemoteAuthority>,
        surfaces: Surfaces,
        config: GalleryConfig,
    ) -> Self {
        Self {
            remote,
            index: Arc::new(EntryIndex::new()),
            session: Arc::new(Session::new()),
            status: StatusBar::new(surfaces.status, config.autohide),
            list: surfaces.list,
            viewport: surfaces.viewport,
            history: surfaces.history,
            chrome: surfaces.chrome,
            content: config.view_scope.content(),
            config: Arc::new(config),
            embed_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Populate the index and listing from the remote catalog.
    ///
    /// Failures go through the shared failure handler and are also
    /// returned, so the embedding application can decide how loudly to
    /// complain.
    pub async fn boot(&self) -> Result<()> {
        let rows = match self.remote.fetch_index().await {
            Ok(rows) => rows,
            Err(err) => {
                self.on_remote_failure(&err);
                return Err(err);
            }
        };
        for row in &rows {
            self.index
                .register(row.id, &row.name, row.dataset.clone(), row.is_public);
            let binding = self.list.bind(row.id, &row.name);
            self.index.bind(row.id, binding);
        }
        info!(entries = rows.len(), "catalog loaded");
        if let Some(id) = self.config.initial_vis {
            // The server-rendered page already shows this one. Remember it
            // so reopening it does not flash a loading message.
            self.session.set_active(Some(id));
        }
        Ok(())
    }

    /// Open one visualization: push history, mark it active and load its
    /// content into the viewport.
    pub async fn open(&self, id: VisId) {
        self.history.push(&format!("/view/{id}"));
        self.chrome.set_action_bar_visible(true);
        self.chrome.set_help_visible(false);
        if self.session.active() != Some(id) {
            // Taken down on successful load, or replaced by a failure
            // report.
            self.status.show("Loading...", false);
        }
        self.session.set_active(Some(id));
        self.load_view(id).await;
    }

    async fn load_view(&self, id: VisId) {
        let body = match self.remote.fetch_view(id).await {
            Ok(body) => body,
            Err(err) => {
                self.on_remote_failure(&err);
                return;
            }
        };
        match self.content.content(&body) {
            Some(region) => {
                self.viewport.splice(&region);
                self.status.hide();
            }
            None => {
                self.on_remote_failure(&anyhow!("view {id} has no displayable region"));
            }
        }
    }

    /// A listing row was clicked: highlight it and open the entry.
    pub async fn entry_clicked(&self, id: VisId) {
        self.list.deselect_all();
        if let Some(binding) = self.index.binding_of(id) {
            binding.set_selected(true);
        }
        self.open(id).await;
    }

    /// Empty the viewport and drop the list selection, concealing any
    /// open embed popover on the way.
    pub fn clear_view(&self) {
        self.list.deselect_all();
        self.viewport.clear();
        if self.embed_open.swap(false, Ordering::SeqCst) {
            self.chrome.hide_embed();
        }
    }

    /// Navigate to the help overlay.
    pub fn open_help(&self) {
        self.history.push("/help/");
        self.show_help();
    }

    /// The help overlay and the action bar are mutually exclusive in the
    /// layout, so revealing one conceals the other.
    pub(crate) fn show_help(&self) {
        self.chrome.set_action_bar_visible(false);
        self.chrome.set_help_visible(true);
    }

    /// Toggle the embed-snippet popover for the active visualization.
    pub fn toggle_embed(&self) {
        if self.embed_open.swap(false, Ordering::SeqCst) {
            self.chrome.hide_embed();
            return;
        }
        let Some(id) = self.session.active() else {
            warn!("embed snippet requested with nothing open");
            return;
        };
        self.chrome
            .show_embed(&embed_snippet(&self.config.hostname, id));
        self.embed_open.store(true, Ordering::SeqCst);
    }

    /// Raw node/link payload for one visualization, for embedders that
    /// draw their own graphs.
    pub async fn graph_data(&self, id: VisId) -> Result<GraphData> {
        self.remote.fetch_graph_data(id).await
    }

    /// Shared failure path for every remote round-trip.
    ///
    /// Reports once through the status bar, clears any outstanding
    /// creation placeholder and re-enables the refresh control, so the
    /// page cannot stay stuck looking busy after a failure.
    pub(crate) fn on_remote_failure(&self, err: &anyhow::Error) {
        warn!(error = %err, "remote request failed");
        self.status.show_error(&format!(
            "Something went wrong ({err:#}) OAuth probably needs to reauthorize."
        ));
        if let Some(placeholder) = self.session.take_pending() {
            placeholder.detach();
        }
        self.chrome.set_refresh_enabled(true);
    }
}

/// Iframe snippet pointing at the public embed route.
pub(crate) fn embed_snippet(hostname: &str, id: VisId) -> String {
    format!(
        "<iframe src=\"{hostname}/graph/{id}/embed/\" width=\"1000\" height=\"600\"></iframe>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{harness, harness_with, ScriptedRemote};
    use nv_core::Mode;

    fn stock_remote() -> Arc<ScriptedRemote> {
        ScriptedRemote::with_rows(vec![
            ScriptedRemote::row(5, "Foo", "sheetA", true),
            ScriptedRemote::row(7, "Old", "sheetB", false),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_populates_index_and_listing() {
        let h = harness(stock_remote());
        h.gallery.boot().await.unwrap();

        assert_eq!(h.gallery.index.ids(), vec![5, 7]);
        assert!(h.gallery.index.coherent());
        let rows = h.list.snapshot();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, Some(5));
        assert_eq!(rows[0].label, "Foo");
        assert_eq!(h.gallery.session.active(), None);
        assert_eq!(h.gallery.session.mode(), Mode::Browse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_failure_reports_and_propagates() {
        let remote = stock_remote();
        remote.set_fail("token expired");
        let h = harness(remote);

        assert!(h.gallery.boot().await.is_err());
        assert!(h.gallery.status.is_error());
        let message = h.gallery.status.message();
        assert!(message.starts_with("ERROR: Something went wrong ("));
        assert!(message.contains("token expired"));
        assert!(h.gallery.index.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_pushes_history_and_loads_the_region() {
        let remote = stock_remote();
        remote.set_view_body(r#"<html><div id="ajax-view"><svg>five</svg></div></html>"#);
        let h = harness(remote);
        h.gallery.boot().await.unwrap();

        h.gallery.open(5).await;

        assert_eq!(h.history.paths.lock().as_slice(), ["/view/5"]);
        assert_eq!(h.gallery.session.active(), Some(5));
        assert!(h.chrome.snapshot().action_bar);
        assert!(!h.chrome.snapshot().help);
        assert_eq!(
            h.viewport.content.lock().as_deref(),
            Some(r#"<div id="ajax-view"><svg>five</svg></div>"#)
        );
        // "Loading..." went up for a different id, and came down on load.
        assert!(h.status.shown.lock().contains(&"Loading...".to_owned()));
        assert!(!h.gallery.status.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopening_the_same_id_skips_the_loading_flash() {
        let remote = stock_remote();
        remote.set_view_body(r#"<div id="ajax-view">x</div>"#);
        let h = harness(remote);
        h.gallery.boot().await.unwrap();

        h.gallery.open(5).await;
        h.gallery.open(5).await;

        let loading = h
            .status
            .shown
            .lock()
            .iter()
            .filter(|m| *m == "Loading...")
            .count();
        assert_eq!(loading, 1);
        assert_eq!(h.history.paths.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_click_selects_exactly_one_row() {
        let remote = stock_remote();
        remote.set_view_body(r#"<div id="ajax-view">x</div>"#);
        let h = harness(remote);
        h.gallery.boot().await.unwrap();

        h.gallery.entry_clicked(5).await;
        let rows = h.list.snapshot();
        assert!(rows[0].selected);
        assert!(!rows[1].selected);

        h.gallery.entry_clicked(7).await;
        let rows = h.list.snapshot();
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_without_region_reports_a_failure() {
        let remote = stock_remote();
        remote.set_view_body("<html>no region here</html>");
        let h = harness(remote);
        h.gallery.boot().await.unwrap();

        h.gallery.open(5).await;

        assert!(h.gallery.status.is_error());
        assert!(h.viewport.content.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preselected_vis_suppresses_the_first_loading_flash() {
        let remote = stock_remote();
        remote.set_view_body(r#"<div id="ajax-view">x</div>"#);
        let mut config = GalleryConfig::default();
        config.initial_vis = Some(5);
        let h = harness_with(remote, config);
        h.gallery.boot().await.unwrap();

        assert_eq!(h.gallery.session.active(), Some(5));
        h.gallery.open(5).await;
        assert!(!h.status.shown.lock().contains(&"Loading...".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_navigation_swaps_bar_for_overlay() {
        let h = harness(stock_remote());
        h.gallery.boot().await.unwrap();

        h.gallery.open_help();

        assert_eq!(h.history.paths.lock().as_slice(), ["/help/"]);
        let chrome = h.chrome.snapshot();
        assert!(chrome.help);
        assert!(!chrome.action_bar);
    }

    #[tokio::test(start_paused = true)]
    async fn test_embed_toggle_builds_the_snippet() {
        let remote = stock_remote();
        remote.set_view_body(r#"<div id="ajax-view">x</div>"#);
        let h = harness(remote);
        h.gallery.boot().await.unwrap();
        h.gallery.open(5).await;

        h.gallery.toggle_embed();
        assert_eq!(
            h.chrome.snapshot().embed.as_deref(),
            Some(
                "<iframe src=\"http://localhost:8080/graph/5/embed/\" \
                 width=\"1000\" height=\"600\"></iframe>"
            )
        );

        h.gallery.toggle_embed();
        assert_eq!(h.chrome.snapshot().embed, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_view_conceals_an_open_embed_popover() {
        let remote = stock_remote();
        remote.set_view_body(r#"<div id="ajax-view">x</div>"#);
        let h = harness(remote);
        h.gallery.boot().await.unwrap();
        h.gallery.open(5).await;
        h.gallery.toggle_embed();

        h.gallery.clear_view();

        assert_eq!(h.chrome.snapshot().embed, None);
        assert!(h.viewport.content.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_graph_data_passthrough_hits_the_remote() {
        let h = harness(stock_remote());
        h.gallery.boot().await.unwrap();

        let data = h.gallery.graph_data(5).await.unwrap();
        assert!(data.nodes.is_empty());
        assert!(h
            .remote
            .calls()
            .contains(&crate::testkit::RemoteCall::FetchGraphData(5)));
    }
}
