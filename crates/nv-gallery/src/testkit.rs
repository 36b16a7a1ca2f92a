//! Test doubles: a scripted remote and recording surfaces, plus a
//! harness that wires a controller to all of them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use nv_core::{
    DatasetRef, EntryBinding, EntryList, FormField, GraphData, History, IndexRow, PageChrome,
    RemoteAuthority, SaveLabel, StatusSurface, ViewportSurface, VisForm, VisId,
};

use crate::config::GalleryConfig;
use crate::gallery::{Gallery, Surfaces};

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    FetchIndex,
    FetchView(VisId),
    FetchGraphData(VisId),
    Create(VisForm),
    Update(VisId, VisForm),
    Delete(VisId, VisForm),
    Reload(VisId),
}

impl RemoteCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            RemoteCall::Create(_) | RemoteCall::Update(..) | RemoteCall::Delete(..)
        )
    }
}

/// Remote double driven entirely by test state.
///
/// Answers from in-memory snapshots, optionally after a simulated
/// round-trip time, and can be switched into a failing state where every
/// call errors with a canned response body.
#[derive(Default)]
pub struct ScriptedRemote {
    rows: RwLock<Vec<IndexRow>>,
    view_body: RwLock<String>,
    fail_body: RwLock<Option<String>>,
    latency: RwLock<Duration>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl ScriptedRemote {
    pub fn with_rows(rows: Vec<IndexRow>) -> Arc<Self> {
        let remote = Self::default();
        *remote.rows.write() = rows;
        Arc::new(remote)
    }

    pub fn row(id: VisId, name: &str, dataset: &str, is_public: bool) -> IndexRow {
        IndexRow {
            id,
            name: name.to_owned(),
            dataset: DatasetRef::new(dataset),
            is_public,
            thumb: None,
        }
    }

    /// Replace the index snapshot served by `fetch_index`.
    pub fn set_rows(&self, rows: Vec<IndexRow>) {
        *self.rows.write() = rows;
    }

    /// Replace the page served by `fetch_view`.
    pub fn set_view_body(&self, body: &str) {
        *self.view_body.write() = body.to_owned();
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Fail every subsequent call with this response body.
    pub fn set_fail(&self, body: &str) {
        *self.fail_body.write() = Some(body.to_owned());
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    pub fn count_fetch_index(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, RemoteCall::FetchIndex))
            .count()
    }

    pub fn count_reload(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, RemoteCall::Reload(_)))
            .count()
    }

    /// Record the call, simulate the round trip, then succeed or fail per
    /// the current script.
    async fn gate(&self, call: RemoteCall) -> Result<()> {
        self.calls.lock().push(call);
        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if let Some(body) = self.fail_body.read().clone() {
            return Err(anyhow!("{body}"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteAuthority for ScriptedRemote {
    async fn fetch_index(&self) -> Result<Vec<IndexRow>> {
        self.gate(RemoteCall::FetchIndex).await?;
        Ok(self.rows.read().clone())
    }

    async fn fetch_view(&self, id: VisId) -> Result<String> {
        self.gate(RemoteCall::FetchView(id)).await?;
        Ok(self.view_body.read().clone())
    }

    async fn fetch_graph_data(&self, id: VisId) -> Result<GraphData> {
        self.gate(RemoteCall::FetchGraphData(id)).await?;
        Ok(GraphData::default())
    }

    async fn create(&self, form: &VisForm) -> Result<()> {
        self.gate(RemoteCall::Create(form.clone())).await
    }

    async fn update(&self, id: VisId, form: &VisForm) -> Result<()> {
        self.gate(RemoteCall::Update(id, form.clone())).await
    }

    async fn delete(&self, id: VisId, form: &VisForm) -> Result<()> {
        self.gate(RemoteCall::Delete(id, form.clone())).await
    }

    async fn reload(&self, id: VisId) -> Result<()> {
        self.gate(RemoteCall::Reload(id)).await
    }
}

/// State of one recorded listing row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowState {
    pub id: Option<VisId>,
    pub label: String,
    pub selected: bool,
    pub attached: bool,
    pub pending: bool,
}

struct FakeRow(Arc<Mutex<RowState>>);

impl EntryBinding for FakeRow {
    fn set_label(&self, label: &str) {
        self.0.lock().label = label.to_owned();
    }

    fn set_selected(&self, selected: bool) {
        self.0.lock().selected = selected;
    }

    fn promote(&self, id: VisId, label: &str) {
        let mut row = self.0.lock();
        row.id = Some(id);
        row.label = label.to_owned();
        row.pending = false;
    }

    fn detach(&self) {
        self.0.lock().attached = false;
    }
}

/// Listing double that keeps every row it ever handed out.
#[derive(Default)]
pub struct RecordingList {
    rows: Mutex<Vec<Arc<Mutex<RowState>>>>,
}

impl RecordingList {
    /// All rows, detached ones included, in display order.
    pub fn snapshot(&self) -> Vec<RowState> {
        self.rows.lock().iter().map(|row| row.lock().clone()).collect()
    }

    /// Rows still attached, in display order.
    pub fn attached(&self) -> Vec<RowState> {
        self.snapshot().into_iter().filter(|row| row.attached).collect()
    }

    fn push(&self, state: RowState, front: bool) -> Arc<dyn EntryBinding> {
        let slot = Arc::new(Mutex::new(state));
        let mut rows = self.rows.lock();
        if front {
            rows.insert(0, slot.clone());
        } else {
            rows.push(slot.clone());
        }
        Arc::new(FakeRow(slot))
    }
}

impl EntryList for RecordingList {
    fn bind(&self, id: VisId, label: &str) -> Arc<dyn EntryBinding> {
        self.push(
            RowState {
                id: Some(id),
                label: label.to_owned(),
                attached: true,
                ..RowState::default()
            },
            false,
        )
    }

    fn insert_pending(&self) -> Arc<dyn EntryBinding> {
        self.push(
            RowState {
                label: "...".to_owned(),
                attached: true,
                pending: true,
                ..RowState::default()
            },
            true,
        )
    }

    fn deselect_all(&self) {
        for row in self.rows.lock().iter() {
            row.lock().selected = false;
        }
    }
}

/// Status surface that logs everything shown.
#[derive(Default)]
pub struct RecordingStatus {
    pub shown: Mutex<Vec<String>>,
    pub hides: Mutex<usize>,
}

impl StatusSurface for RecordingStatus {
    fn show(&self, text: &str, _error: bool, _dismissable: bool) {
        self.shown.lock().push(text.to_owned());
    }

    fn hide(&self) {
        *self.hides.lock() += 1;
    }
}

/// Viewport double holding the last spliced content.
#[derive(Default)]
pub struct RecordingViewport {
    pub content: Mutex<Option<String>>,
}

impl ViewportSurface for RecordingViewport {
    fn splice(&self, content: &str) {
        *self.content.lock() = Some(content.to_owned());
    }

    fn clear(&self) {
        *self.content.lock() = None;
    }
}

/// History double recording pushed paths.
#[derive(Default)]
pub struct RecordingHistory {
    pub paths: Mutex<Vec<String>>,
}

impl History for RecordingHistory {
    fn push(&self, path: &str) {
        self.paths.lock().push(path.to_owned());
    }
}

/// Chrome state as the controller last left it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeState {
    pub panel_open: bool,
    pub action_bar: bool,
    pub help: bool,
    pub save_label: Option<SaveLabel>,
    pub delete_visible: bool,
    pub edit_enabled: bool,
    pub refresh_enabled: bool,
    pub refresh_tip: bool,
    pub form: VisForm,
    pub focused: Option<FormField>,
    pub embed: Option<String>,
}

impl Default for ChromeState {
    fn default() -> Self {
        Self {
            panel_open: false,
            action_bar: false,
            help: false,
            save_label: None,
            delete_visible: false,
            edit_enabled: true,
            refresh_enabled: true,
            refresh_tip: false,
            form: VisForm::default(),
            focused: None,
            embed: None,
        }
    }
}

/// Chrome double backed by one mutable state snapshot.
#[derive(Default)]
pub struct RecordingChrome {
    state: Mutex<ChromeState>,
}

impl RecordingChrome {
    pub fn snapshot(&self) -> ChromeState {
        self.state.lock().clone()
    }

    /// Simulate the user typing into the form.
    pub fn type_form(&self, form: VisForm) {
        self.state.lock().form = form;
    }
}

impl PageChrome for RecordingChrome {
    fn set_panel_open(&self, open: bool) {
        self.state.lock().panel_open = open;
    }

    fn set_action_bar_visible(&self, visible: bool) {
        self.state.lock().action_bar = visible;
    }

    fn set_help_visible(&self, visible: bool) {
        self.state.lock().help = visible;
    }

    fn set_save_label(&self, label: SaveLabel) {
        self.state.lock().save_label = Some(label);
    }

    fn set_delete_visible(&self, visible: bool) {
        self.state.lock().delete_visible = visible;
    }

    fn set_edit_enabled(&self, enabled: bool) {
        self.state.lock().edit_enabled = enabled;
    }

    fn set_refresh_enabled(&self, enabled: bool) {
        self.state.lock().refresh_enabled = enabled;
    }

    fn set_refresh_tip_visible(&self, visible: bool) {
        self.state.lock().refresh_tip = visible;
    }

    fn fill_form(&self, form: &VisForm) {
        self.state.lock().form = form.clone();
    }

    fn read_form(&self) -> VisForm {
        self.state.lock().form.clone()
    }

    fn focus_field(&self, field: FormField) {
        self.state.lock().focused = Some(field);
    }

    fn show_embed(&self, snippet: &str) {
        self.state.lock().embed = Some(snippet.to_owned());
    }

    fn hide_embed(&self) {
        self.state.lock().embed = None;
    }
}

/// A controller wired to doubles, with handles kept for assertions.
pub struct Harness {
    pub gallery: Gallery,
    pub remote: Arc<ScriptedRemote>,
    pub status: Arc<RecordingStatus>,
    pub list: Arc<RecordingList>,
    pub viewport: Arc<RecordingViewport>,
    pub history: Arc<RecordingHistory>,
    pub chrome: Arc<RecordingChrome>,
}

pub fn harness(remote: Arc<ScriptedRemote>) -> Harness {
    harness_with(remote, GalleryConfig::default())
}

pub fn harness_with(remote: Arc<ScriptedRemote>, config: GalleryConfig) -> Harness {
    let status = Arc::new(RecordingStatus::default());
    let list = Arc::new(RecordingList::default());
    let viewport = Arc::new(RecordingViewport::default());
    let history = Arc::new(RecordingHistory::default());
    let chrome = Arc::new(RecordingChrome::default());
    let gallery = Gallery::new(
        remote.clone(),
        Surfaces {
            status: status.clone(),
            list: list.clone(),
            viewport: viewport.clone(),
            history: history.clone(),
            chrome: chrome.clone(),
        },
        config,
    );
    Harness {
        gallery,
        remote,
        status,
        list,
        viewport,
        history,
        chrome,
    }
}

/// Let spawned tasks and due timers run, advancing the paused clock.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
