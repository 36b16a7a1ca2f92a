//! The remote authority: the server that owns the catalog.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::{DatasetRef, VisId};

/// One row of the catalog index as served by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub id: VisId,
    pub name: String,
    pub dataset: DatasetRef,
    pub is_public: bool,
    /// Thumbnail URL, when the backend has rendered one.
    pub thumb: Option<String>,
}

/// The editor form as submitted to the backend.
///
/// Mirrors the server-side form field for field, including the checkbox
/// convention for `is_public`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisForm {
    pub name: String,
    pub spreadsheet_link: String,
    pub is_public: bool,
    /// Set when editing an existing entry. Delete requests require it.
    pub vis_id: Option<VisId>,
}

impl VisForm {
    /// Encode as form pairs the backend understands.
    ///
    /// `is_public` follows checkbox semantics: present as `"on"` when set,
    /// absent otherwise.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("name", self.name.clone()),
            ("spreadsheet_link", self.spreadsheet_link.clone()),
        ];
        if self.is_public {
            pairs.push(("is_public", "on".to_owned()));
        }
        if let Some(id) = self.vis_id {
            pairs.push(("graph_id", id.to_string()));
        }
        pairs
    }
}

/// One node of a visualization's force-directed graph payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(default)]
    pub is_category: bool,
    #[serde(default)]
    pub group: Option<u32>,
    #[serde(default)]
    pub importance: i64,
    #[serde(default)]
    pub node_style: String,
    #[serde(default)]
    pub label_style: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub context_url: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
}

/// One edge, referring to nodes by position in the node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
}

/// The raw node/link payload behind one visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

/// Client side of the backend protocol.
///
/// Every call maps to one request. Implementations do not retry; the
/// controller owns failure handling.
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Fetch the full catalog index.
    async fn fetch_index(&self) -> Result<Vec<IndexRow>>;

    /// Fetch the server-rendered view page for one visualization.
    async fn fetch_view(&self, id: VisId) -> Result<String>;

    /// Fetch the node/link payload for one visualization.
    async fn fetch_graph_data(&self, id: VisId) -> Result<GraphData>;

    /// Ask the server to create a new visualization.
    async fn create(&self, form: &VisForm) -> Result<()>;

    /// Ask the server to update an existing visualization.
    async fn update(&self, id: VisId, form: &VisForm) -> Result<()>;

    /// Ask the server to delete a visualization.
    async fn delete(&self, id: VisId, form: &VisForm) -> Result<()>;

    /// Ask the server to re-import a visualization's spreadsheet data.
    async fn reload(&self, id: VisId) -> Result<()>;
}
