//! The reqwest-backed remote.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use nv_core::{GraphData, IndexRow, RemoteAuthority, VisForm, VisId};

use crate::{wire, RemoteError, Result};

/// Remote authority talking to the backend over HTTP.
///
/// Paths mirror the backend router exactly; the trailing slashes on the
/// mutation endpoints are significant to it.
pub struct HttpRemote {
    base: Url,
    client: Client,
}

impl HttpRemote {
    /// Build a remote rooted at `base`, e.g. `http://localhost:8080`.
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self::with_client(parse_base(base)?, Client::new()))
    }

    /// Build a remote with a caller-configured client.
    pub fn with_client(base: Url, client: Client) -> Self {
        Self { base, client }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        check(resp).await
    }

    async fn post_form(&self, path: &str, form: &VisForm) -> Result<()> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let resp = self.client.post(url).form(&form.to_pairs()).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// `Url::join` treats a base without a trailing slash as a file path, so
/// make sure there is one.
fn parse_base(base: &str) -> Result<Url> {
    let mut normalized = base.trim_end_matches('/').to_owned();
    normalized.push('/');
    Ok(Url::parse(&normalized)?)
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Http { status, body })
}

#[async_trait]
impl RemoteAuthority for HttpRemote {
    async fn fetch_index(&self) -> anyhow::Result<Vec<IndexRow>> {
        let raw: Vec<Vec<serde_json::Value>> = self
            .get("data.json")
            .await?
            .json()
            .await
            .map_err(RemoteError::Transport)?;
        Ok(wire::decode_index(&raw)?)
    }

    async fn fetch_view(&self, id: VisId) -> anyhow::Result<String> {
        let body = self
            .get(&format!("graph/{id}"))
            .await?
            .text()
            .await
            .map_err(RemoteError::Transport)?;
        Ok(body)
    }

    async fn fetch_graph_data(&self, id: VisId) -> anyhow::Result<GraphData> {
        let data = self
            .get(&format!("data/{id}"))
            .await?
            .json()
            .await
            .map_err(RemoteError::Transport)?;
        Ok(data)
    }

    async fn create(&self, form: &VisForm) -> anyhow::Result<()> {
        Ok(self.post_form("graph/create/", form).await?)
    }

    async fn update(&self, id: VisId, form: &VisForm) -> anyhow::Result<()> {
        Ok(self.post_form(&format!("graph/{id}/update/"), form).await?)
    }

    async fn delete(&self, id: VisId, form: &VisForm) -> anyhow::Result<()> {
        Ok(self.post_form(&format!("graph/{id}/delete/"), form).await?)
    }

    async fn reload(&self, id: VisId) -> anyhow::Result<()> {
        self.get(&format!("graph/{id}/reload/")).await?;
        Ok(())
    }
}
