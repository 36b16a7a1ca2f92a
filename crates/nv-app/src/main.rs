//! Terminal front end for the network visualization gallery.
//!
//! Wires the gallery controller to an HTTP backend and a line-based
//! command loop. Mostly useful for poking at a backend without a
//! browser; the controller behaves exactly as it does embedded in one.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use nv_core::VisId;
use nv_gallery::{Gallery, GalleryConfig, Surfaces, ViewScope};
use nv_remote::HttpRemote;

mod surfaces;

use surfaces::{TermChrome, TermHistory, TermList, TermStatus, TermViewport};

const DEFAULT_BASE: &str = "http://localhost:8080";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let base = env::args()
        .nth(1)
        .or_else(|| env::var("NETVIS_BASE").ok())
        .unwrap_or_else(|| DEFAULT_BASE.to_owned());
    let remote = Arc::new(HttpRemote::new(&base)?);
    info!(base = %remote.base(), "gallery backend");

    let config = config_from_env(&base)?;
    let list = Arc::new(TermList::default());
    let chrome = Arc::new(TermChrome::default());
    let gallery = Gallery::new(
        remote,
        Surfaces {
            status: Arc::new(TermStatus),
            list: list.clone(),
            viewport: Arc::new(TermViewport::default()),
            history: Arc::new(TermHistory::default()),
            chrome: chrome.clone(),
        },
        config,
    );

    gallery.boot().await?;
    println!(
        "{} visualizations loaded. Type `help` for commands.",
        gallery.index.len()
    );

    repl(&gallery, &list, &chrome).await
}

/// Assemble the controller configuration from `NETVIS_*` variables,
/// falling back to defaults. Durations use humantime syntax, e.g.
/// `NETVIS_POLL_INTERVAL=2s`; `NETVIS_SCOPE=standalone` splices fetched
/// pages whole instead of carving out the marker region.
fn config_from_env(base: &str) -> Result<GalleryConfig> {
    let mut config = GalleryConfig::default();
    config.hostname =
        env::var("NETVIS_HOSTNAME").unwrap_or_else(|_| base.trim_end_matches('/').to_owned());
    if let Ok(raw) = env::var("NETVIS_INITIAL") {
        let id = raw
            .parse::<VisId>()
            .with_context(|| format!("parsing NETVIS_INITIAL={raw}"))?;
        config.initial_vis = Some(id);
    }
    if let Ok(raw) = env::var("NETVIS_SCOPE") {
        config.view_scope = ViewScope::from_name(&raw)
            .with_context(|| format!("parsing NETVIS_SCOPE={raw} (embedded|standalone)"))?;
    }
    config.poll_interval = duration_env("NETVIS_POLL_INTERVAL", config.poll_interval)?;
    config.settle_delay = duration_env("NETVIS_SETTLE_DELAY", config.settle_delay)?;
    config.autohide = duration_env("NETVIS_AUTOHIDE", config.autohide)?;
    Ok(config)
}

fn duration_env(name: &str, default: Duration) -> Result<Duration> {
    match env::var(name) {
        Ok(raw) => {
            humantime::parse_duration(&raw).with_context(|| format!("parsing {name}={raw}"))
        }
        Err(_) => Ok(default),
    }
}

async fn repl(gallery: &Gallery, list: &TermList, chrome: &TermChrome) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !dispatch(gallery, list, chrome, line).await {
            break;
        }
    }
    Ok(())
}

/// Run one command. Returns false when the loop should end.
async fn dispatch(gallery: &Gallery, list: &TermList, chrome: &TermChrome, line: &str) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "ls" => {
            for row in list.render() {
                println!("{row}");
            }
        }
        "open" => match rest.parse::<VisId>() {
            Ok(id) => gallery.entry_clicked(id).await,
            Err(_) => println!("usage: open <id>"),
        },
        "new" => gallery.begin_create(),
        "edit" => gallery.begin_edit(),
        "name" => chrome.set_name(rest),
        "link" => chrome.set_link(rest),
        "public" => match rest {
            "on" => chrome.set_public(true),
            "off" => chrome.set_public(false),
            _ => println!("usage: public on|off"),
        },
        "save" => gallery.save(),
        "cancel" => gallery.leave_to_browse(),
        "delete" => gallery.delete(),
        "refresh" => gallery.refresh(),
        "data" => match rest.parse::<VisId>() {
            Ok(id) => match gallery.graph_data(id).await {
                Ok(data) => println!("{} nodes, {} links", data.nodes.len(), data.links.len()),
                Err(err) => println!("! {err:#}"),
            },
            Err(_) => println!("usage: data <id>"),
        },
        "embed" => gallery.toggle_embed(),
        "dismiss" => gallery.status.hide(),
        "help" => gallery.open_help(),
        "quit" | "exit" => return false,
        _ => print_usage(),
    }
    true
}

fn print_usage() {
    println!("commands:");
    println!("  ls               list visualizations");
    println!("  open <id>        open one in the viewport");
    println!("  new              start creating a visualization");
    println!("  edit             edit the open one");
    println!("  name <text>      set the form name");
    println!("  link <url>       set the form spreadsheet link");
    println!("  public on|off    set the form visibility");
    println!("  save             submit the form");
    println!("  cancel           close the editor");
    println!("  delete           delete the open one");
    println!("  refresh          re-import its spreadsheet data");
    println!("  data <id>        fetch the raw node/link payload");
    println!("  embed            toggle the embed snippet");
    println!("  dismiss          clear the status line");
    println!("  help             show the page help");
    println!("  quit");
}
