//! Long-running background task that polls the Soroban RPC and appends
//! decoded market events to the in-memory feed.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::feed::EventFeed;
use crate::rpc;

pub struct WatcherState {
    pub feed: Arc<EventFeed>,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ledger: u32,
    pub cursor: Option<String>,
}

/// Spawn the watcher loop as a background [`tokio`] task.
pub async fn run(state: Arc<WatcherState>) {
    info!("Watcher starting, contract: {}", state.config.contract_id);

    let mut position = Position {
        ledger: state.config.start_ledger,
        cursor: None,
    };
    info!("Watching from ledger {}", position.ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(next) => position = next,
            Err(e) => error!("Watcher poll error: {e}"),
        }

        tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)).await;
    }
}

/// Perform a single poll iteration and return where the next one resumes.
async fn poll_once(state: &WatcherState, position: &Position) -> crate::errors::Result<Position> {
    let page = rpc::fetch_events(
        &state.client,
        &state.config.rpc_url,
        &state.config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        state.config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &state.config.contract_id);
        let inserted = state.feed.push_batch(decoded).await;
        info!(
            "Polled {} raw events → {} new feed entries",
            page.events.len(),
            inserted
        );
    }

    Ok(advance(position, page.cursor, page.latest_ledger))
}

/// Keep paginating with the cursor while the RPC hands one out; the ledger
/// only moves forward.
fn advance(position: &Position, cursor: Option<String>, latest_ledger: Option<u64>) -> Position {
    let ledger = latest_ledger
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX).max(position.ledger))
        .unwrap_or(position.ledger);
    Position { ledger, cursor }
}
