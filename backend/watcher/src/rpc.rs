//! Soroban RPC client: polls `getEvents` and decodes widget market events.
//!
//! Events are requested with `xdrFormat: "json"`, so topics and data arrive
//! as JSON-encoded `ScVal`s (`{"symbol":"widget_sale"}`, `{"u32":1}`,
//! `{"map":[{"key":…,"val":…}]}`) rather than base64 XDR.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{Result, WatcherError};
use crate::events::{EventKind, MarketEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list as JSON `ScVal`s
    #[serde(rename = "topicJson", default)]
    pub topic: Vec<Value>,
    /// Event data as a JSON `ScVal`
    #[serde(rename = "valueJson", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// What one `getEvents` page returned.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`:       optional opaque pagination cursor from a previous response.
/// * `limit`:        maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = wait(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = wait(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(WatcherError::Rpc(format!(
                    "hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = wait(backoff).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| WatcherError::Rpc("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

/// Sleep for `backoff` seconds and return the next, doubled delay.
async fn wait(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    next_backoff(backoff)
}

fn next_backoff(backoff: u64) -> u64 {
    (backoff * 2).min(MAX_BACKOFF_SECS)
}

/// Invalid request / method not found will not succeed on retry.
fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`MarketEvent`] structs.
///
/// Events from failed contract calls were rolled back and are skipped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<MarketEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<MarketEvent> {
    let kind = EventKind::from_topic(&scalar(raw.topic.first()?)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let bin = if kind.has_bin_topic() {
        raw.topic
            .get(1)
            .and_then(scalar)
            .and_then(|b| b.parse().ok())
    } else {
        None
    };

    let Decoded {
        actor,
        amount,
        detail,
    } = decode_data(&raw.value, kind);

    Some(MarketEvent {
        id: raw.id.clone(),
        event_type: kind.as_str().to_string(),
        bin,
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Default)]
struct Decoded {
    actor: Option<String>,
    amount: Option<String>,
    detail: Option<String>,
}

/// Pull fields out of the event data. Payload structs arrive as `ScVal` maps
/// keyed by field-name symbols.
fn decode_data(value: &Value, kind: EventKind) -> Decoded {
    match kind {
        EventKind::AdminRegistered
        | EventKind::TesterRegistered
        | EventKind::SalesDistributorRegistered
        | EventKind::CustomerRegistered => Decoded {
            actor: field(value, "address"),
            detail: field(value, "registered_by"),
            ..Decoded::default()
        },
        EventKind::FactoryAdded | EventKind::TestSiteAdded => Decoded {
            detail: field(value, "name"),
            ..Decoded::default()
        },
        EventKind::WidgetTested => Decoded {
            detail: field(value, "serial"),
            ..Decoded::default()
        },
        EventKind::UnitPriceUpdated => Decoded {
            actor: field(value, "sales_distributor"),
            amount: field(value, "price"),
            ..Decoded::default()
        },
        EventKind::BinMaskUpdated => Decoded {
            actor: field(value, "sales_distributor"),
            detail: field(value, "mask"),
            ..Decoded::default()
        },
        EventKind::WidgetSale => Decoded {
            actor: field(value, "customer"),
            amount: field(value, "total_paid"),
            detail: field(value, "quantity"),
        },
        EventKind::FundsWithdrawn => Decoded {
            actor: field(value, "withdrawer"),
            amount: field(value, "amount"),
            ..Decoded::default()
        },
        EventKind::EmergencyBegun | EventKind::EmergencyEnded => Decoded {
            actor: scalar(value),
            ..Decoded::default()
        },
        EventKind::Unknown => Decoded::default(),
    }
}

/// Look up `name` in an `ScVal` map and render its value as a string.
fn field(value: &Value, name: &str) -> Option<String> {
    value
        .get("map")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("key").and_then(scalar).as_deref() == Some(name))
        .and_then(|entry| entry.get("val"))
        .and_then(scalar)
}

/// Render a scalar `ScVal` (`{"symbol":"x"}`, `{"u32":1}`, `{"i128":"5"}`,
/// `{"address":"G…"}`) as a plain string. Integers wider than 32 bits may
/// arrive as decimal strings or, for 128-bit values, as `{"hi":…,"lo":…}`.
fn scalar(value: &Value) -> Option<String> {
    let (tag, inner) = value.as_object()?.iter().next()?;
    match tag.as_str() {
        "symbol" | "string" | "address" => inner.as_str().map(String::from),
        "bool" => inner.as_bool().map(|b| b.to_string()),
        "u32" | "i32" | "u64" | "i64" | "timepoint" | "duration" => number(inner),
        "u128" | "i128" => number(inner).or_else(|| int128_parts(inner, tag == "i128")),
        _ => None,
    }
}

fn number(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.parse::<i128>().is_ok() || s.parse::<u128>().is_ok() => {
            Some(s.clone())
        }
        _ => None,
    }
}

fn int128_parts(value: &Value, signed: bool) -> Option<String> {
    let hi = value.get("hi")?;
    let lo = value.get("lo")?.as_u64()?;
    if signed {
        let hi = hi.as_i64()?;
        Some(((i128::from(hi) << 64) | i128::from(lo)).to_string())
    } else {
        let hi = hi.as_u64()?;
        Some(((u128::from(hi) << 64) | u128::from(lo)).to_string())
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
