//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the market:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                   | Type           | Description                          |
//! |-----------------------|----------------|--------------------------------------|
//! | `Config`              | `MarketConfig` | Deploy-time policy                   |
//! | `PaymentToken`        | `Address`      | Token accepted for purchases         |
//! | `Treasury`            | `i128`         | Accumulated, unwithdrawn proceeds    |
//! | `Halted`              | `bool`         | Emergency breaker flag               |
//! | `WidgetCount`         | `u32`          | Length of the widget ledger          |
//! | `CatalogCount(kind)`  | `u32`          | Length of a catalog list             |
//! | `Bin(id)`             | `Bin`          | Tuning and counters of one bin       |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                        | Type      | Description                          |
//! |----------------------------|-----------|--------------------------------------|
//! | `Role(address)`            | `Role`    | Role held by an address              |
//! | `CatalogName(kind, index)` | `String`  | Catalog entry name                   |
//! | `CatalogIndex(kind, name)` | `u32`     | Reverse lookup, guards duplicates    |
//! | `Widget(index)`            | `Widget`  | Ledgered widget                      |
//! | `BinMember(bin, position)` | `u32`     | Widget ledger index, FIFO per bin    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, String};

use crate::types::{Bin, CatalogKind, MarketConfig, Role, Widget};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    PaymentToken,
    Treasury,
    Halted,
    WidgetCount,
    CatalogCount(CatalogKind),
    Bin(u32),
    Role(Address),
    CatalogName(CatalogKind, u32),
    CatalogIndex(CatalogKind, String),
    Widget(u32),
    BinMember(u32, u32),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_config(env: &Env, config: &MarketConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Falls back to [`MarketConfig::standard`] if construction never stored one.
pub fn get_config(env: &Env) -> MarketConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(MarketConfig::standard)
}

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::PaymentToken, token);
    bump_instance(env);
}

pub fn get_payment_token(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::PaymentToken)
}

pub fn get_treasury(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Treasury)
        .unwrap_or(0)
}

pub fn set_treasury(env: &Env, balance: i128) {
    env.storage().instance().set(&DataKey::Treasury, &balance);
    bump_instance(env);
}

pub fn is_halted(env: &Env) -> bool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Halted)
        .unwrap_or(false)
}

pub fn set_halted(env: &Env, halted: bool) {
    env.storage().instance().set(&DataKey::Halted, &halted);
    bump_instance(env);
}

pub fn get_widget_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::WidgetCount)
        .unwrap_or(0)
}

pub fn get_catalog_count(env: &Env, kind: CatalogKind) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CatalogCount(kind))
        .unwrap_or(0)
}

pub fn load_bin(env: &Env, id: u32) -> Option<Bin> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Bin(id))
}

pub fn save_bin(env: &Env, bin: &Bin) {
    env.storage().instance().set(&DataKey::Bin(bin.id), bin);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Bump `key` only when the read found a value; extending a missing entry traps.
fn bump_if_present(env: &Env, key: &DataKey, present: bool) {
    if present {
        bump_persistent(env, key);
    }
}

pub fn get_role(env: &Env, address: &Address) -> Option<Role> {
    let key = DataKey::Role(address.clone());
    let role: Option<Role> = env.storage().persistent().get(&key);
    bump_if_present(env, &key, role.is_some());
    role
}

pub fn set_role(env: &Env, address: &Address, role: Role) {
    let key = DataKey::Role(address.clone());
    env.storage().persistent().set(&key, &role);
    bump_persistent(env, &key);
}

pub fn get_catalog_index(env: &Env, kind: CatalogKind, name: &String) -> Option<u32> {
    let key = DataKey::CatalogIndex(kind, name.clone());
    let index: Option<u32> = env.storage().persistent().get(&key);
    bump_if_present(env, &key, index.is_some());
    index
}

pub fn get_catalog_name(env: &Env, kind: CatalogKind, index: u32) -> Option<String> {
    let key = DataKey::CatalogName(kind, index);
    let name: Option<String> = env.storage().persistent().get(&key);
    bump_if_present(env, &key, name.is_some());
    name
}

/// Append `name` to the `kind` list and index it. Returns the new length.
///
/// The caller is responsible for rejecting duplicates first.
pub fn append_catalog_entry(env: &Env, kind: CatalogKind, name: &String) -> u32 {
    let index = get_catalog_count(env, kind);
    let name_key = DataKey::CatalogName(kind, index);
    let index_key = DataKey::CatalogIndex(kind, name.clone());

    env.storage().persistent().set(&name_key, name);
    env.storage().persistent().set(&index_key, &index);
    bump_persistent(env, &name_key);
    bump_persistent(env, &index_key);

    let count = index + 1;
    env.storage()
        .instance()
        .set(&DataKey::CatalogCount(kind), &count);
    bump_instance(env);
    count
}

pub fn load_widget(env: &Env, index: u32) -> Option<Widget> {
    let key = DataKey::Widget(index);
    let widget: Option<Widget> = env.storage().persistent().get(&key);
    bump_if_present(env, &key, widget.is_some());
    widget
}

/// Append `widget` to the ledger. Returns its ledger index.
pub fn append_widget(env: &Env, widget: &Widget) -> u32 {
    let index = get_widget_count(env);
    let key = DataKey::Widget(index);
    env.storage().persistent().set(&key, widget);
    bump_persistent(env, &key);

    env.storage()
        .instance()
        .set(&DataKey::WidgetCount, &(index + 1));
    bump_instance(env);
    index
}

pub fn get_bin_member(env: &Env, bin: u32, position: u32) -> Option<u32> {
    let key = DataKey::BinMember(bin, position);
    let member: Option<u32> = env.storage().persistent().get(&key);
    bump_if_present(env, &key, member.is_some());
    member
}

pub fn set_bin_member(env: &Env, bin: u32, position: u32, widget_index: u32) {
    let key = DataKey::BinMember(bin, position);
    env.storage().persistent().set(&key, &widget_index);
    bump_persistent(env, &key);
}
