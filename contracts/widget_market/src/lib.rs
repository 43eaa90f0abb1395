//! # Widget Market Contract
//!
//! A permissioned ledger and marketplace for tested widgets. The single
//! Soroban contract `WidgetMarket` registers participants, records per-unit
//! test outcomes, classifies each unit into a quality bin, and sells bin
//! inventory first-in-first-out against a payment token:
//!
//! | Phase        | Entry Point(s)                                   | Role             |
//! |--------------|--------------------------------------------------|------------------|
//! | Bootstrap    | `__constructor`                                  | deployer         |
//! | Roles        | `register_admin`, `register_tester`, `register_sales_distributor`, `register_customer` | Admin |
//! | Catalog      | `add_factory`, `add_test_site`                   | Admin            |
//! | Ledger       | [`WidgetMarket::record_widget_tests`]            | Tester           |
//! | Bin tuning   | `update_unit_price`, `update_bin_mask`           | SalesDistributor |
//! | Sales        | [`WidgetMarket::buy_widgets`]                    | Customer         |
//! | Treasury     | `withdraw_funds`                                 | Admin            |
//! | Breaker      | `begin_emergency`, `end_emergency`               | Admin            |
//! | Queries      | `role_of`, `get_widget`, `get_bin`, `get_contract_balance`, … | anyone |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`rbac`], storage to [`storage`], and each
//! component's rules to [`catalog`], [`ledger`], [`bins`] and [`market`].
//! This file contains only the public entry points.
//!
//! Every fallible entry point returns `Result<_, Error>`. All checks run
//! before the first write, and on `Err` the host discards every storage
//! write, token transfer and event of the call.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String};

mod bins;
mod catalog;
pub mod events;
mod ledger;
mod market;
pub mod rbac;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use bins::BIN_COUNT;
pub use types::{
    Bin, CatalogKind, HaltScope, MarketConfig, PaymentPolicy, Role, UnmatchedPolicy, Widget,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller does not hold the role the entry point requires.
    Unauthorized = 1,
    /// Address already holds a role, or catalog name already listed.
    DuplicateRegistration = 2,
    /// Factory, test site, bin, widget or bin position does not exist.
    UnknownReference = 3,
    InsufficientFunds = 4,
    InventoryExhausted = 5,
    /// Emergency breaker is active.
    Halted = 6,
    /// Results matched no bin and unmatched widgets are rejected.
    UnclassifiedWidget = 7,
    InvalidAmount = 8,
    Overflow = 9,
}

#[contract]
pub struct WidgetMarket;

#[contractimpl]
impl WidgetMarket {
    // ─────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────

    /// Make `admin` the first Admin, fix the payment token and policy, and
    /// seed the three default bins.
    pub fn __constructor(env: Env, admin: Address, payment_token: Address, config: MarketConfig) {
        storage::set_config(&env, &config);
        storage::set_payment_token(&env, &payment_token);
        bins::seed_default_bins(&env);
        rbac::init_admin(&env, &admin);
    }

    pub fn get_config(env: Env) -> MarketConfig {
        storage::get_config(&env)
    }

    pub fn payment_token(env: Env) -> Option<Address> {
        storage::get_payment_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────

    pub fn register_admin(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        Self::register(&env, &caller, &target, Role::Admin)
    }

    pub fn register_tester(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        Self::register(&env, &caller, &target, Role::Tester)
    }

    pub fn register_sales_distributor(
        env: Env,
        caller: Address,
        target: Address,
    ) -> Result<(), Error> {
        Self::register(&env, &caller, &target, Role::SalesDistributor)
    }

    pub fn register_customer(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        Self::register(&env, &caller, &target, Role::Customer)
    }

    /// Return the role held by `address`, or `None`.
    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, &address)
    }

    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, role)
    }

    // ─────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────

    /// Append a factory and return its 0-based index.
    pub fn add_factory(env: Env, caller: Address, name: String) -> Result<u32, Error> {
        Self::require_admin_operation(&env, &caller)?;
        catalog::add(&env, CatalogKind::Factory, name)
    }

    /// Append a test site and return its 0-based index.
    pub fn add_test_site(env: Env, caller: Address, name: String) -> Result<u32, Error> {
        Self::require_admin_operation(&env, &caller)?;
        catalog::add(&env, CatalogKind::TestSite, name)
    }

    pub fn factory_index_of(env: Env, name: String) -> Option<u32> {
        catalog::index_of(&env, CatalogKind::Factory, &name)
    }

    pub fn test_site_index_of(env: Env, name: String) -> Option<u32> {
        catalog::index_of(&env, CatalogKind::TestSite, &name)
    }

    pub fn factory_name(env: Env, index: u32) -> Result<String, Error> {
        catalog::name_at(&env, CatalogKind::Factory, index)
    }

    pub fn test_site_name(env: Env, index: u32) -> Result<String, Error> {
        catalog::name_at(&env, CatalogKind::TestSite, index)
    }

    pub fn factory_count(env: Env) -> u32 {
        catalog::count(&env, CatalogKind::Factory)
    }

    pub fn test_site_count(env: Env) -> u32 {
        catalog::count(&env, CatalogKind::TestSite)
    }

    // ─────────────────────────────────────────────────────────
    // Widget ledger
    // ─────────────────────────────────────────────────────────

    /// Ledger a tested widget and classify it. Returns the assigned bin id.
    ///
    /// `factory` and `test_site` are catalog indices. The widget goes to the
    /// lowest-id bin whose mask is fully covered by `results`.
    pub fn record_widget_tests(
        env: Env,
        caller: Address,
        serial: u64,
        factory: u32,
        test_site: u32,
        results: u32,
    ) -> Result<u32, Error> {
        caller.require_auth();
        rbac::require_role(&env, &caller, Role::Tester)?;
        market::require_operations_open(&env)?;
        let tested = ledger::record(&env, serial, factory, test_site, results)?;
        Ok(tested.bin)
    }

    pub fn get_widget(env: Env, index: u32) -> Result<Widget, Error> {
        ledger::get(&env, index)
    }

    pub fn widget_count(env: Env) -> u32 {
        ledger::count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Bins
    // ─────────────────────────────────────────────────────────

    pub fn update_unit_price(
        env: Env,
        caller: Address,
        bin_id: u32,
        price: i128,
    ) -> Result<(), Error> {
        Self::require_sales_operation(&env, &caller)?;
        bins::update_price(&env, bin_id, price)?;
        events::emit_unit_price_updated(&env, bin_id, price, caller);
        Ok(())
    }

    pub fn update_bin_mask(env: Env, caller: Address, bin_id: u32, mask: u32) -> Result<(), Error> {
        Self::require_sales_operation(&env, &caller)?;
        bins::update_mask(&env, bin_id, mask)?;
        events::emit_bin_mask_updated(&env, bin_id, mask, caller);
        Ok(())
    }

    pub fn get_bin(env: Env, bin_id: u32) -> Result<Bin, Error> {
        bins::load(&env, bin_id)
    }

    pub fn bin_mask(env: Env, bin_id: u32) -> Result<u32, Error> {
        Ok(bins::load(&env, bin_id)?.mask)
    }

    pub fn bin_unit_price(env: Env, bin_id: u32) -> Result<i128, Error> {
        Ok(bins::load(&env, bin_id)?.unit_price)
    }

    pub fn bin_widget_count(env: Env, bin_id: u32) -> Result<u32, Error> {
        Ok(bins::load(&env, bin_id)?.widget_count)
    }

    /// Number of units sold from the bin; the next sale starts at this position.
    pub fn bin_sold_count(env: Env, bin_id: u32) -> Result<u32, Error> {
        Ok(bins::load(&env, bin_id)?.sold_count)
    }

    /// Ledger index of the widget at `position` in the bin's FIFO order.
    pub fn bin_widget(env: Env, bin_id: u32, position: u32) -> Result<u32, Error> {
        bins::member(&env, bin_id, position)
    }

    // ─────────────────────────────────────────────────────────
    // Marketplace
    // ─────────────────────────────────────────────────────────

    /// Buy the next `quantity` unsold widgets of `bin_id`.
    ///
    /// `payment` is pulled from `customer` in the payment token. Checks run in
    /// order: breaker, inventory, payment.
    pub fn buy_widgets(
        env: Env,
        customer: Address,
        bin_id: u32,
        quantity: u32,
        payment: i128,
    ) -> Result<(), Error> {
        customer.require_auth();
        rbac::require_role(&env, &customer, Role::Customer)?;
        market::buy(&env, &customer, bin_id, quantity, payment)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Treasury & emergency control
    // ─────────────────────────────────────────────────────────

    pub fn withdraw_funds(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        Self::require_admin_operation(&env, &caller)?;
        market::withdraw(&env, &caller, amount)
    }

    pub fn get_contract_balance(env: Env) -> i128 {
        market::balance(&env)
    }

    /// Halt purchasing (and, under `HaltScope::AllOperations`, every other
    /// mutation) until `end_emergency`.
    pub fn begin_emergency(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(&env, &caller, Role::Admin)?;
        market::begin_emergency(&env, caller);
        Ok(())
    }

    pub fn end_emergency(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(&env, &caller, Role::Admin)?;
        market::end_emergency(&env, caller);
        Ok(())
    }

    pub fn is_halted(env: Env) -> bool {
        storage::is_halted(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────

    fn register(env: &Env, caller: &Address, target: &Address, role: Role) -> Result<(), Error> {
        Self::require_admin_operation(env, caller)?;
        rbac::register(env, caller, target, role)
    }

    fn require_admin_operation(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(env, caller, Role::Admin)?;
        market::require_operations_open(env)
    }

    fn require_sales_operation(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(env, caller, Role::SalesDistributor)?;
        market::require_operations_open(env)
    }
}
