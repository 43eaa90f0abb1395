//! # Types
//!
//! Shared data structures used across all modules of the widget market.
//!
//! ## Design decisions
//!
//! ### Widgets are immutable
//!
//! A [`Widget`] is written once by `record_widget_tests` and never touched
//! again. The bin it landed in is stored alongside the test results so that
//! later mask changes cannot be mistaken for a reclassification.
//!
//! ### Bins carry counters, not lists
//!
//! A [`Bin`] holds only its tuning (`mask`, `unit_price`) and two counters.
//! The FIFO membership list lives in separate persistent entries keyed by
//! `(bin, position)`, so a classification writes one small entry instead of
//! rewriting a growing vector:
//!
//! ```text
//! position:   0   1   2   3   4
//!           [ w0, w3, w4, w7, w9 ]      widget_count = 5
//!             └── sold ──┘              sold_count   = 3
//! ```
//!
//! `sold_count <= widget_count` always holds.

use soroban_sdk::contracttype;

/// The single role an address may hold.
///
/// Discriminants are stable and surface in events and queries.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    /// Registers participants, maintains the catalog, withdraws proceeds,
    /// and controls the emergency breaker.
    Admin = 1,
    /// Records widget test results.
    Tester = 2,
    /// Tunes bin masks and unit prices.
    SalesDistributor = 3,
    /// Buys widgets from bins.
    Customer = 4,
}

/// Which of the two catalog lists an entry belongs to.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CatalogKind {
    Factory = 0,
    TestSite = 1,
}

/// A tested widget as recorded on the ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Widget {
    /// Manufacturer serial number.
    pub serial: u64,
    /// Index into the factory catalog.
    pub factory: u32,
    /// Index into the test-site catalog.
    pub test_site: u32,
    /// 32-bit pass/fail mask, one bit per test.
    pub results: u32,
    /// Bin the widget was classified into at recording time.
    pub bin: u32,
}

/// A quality tier.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bin {
    /// Fixed identifier, 1 is the strictest tier.
    pub id: u32,
    /// Every bit set here must be set in a widget's results to match.
    pub mask: u32,
    /// Price of one widget in the payment token's smallest unit.
    pub unit_price: i128,
    /// Number of widgets ever classified into this bin.
    pub widget_count: u32,
    /// Number of widgets sold, always the oldest `sold_count` members.
    pub sold_count: u32,
}

impl Bin {
    /// Units still available for purchase.
    pub fn remaining(&self) -> u32 {
        self.widget_count - self.sold_count
    }
}

/// Which operations the emergency breaker blocks.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum HaltScope {
    /// Only `buy_widgets` is blocked.
    PurchasesOnly = 0,
    /// Every mutating entry point except the breaker controls is blocked.
    AllOperations = 1,
}

/// How `buy_widgets` compares the attached payment with the price.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PaymentPolicy {
    /// Payment must equal `quantity * unit_price`.
    ExactOnly = 0,
    /// Payment may exceed the price; only the price is taken from the buyer.
    RefundExcess = 1,
}

/// What happens to a widget whose results match no bin.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum UnmatchedPolicy {
    /// Fail the recording with `Error::UnclassifiedWidget`.
    Reject = 0,
    /// Place the widget in the highest-id (least strict) bin.
    LowestTier = 1,
}

/// Deploy-time policy, fixed for the contract's lifetime.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    pub halt_scope: HaltScope,
    pub payment_policy: PaymentPolicy,
    pub unmatched_policy: UnmatchedPolicy,
}

impl MarketConfig {
    /// Purchases-only breaker, exact payment, reject unmatched widgets.
    pub fn standard() -> Self {
        MarketConfig {
            halt_scope: HaltScope::PurchasesOnly,
            payment_policy: PaymentPolicy::ExactOnly,
            unmatched_policy: UnmatchedPolicy::Reject,
        }
    }
}
