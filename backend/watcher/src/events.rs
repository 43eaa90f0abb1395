//! Canonical event types emitted by the widget market contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/widget_market/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the widget market contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AdminRegistered,
    TesterRegistered,
    SalesDistributorRegistered,
    CustomerRegistered,
    FactoryAdded,
    TestSiteAdded,
    /// A widget was ledgered and binned (`new_tested_widget` topic).
    WidgetTested,
    UnitPriceUpdated,
    BinMaskUpdated,
    /// Units were sold from a bin (`widget_sale` topic).
    WidgetSale,
    FundsWithdrawn,
    EmergencyBegun,
    EmergencyEnded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "new_admin" => Self::AdminRegistered,
            "new_tester" => Self::TesterRegistered,
            "new_sales_distributor" => Self::SalesDistributorRegistered,
            "new_customer" => Self::CustomerRegistered,
            "new_factory" => Self::FactoryAdded,
            "new_test_site" => Self::TestSiteAdded,
            "new_tested_widget" => Self::WidgetTested,
            "new_unit_price" => Self::UnitPriceUpdated,
            "new_bin_mask" => Self::BinMaskUpdated,
            "widget_sale" => Self::WidgetSale,
            "funds_withdrawn" => Self::FundsWithdrawn,
            "emergency_begun" => Self::EmergencyBegun,
            "emergency_ended" => Self::EmergencyEnded,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminRegistered => "admin_registered",
            Self::TesterRegistered => "tester_registered",
            Self::SalesDistributorRegistered => "sales_distributor_registered",
            Self::CustomerRegistered => "customer_registered",
            Self::FactoryAdded => "factory_added",
            Self::TestSiteAdded => "test_site_added",
            Self::WidgetTested => "widget_tested",
            Self::UnitPriceUpdated => "unit_price_updated",
            Self::BinMaskUpdated => "bin_mask_updated",
            Self::WidgetSale => "widget_sale",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::EmergencyBegun => "emergency_begun",
            Self::EmergencyEnded => "emergency_ended",
            Self::Unknown => "unknown",
        }
    }

    /// Kinds whose second topic is a bin id.
    pub fn has_bin_topic(&self) -> bool {
        matches!(
            self,
            Self::WidgetTested | Self::UnitPriceUpdated | Self::BinMaskUpdated | Self::WidgetSale
        )
    }
}

/// A decoded widget market event, as served by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// RPC event id, unique per event; used to drop re-fetched duplicates.
    pub id: Option<String>,
    pub event_type: String,
    pub bin: Option<u32>,
    /// Address acting in or targeted by the event.
    pub actor: Option<String>,
    /// Token amount (price, payment, withdrawal) as a decimal string.
    pub amount: Option<String>,
    /// Kind-specific extra value: catalog name, widget serial, mask, quantity.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}
