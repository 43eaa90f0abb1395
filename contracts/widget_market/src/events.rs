//! # Events
//!
//! Every successful mutating entry point publishes exactly one event. The
//! leading topic is a symbol naming the event; typed payload structs carry
//! the data so off-chain consumers can decode them without guessing.
//!
//! | Topic                          | Extra topic | Payload             |
//! |--------------------------------|-------------|---------------------|
//! | `new_admin` … `new_customer`   | address     | [`RoleRegistered`]  |
//! | `new_factory`, `new_test_site` | -           | [`CatalogEntryAdded`] |
//! | `new_tested_widget`            | bin id      | [`WidgetTested`]    |
//! | `new_unit_price`               | bin id      | [`UnitPriceUpdated`] |
//! | `new_bin_mask`                 | bin id      | [`BinMaskUpdated`]  |
//! | `widget_sale`                  | bin id      | [`WidgetSale`]      |
//! | `funds_withdrawn`              | -           | [`FundsWithdrawn`]  |
//! | `emergency_begun`, `emergency_ended` | -     | admin `Address`     |

use soroban_sdk::{contracttype, Address, Env, String, Symbol};

use crate::types::{CatalogKind, Role};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRegistered {
    pub address: Address,
    pub role: Role,
    pub registered_by: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogEntryAdded {
    pub index: u32,
    pub count: u32,
    pub name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WidgetTested {
    pub serial: u64,
    pub factory: u32,
    pub test_site: u32,
    pub results: u32,
    pub widget_count: u32,
    pub bin: u32,
    pub bin_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitPriceUpdated {
    pub bin: u32,
    pub price: i128,
    pub sales_distributor: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinMaskUpdated {
    pub bin: u32,
    pub mask: u32,
    pub sales_distributor: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WidgetSale {
    pub bin: u32,
    pub quantity: u32,
    pub customer: Address,
    pub total_paid: i128,
    /// Bin position of the first unit in this sale.
    pub first_position: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub withdrawer: Address,
    pub amount: i128,
}

fn role_topic(env: &Env, role: Role) -> Symbol {
    match role {
        Role::Admin => Symbol::new(env, "new_admin"),
        Role::Tester => Symbol::new(env, "new_tester"),
        Role::SalesDistributor => Symbol::new(env, "new_sales_distributor"),
        Role::Customer => Symbol::new(env, "new_customer"),
    }
}

pub fn emit_role_registered(env: &Env, address: Address, role: Role, registered_by: Address) {
    env.events().publish(
        (role_topic(env, role), address.clone()),
        RoleRegistered {
            address,
            role,
            registered_by,
        },
    );
}

pub fn emit_catalog_entry_added(env: &Env, kind: CatalogKind, index: u32, count: u32, name: String) {
    let topic = match kind {
        CatalogKind::Factory => Symbol::new(env, "new_factory"),
        CatalogKind::TestSite => Symbol::new(env, "new_test_site"),
    };
    env.events()
        .publish((topic,), CatalogEntryAdded { index, count, name });
}

pub fn emit_widget_tested(env: &Env, event: WidgetTested) {
    env.events()
        .publish((Symbol::new(env, "new_tested_widget"), event.bin), event);
}

pub fn emit_unit_price_updated(env: &Env, bin: u32, price: i128, sales_distributor: Address) {
    env.events().publish(
        (Symbol::new(env, "new_unit_price"), bin),
        UnitPriceUpdated {
            bin,
            price,
            sales_distributor,
        },
    );
}

pub fn emit_bin_mask_updated(env: &Env, bin: u32, mask: u32, sales_distributor: Address) {
    env.events().publish(
        (Symbol::new(env, "new_bin_mask"), bin),
        BinMaskUpdated {
            bin,
            mask,
            sales_distributor,
        },
    );
}

pub fn emit_widget_sale(env: &Env, sale: WidgetSale) {
    env.events()
        .publish((Symbol::new(env, "widget_sale"), sale.bin), sale);
}

pub fn emit_funds_withdrawn(env: &Env, withdrawer: Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "funds_withdrawn"),),
        FundsWithdrawn { withdrawer, amount },
    );
}

pub fn emit_emergency_begun(env: &Env, admin: Address) {
    env.events()
        .publish((Symbol::new(env, "emergency_begun"),), admin);
}

pub fn emit_emergency_ended(env: &Env, admin: Address) {
    env.events()
        .publish((Symbol::new(env, "emergency_ended"),), admin);
}
