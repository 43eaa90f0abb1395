//! # Marketplace, treasury and emergency breaker
//!
//! Purchases are FIFO per bin: a sale of `quantity` units advances the bin's
//! `sold_count`, so the units sold are positions
//! `sold_count .. sold_count + quantity` of the membership list. Buyers never
//! pick serials.
//!
//! The treasury balance is tracked in contract storage and moves in lockstep
//! with the contract's payment-token balance: credited by exactly the sale
//! price, debited by exactly the withdrawn amount.

use soroban_sdk::{token, Address, Env};

use crate::bins;
use crate::events::{self, WidgetSale};
use crate::storage;
use crate::types::{HaltScope, PaymentPolicy};
use crate::Error;

// ─────────────────────────────────────────────────────────
// Emergency breaker
// ─────────────────────────────────────────────────────────

/// Gate for the purchase path, blocked under every halt scope.
pub fn require_purchasing_open(env: &Env) -> Result<(), Error> {
    if storage::is_halted(env) {
        return Err(Error::Halted);
    }
    Ok(())
}

/// Gate for non-purchase mutations, blocked only under `AllOperations`.
pub fn require_operations_open(env: &Env) -> Result<(), Error> {
    if storage::is_halted(env) && storage::get_config(env).halt_scope == HaltScope::AllOperations {
        return Err(Error::Halted);
    }
    Ok(())
}

pub fn begin_emergency(env: &Env, admin: Address) {
    storage::set_halted(env, true);
    events::emit_emergency_begun(env, admin);
}

pub fn end_emergency(env: &Env, admin: Address) {
    storage::set_halted(env, false);
    events::emit_emergency_ended(env, admin);
}

// ─────────────────────────────────────────────────────────
// Purchases
// ─────────────────────────────────────────────────────────

/// Sell the next `quantity` unsold widgets of bin `bin_id` to `customer`.
///
/// `payment` is what the customer attaches; what is actually pulled from
/// them is the sale price, which under `ExactOnly` is the same amount.
/// A customer whose token balance cannot cover the price is refused with
/// `InsufficientFunds`. A zero `quantity` with zero payment is an empty sale.
pub fn buy(
    env: &Env,
    customer: &Address,
    bin_id: u32,
    quantity: u32,
    payment: i128,
) -> Result<WidgetSale, Error> {
    require_purchasing_open(env)?;

    let mut bin = bins::load(env, bin_id)?;
    if payment < 0 {
        return Err(Error::InvalidAmount);
    }
    if quantity > bin.remaining() {
        return Err(Error::InventoryExhausted);
    }

    let price = bin
        .unit_price
        .checked_mul(i128::from(quantity))
        .ok_or(Error::Overflow)?;
    let paid_enough = match storage::get_config(env).payment_policy {
        PaymentPolicy::ExactOnly => payment == price,
        PaymentPolicy::RefundExcess => payment >= price,
    };
    if !paid_enough {
        return Err(Error::InsufficientFunds);
    }

    let treasury = storage::get_treasury(env)
        .checked_add(price)
        .ok_or(Error::Overflow)?;
    let token = token::Client::new(
        env,
        &storage::get_payment_token(env).ok_or(Error::UnknownReference)?,
    );
    if token.balance(customer) < price {
        return Err(Error::InsufficientFunds);
    }

    // All checks passed; commit.
    if price > 0 {
        token.transfer(customer, &env.current_contract_address(), &price);
    }

    let first_position = bin.sold_count;
    bin.sold_count += quantity;
    storage::save_bin(env, &bin);
    storage::set_treasury(env, treasury);

    let sale = WidgetSale {
        bin: bin_id,
        quantity,
        customer: customer.clone(),
        total_paid: price,
        first_position,
    };
    events::emit_widget_sale(env, sale.clone());
    Ok(sale)
}

// ─────────────────────────────────────────────────────────
// Treasury
// ─────────────────────────────────────────────────────────

pub fn balance(env: &Env) -> i128 {
    storage::get_treasury(env)
}

/// Move `amount` of accumulated proceeds to `admin`.
pub fn withdraw(env: &Env, admin: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let balance = storage::get_treasury(env);
    if amount > balance {
        return Err(Error::InsufficientFunds);
    }
    let token = storage::get_payment_token(env).ok_or(Error::UnknownReference)?;

    storage::set_treasury(env, balance - amount);
    token::Client::new(env, &token).transfer(&env.current_contract_address(), admin, &amount);

    events::emit_funds_withdrawn(env, admin.clone(), amount);
    Ok(())
}
