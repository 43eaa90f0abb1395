//! # Bin classifier and inventory
//!
//! Three bins exist for the lifetime of the contract, ids `1..=BIN_COUNT`.
//! A widget matches a bin when every bit of the bin's mask is set in the
//! widget's results, `(results & mask) == mask`. Bins are tried in ascending
//! id order and the first match wins, so bin 1 is the strictest tier.
//!
//! Mask and price changes only affect future classification and sales;
//! members already in a bin stay there.

use soroban_sdk::Env;

use crate::storage;
use crate::types::{Bin, UnmatchedPolicy};
use crate::Error;

pub const BIN_COUNT: u32 = 3;

/// `(mask, unit_price)` per bin id, starting at bin 1.
const DEFAULT_BINS: [(u32, i128); BIN_COUNT as usize] = [
    (0xFFFF_FFFF, 100_000_000_000_000_000),
    (0xFFFF_0000, 50_000_000_000_000_000),
    (0xFF00_0000, 10_000_000_000_000_000),
];

pub fn seed_default_bins(env: &Env) {
    for (offset, (mask, unit_price)) in DEFAULT_BINS.iter().enumerate() {
        storage::save_bin(
            env,
            &Bin {
                id: offset as u32 + 1,
                mask: *mask,
                unit_price: *unit_price,
                widget_count: 0,
                sold_count: 0,
            },
        );
    }
}

/// Return the position in `masks` of the first mask fully covered by `results`.
pub fn classify(results: u32, masks: &[u32]) -> Option<usize> {
    masks.iter().position(|mask| results & mask == *mask)
}

pub fn load(env: &Env, id: u32) -> Result<Bin, Error> {
    storage::load_bin(env, id).ok_or(Error::UnknownReference)
}

/// Pick the bin a widget with `results` belongs in, without writing anything.
pub fn select(env: &Env, results: u32, policy: UnmatchedPolicy) -> Result<Bin, Error> {
    let mut masks = [0u32; BIN_COUNT as usize];
    for (offset, slot) in masks.iter_mut().enumerate() {
        *slot = load(env, offset as u32 + 1)?.mask;
    }

    let id = match (classify(results, &masks), policy) {
        (Some(offset), _) => offset as u32 + 1,
        (None, UnmatchedPolicy::LowestTier) => BIN_COUNT,
        (None, UnmatchedPolicy::Reject) => return Err(Error::UnclassifiedWidget),
    };
    load(env, id)
}

/// Append `widget_index` to the end of `bin`'s membership list and persist
/// the bin. Returns the new membership count.
pub fn admit(env: &Env, bin: &mut Bin, widget_index: u32) -> Result<u32, Error> {
    let position = bin.widget_count;
    let count = position.checked_add(1).ok_or(Error::Overflow)?;

    storage::set_bin_member(env, bin.id, position, widget_index);
    bin.widget_count = count;
    storage::save_bin(env, bin);
    Ok(count)
}

/// Ledger index of the widget at `position` in the bin's FIFO order.
pub fn member(env: &Env, id: u32, position: u32) -> Result<u32, Error> {
    load(env, id)?;
    storage::get_bin_member(env, id, position).ok_or(Error::UnknownReference)
}

pub fn update_mask(env: &Env, id: u32, mask: u32) -> Result<(), Error> {
    let mut bin = load(env, id)?;
    bin.mask = mask;
    storage::save_bin(env, &bin);
    Ok(())
}

pub fn update_price(env: &Env, id: u32, unit_price: i128) -> Result<(), Error> {
    if unit_price < 0 {
        return Err(Error::InvalidAmount);
    }
    let mut bin = load(env, id)?;
    bin.unit_price = unit_price;
    storage::save_bin(env, &bin);
    Ok(())
}
