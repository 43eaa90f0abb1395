//! Append-only widget ledger.

use soroban_sdk::Env;

use crate::bins;
use crate::catalog;
use crate::events::{self, WidgetTested};
use crate::storage;
use crate::types::{CatalogKind, Widget};
use crate::Error;

/// Ledger a tested widget and classify it into a bin.
///
/// Catalog references, bin selection and ledger headroom are checked before
/// the first write. A full bin fails in `bins::admit` and the call rolls back.
pub fn record(
    env: &Env,
    serial: u64,
    factory: u32,
    test_site: u32,
    results: u32,
) -> Result<WidgetTested, Error> {
    catalog::require_exists(env, CatalogKind::Factory, factory)?;
    catalog::require_exists(env, CatalogKind::TestSite, test_site)?;

    let policy = storage::get_config(env).unmatched_policy;
    let mut bin = bins::select(env, results, policy)?;
    let widget_count = storage::get_widget_count(env)
        .checked_add(1)
        .ok_or(Error::Overflow)?;

    let index = storage::append_widget(
        env,
        &Widget {
            serial,
            factory,
            test_site,
            results,
            bin: bin.id,
        },
    );
    let bin_count = bins::admit(env, &mut bin, index)?;

    let tested = WidgetTested {
        serial,
        factory,
        test_site,
        results,
        widget_count,
        bin: bin.id,
        bin_count,
    };
    events::emit_widget_tested(env, tested.clone());
    Ok(tested)
}

pub fn get(env: &Env, index: u32) -> Result<Widget, Error> {
    storage::load_widget(env, index).ok_or(Error::UnknownReference)
}

pub fn count(env: &Env) -> u32 {
    storage::get_widget_count(env)
}
