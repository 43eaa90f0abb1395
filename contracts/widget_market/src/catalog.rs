//! Factory and test-site catalogs.
//!
//! Both lists are append-only and indexed from 0 in insertion order. A name
//! appears at most once per list; the same name may exist in both.

use soroban_sdk::{Env, String};

use crate::events;
use crate::storage;
use crate::types::CatalogKind;
use crate::Error;

/// Append `name` to the `kind` list and return its index.
pub fn add(env: &Env, kind: CatalogKind, name: String) -> Result<u32, Error> {
    if storage::get_catalog_index(env, kind, &name).is_some() {
        return Err(Error::DuplicateRegistration);
    }

    let count = storage::append_catalog_entry(env, kind, &name);
    let index = count - 1;
    events::emit_catalog_entry_added(env, kind, index, count, name);
    Ok(index)
}

pub fn index_of(env: &Env, kind: CatalogKind, name: &String) -> Option<u32> {
    storage::get_catalog_index(env, kind, name)
}

pub fn name_at(env: &Env, kind: CatalogKind, index: u32) -> Result<String, Error> {
    storage::get_catalog_name(env, kind, index).ok_or(Error::UnknownReference)
}

pub fn count(env: &Env, kind: CatalogKind) -> u32 {
    storage::get_catalog_count(env, kind)
}

pub fn require_exists(env: &Env, kind: CatalogKind, index: u32) -> Result<(), Error> {
    if index < count(env, kind) {
        Ok(())
    } else {
        Err(Error::UnknownReference)
    }
}
