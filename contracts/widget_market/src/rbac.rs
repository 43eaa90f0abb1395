//! # Role-Based Access Control
//!
//! Every address holds at most one [`Role`], assigned exactly once and never
//! changed or removed afterwards. Only an `Admin` may register new
//! participants, so the first Admin is assigned by the contract constructor.
//!
//! Authentication (`require_auth`) is done by the entry point before calling
//! into this module; the functions here only answer "does this address hold
//! the right role".

use soroban_sdk::{Address, Env};

use crate::events;
use crate::storage;
use crate::types::Role;
use crate::Error;

/// Assign the bootstrap Admin. Only called from the constructor.
pub fn init_admin(env: &Env, admin: &Address) {
    storage::set_role(env, admin, Role::Admin);
    events::emit_role_registered(env, admin.clone(), Role::Admin, admin.clone());
}

/// Register `target` as `role` on behalf of `caller`, who must already have
/// been checked as an Admin.
///
/// Fails with `DuplicateRegistration` if `target` already holds any role.
pub fn register(env: &Env, caller: &Address, target: &Address, role: Role) -> Result<(), Error> {
    if storage::get_role(env, target).is_some() {
        return Err(Error::DuplicateRegistration);
    }

    storage::set_role(env, target, role);
    events::emit_role_registered(env, target.clone(), role, caller.clone());
    Ok(())
}

pub fn require_role(env: &Env, address: &Address, role: Role) -> Result<(), Error> {
    if has_role(env, address, role) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

pub fn role_of(env: &Env, address: &Address) -> Option<Role> {
    storage::get_role(env, address)
}

pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    role_of(env, address) == Some(role)
}
