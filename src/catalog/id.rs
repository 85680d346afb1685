//! Deterministic identifiers for services and plans.
//!
//! Ids are name-based (UUID v3) under a fixed namespace, so the same name
//! yields the same id across restarts without storing anything.

use uuid::Uuid;

/// Namespace shared by service and plan ids.
pub const ROOT_NAMESPACE: Uuid = Uuid::from_u128(0xaaa4b55e_5768_41ea_a383_5f633725a88a);

/// Derive the id for a service or plan name.
pub fn derive_id(name: &str) -> String {
    Uuid::new_v3(&ROOT_NAMESPACE, name.as_bytes())
        .hyphenated()
        .to_string()
}
