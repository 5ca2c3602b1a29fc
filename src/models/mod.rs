pub mod authentication_token;
pub mod permission;
pub mod resource;
pub mod user;

/// Implemented by every store-backed entity so cleanup queries can be
/// written against an explicit table reference instead of a name looked
/// up at runtime.
pub trait TableEntity {
    const TABLE: &'static str;
}
