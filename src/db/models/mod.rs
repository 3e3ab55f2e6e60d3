//! Database models split into domain-specific modules.

pub mod interest;
pub mod user;

pub use interest::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Body returned by endpoints that create or update a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i64,
}
