//! Organization models for the metadata-service org API.

use serde::{Deserialize, Serialize};

/// An organization as returned by the organization listing.
///
/// Immutable once fetched; lives for one resolution pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}
