use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{LocationId, LocationName};

/// Canonical location record, optionally attached to posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: LocationName,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Location`].
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: LocationName,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
