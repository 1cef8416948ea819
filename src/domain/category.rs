use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategoryTitle, Slug};

/// Canonical category record. Categories are created by admin tooling and
/// soft-hidden via `is_published` rather than deleted in normal flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: Slug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub description: CategoryDescription,
    pub slug: Slug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
