//! Menu Item Model

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Menu item entity
///
/// Text, price and timestamp columns are nullable in storage, so rows written
/// outside this service still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub is_vegetarian: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// Build a fresh item with a generated id; both timestamps are `now`.
    pub fn create(draft: MenuItemDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Some(draft.name),
            description: Some(draft.description),
            category: Some(draft.category),
            price: Some(draft.price),
            is_vegetarian: draft.is_vegetarian,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Replace the mutable fields, keeping `id` and `created_at`.
    ///
    /// `updated_at` always moves forward by at least one millisecond (the
    /// storage resolution) so two writes in the same tick stay ordered.
    pub fn apply(&mut self, draft: MenuItemDraft, now: DateTime<Utc>) {
        self.name = Some(draft.name);
        self.description = Some(draft.description);
        self.category = Some(draft.category);
        self.price = Some(draft.price);
        self.is_vegetarian = draft.is_vegetarian;
        self.updated_at = Some(match self.updated_at {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        });
    }

    /// Text fields that participate in search, in match order.
    pub fn searchable_fields(&self) -> [Option<&str>; 3] {
        [
            self.name.as_deref(),
            self.description.as_deref(),
            self.category.as_deref(),
        ]
    }
}

/// Create/update payload as received from clients
///
/// Every field is optional at the wire level so missing fields surface as
/// validation errors instead of body rejections. `price` accepts a JSON number
/// or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<serde_json::Value>,
    pub is_vegetarian: Option<bool>,
}

/// Validated menu item fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub is_vegetarian: bool,
}
