//! Input validation helpers
//!
//! Everything here runs before any storage call.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::{MenuItemDraft, MenuItemInput};
use uuid::Uuid;

use crate::service::MenuError;

// ── Text length limits ──────────────────────────────────────────────

/// Item names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Category labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse a client supplied item id
pub fn parse_id(raw: &str) -> Result<Uuid, MenuError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| MenuError::Validation(format!("invalid menu item id: {raw:?}")))
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<String, MenuError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(MenuError::Validation(format!("{field} must not be empty")));
    }
    let chars = value.chars().count();
    if chars > max_len {
        return Err(MenuError::Validation(format!(
            "{field} is too long ({chars} chars, max {max_len})"
        )));
    }
    Ok(value.to_string())
}

/// Accept a JSON number or a numeric string. Negative prices pass.
pub fn parse_price(value: Option<&Value>) -> Result<Decimal, MenuError> {
    let invalid = |raw: &dyn std::fmt::Display| {
        MenuError::InvalidPrice(format!("price must be a number, got {raw}"))
    };

    let text = match value {
        None | Some(Value::Null) => {
            return Err(MenuError::InvalidPrice("price must not be empty".into()));
        }
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(MenuError::InvalidPrice("price must not be empty".into()));
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => return Err(invalid(other)),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid(&text))
}

/// Turn a raw payload into a writable draft
pub fn validate_input(input: &MenuItemInput) -> Result<MenuItemDraft, MenuError> {
    Ok(MenuItemDraft {
        name: validate_required_text(input.name.as_deref(), "name", MAX_NAME_LEN)?,
        description: validate_required_text(
            input.description.as_deref(),
            "description",
            MAX_NOTE_LEN,
        )?,
        category: validate_required_text(
            input.category.as_deref(),
            "category",
            MAX_SHORT_TEXT_LEN,
        )?,
        price: parse_price(input.price.as_ref())?,
        is_vegetarian: input.is_vegetarian.unwrap_or(false),
    })
}
