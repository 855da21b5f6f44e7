//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field failures are reported as `invalid_request` with a `details` object
//! naming the offending field so clients can highlight it.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Category, ContactInfo, Error, ItemId, ItemKind, ItemValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    UnknownCategory,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::UnknownCategory => "unknown_category",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let Some(value) = value {
        details["value"] = json!(value);
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Require a present, non-blank text field.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_item_id(value: &str) -> Result<ItemId, Error> {
    let field = FieldName::new("id");
    ItemId::from_str(value).map_err(|_| {
        field_error(
            field,
            "id must be a valid UUID".to_owned(),
            ErrorCode::InvalidUuid,
            Some(value),
        )
    })
}

pub(crate) fn parse_kind(value: &str, field: FieldName) -> Result<ItemKind, Error> {
    let name = field.as_str();
    ItemKind::from_str(value).map_err(|_| {
        field_error(
            field,
            format!("{name} must be lost or found"),
            ErrorCode::InvalidValue,
            Some(value),
        )
    })
}

/// Parse a category offered by the reporting form.
pub(crate) fn parse_known_category(value: String, field: FieldName) -> Result<Category, Error> {
    let name = field.as_str();
    let category = match Category::new(value.as_str()) {
        Ok(category) => category,
        Err(ItemValidationError::EmptyCategory) => return Err(missing_field_error(field)),
        Err(err) => {
            return Err(field_error(
                field,
                format!("{name}: {err}"),
                ErrorCode::InvalidValue,
                Some(&value),
            ));
        }
    };
    if !category.is_known() {
        return Err(field_error(
            field,
            format!("{name} must be one of: {}", Category::KNOWN.join(", ")),
            ErrorCode::UnknownCategory,
            Some(category.as_ref()),
        ));
    }
    Ok(category)
}

pub(crate) fn parse_contact(value: String, field: FieldName) -> Result<ContactInfo, Error> {
    ContactInfo::new(value).map_err(|_| missing_field_error(field))
}
