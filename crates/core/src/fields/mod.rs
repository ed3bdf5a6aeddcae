//! Identity & field-mapping utilities shared by every entity.

mod field_mapping;
mod identity;

pub use field_mapping::{translate_keys, CurrencyField, ExchangeRateField, FieldName, KeyDirection};
pub use identity::{describe_identity, require_identity, Identifiable};
