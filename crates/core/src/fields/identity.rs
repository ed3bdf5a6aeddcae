//! Resolution of "by which fields" a record is addressed.

use super::field_mapping::FieldName;
use crate::errors::{Error, Result};

/// A value that can address a stored record through its identity fields
/// (surrogate key and/or natural key).
pub trait Identifiable {
    type Field: FieldName;

    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Identity fields carrying a value on `self`, surrogate key first.
    fn present_identity_fields(&self) -> Vec<Self::Field>;
}

/// Returns the identity fields present on `record`, failing with
/// [`Error::IdentityMissing`] when there are none.
///
/// Every present field takes part in the lookup: they are combined as a
/// conjunction, not as a priority list.
pub fn require_identity<T: Identifiable>(record: &T) -> Result<Vec<T::Field>> {
    let fields = record.present_identity_fields();
    if fields.is_empty() {
        return Err(Error::IdentityMissing(T::ENTITY.to_string()));
    }
    Ok(fields)
}

/// Human readable description of an addressed record, e.g. `currency (id, code)`.
pub fn describe_identity<T: Identifiable>(record: &T) -> String {
    let names: Vec<&str> = record
        .present_identity_fields()
        .into_iter()
        .map(|field| field.api_name())
        .collect();
    format!("{} ({})", T::ENTITY, names.join(", "))
}
