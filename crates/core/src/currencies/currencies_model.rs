//! Currency domain models.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CURRENCY_CODE_LEN;
use crate::errors::{Result, ValidationError};
use crate::fields::{CurrencyField, Identifiable};

/// Returns true for exactly three uppercase ASCII letters.
pub fn is_valid_currency_code(value: &str) -> bool {
    value.len() == CURRENCY_CODE_LEN && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// A validated currency code such as `USD`.
///
/// The only way to obtain one is through [`CurrencyCode::parse`] (or the
/// equivalent `FromStr`/`TryFrom`/serde paths), so a held value is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(value: &str) -> std::result::Result<Self, ValidationError> {
        if is_valid_currency_code(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::InvalidCurrencyCode(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CurrencyCode {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for CurrencyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A currency record.
///
/// Every field is optional so the same type can carry a full record, a partial
/// identity (`id` and/or `code`) used as a query, or an update delta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: Option<i32>,
    pub code: Option<CurrencyCode>,
    pub full_name: Option<String>,
    pub sign: Option<String>,
}

impl Currency {
    /// Builds a currency, validating the code when one is given.
    pub fn new(
        id: Option<i32>,
        code: Option<&str>,
        full_name: Option<&str>,
        sign: Option<&str>,
    ) -> Result<Self> {
        let code = code.map(CurrencyCode::parse).transpose()?;
        Ok(Self {
            id,
            code,
            full_name: full_name.map(str::to_string),
            sign: sign.map(str::to_string),
        })
    }

    /// Identity-only value addressing a currency by surrogate key.
    pub fn with_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Identity-only value addressing a currency by code.
    pub fn with_code(code: &str) -> Result<Self> {
        Ok(Self::for_code(CurrencyCode::parse(code)?))
    }

    pub fn for_code(code: CurrencyCode) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// True when the value carries at least one mutable (non-identity) field.
    pub fn has_changes(&self) -> bool {
        self.full_name.is_some() || self.sign.is_some()
    }
}

impl Identifiable for Currency {
    type Field = CurrencyField;

    const ENTITY: &'static str = "currency";

    fn present_identity_fields(&self) -> Vec<CurrencyField> {
        let mut fields = Vec::with_capacity(2);
        if self.id.is_some() {
            fields.push(CurrencyField::Id);
        }
        if self.code.is_some() {
            fields.push(CurrencyField::Code);
        }
        fields
    }
}
