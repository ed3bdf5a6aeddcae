//! Bidirectional mapping between API-facing field names and storage columns.
//!
//! Every entity exposes a closed enum of its fields. Each variant knows its
//! camelCase API name and, when persisted, its column name. Storage code only
//! ever builds queries from these reviewed identifiers.

use serde_json::{Map, Value};

use crate::errors::{Result, ValidationError};

/// A closed set of field identifiers for one entity.
pub trait FieldName: Copy + Eq + std::fmt::Debug + 'static {
    /// Every field of the entity, in declaration order.
    const ALL: &'static [Self];

    /// Name used by the network-facing collaborators (JSON payloads).
    fn api_name(self) -> &'static str;

    /// Storage column, or `None` for fields that are not persisted.
    fn column_name(self) -> Option<&'static str>;

    fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.api_name() == name)
    }

    fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.column_name() == Some(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyField {
    Id,
    Code,
    FullName,
    Sign,
}

impl FieldName for CurrencyField {
    const ALL: &'static [Self] = &[
        CurrencyField::Id,
        CurrencyField::Code,
        CurrencyField::FullName,
        CurrencyField::Sign,
    ];

    fn api_name(self) -> &'static str {
        match self {
            CurrencyField::Id => "id",
            CurrencyField::Code => "code",
            CurrencyField::FullName => "name",
            CurrencyField::Sign => "sign",
        }
    }

    fn column_name(self) -> Option<&'static str> {
        Some(match self {
            CurrencyField::Id => "currency_id",
            CurrencyField::Code => "code",
            CurrencyField::FullName => "full_name",
            CurrencyField::Sign => "currency_sign",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeRateField {
    Id,
    BaseCurrency,
    TargetCurrency,
    Units,
    Rate,
    InfoSource,
}

impl FieldName for ExchangeRateField {
    const ALL: &'static [Self] = &[
        ExchangeRateField::Id,
        ExchangeRateField::BaseCurrency,
        ExchangeRateField::TargetCurrency,
        ExchangeRateField::Units,
        ExchangeRateField::Rate,
        ExchangeRateField::InfoSource,
    ];

    fn api_name(self) -> &'static str {
        match self {
            ExchangeRateField::Id => "id",
            ExchangeRateField::BaseCurrency => "baseCurrency",
            ExchangeRateField::TargetCurrency => "targetCurrency",
            ExchangeRateField::Units => "units",
            ExchangeRateField::Rate => "rate",
            ExchangeRateField::InfoSource => "infoSource",
        }
    }

    fn column_name(self) -> Option<&'static str> {
        match self {
            ExchangeRateField::Id => Some("exchange_rate_id"),
            ExchangeRateField::BaseCurrency => Some("base_currency_id"),
            ExchangeRateField::TargetCurrency => Some("target_currency_id"),
            // Storage is normalized to one unit.
            ExchangeRateField::Units => None,
            ExchangeRateField::Rate => Some("rate"),
            ExchangeRateField::InfoSource => Some("source_id"),
        }
    }
}

/// Direction of a key translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    ApiToStorage,
    StorageToApi,
}

/// Renames the keys of a JSON object between API and storage naming.
///
/// Unknown keys are rejected. Fields without a storage column are dropped when
/// translating towards storage.
pub fn translate_keys<F: FieldName>(
    object: &Map<String, Value>,
    direction: KeyDirection,
) -> Result<Map<String, Value>> {
    let mut translated = Map::with_capacity(object.len());
    for (key, value) in object {
        let field = match direction {
            KeyDirection::ApiToStorage => F::from_api_name(key),
            KeyDirection::StorageToApi => F::from_column_name(key),
        }
        .ok_or_else(|| ValidationError::UnknownField(key.clone()))?;

        let renamed = match direction {
            KeyDirection::ApiToStorage => match field.column_name() {
                Some(column) => column,
                None => continue,
            },
            KeyDirection::StorageToApi => field.api_name(),
        };
        translated.insert(renamed.to_string(), value.clone());
    }
    Ok(translated)
}
