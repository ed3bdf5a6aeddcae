use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNITS;
use crate::currencies::CurrencyCode;
use crate::errors::{Error, Result, ValidationError};
use crate::fields::{ExchangeRateField, Identifiable};

/// A directed exchange-rate edge `base -> target`.
///
/// `rate` is the price of `units` of the base currency expressed in the target
/// currency. Construction rejects zero units and non-positive rates, so the
/// derived views below are defined for every value built through
/// [`ExchangeRate::new`] or deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "RawExchangeRate")]
pub struct ExchangeRate {
    pub id: Option<i32>,
    pub base_currency_code: CurrencyCode,
    pub target_currency_code: CurrencyCode,
    pub units: Option<u32>,
    pub rate: Option<Decimal>,
    pub info_source: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExchangeRate {
    #[serde(default)]
    id: Option<i32>,
    base_currency_code: String,
    target_currency_code: String,
    #[serde(default)]
    units: Option<u32>,
    #[serde(default)]
    rate: Option<Decimal>,
    #[serde(default)]
    info_source: Option<i32>,
}

impl TryFrom<RawExchangeRate> for ExchangeRate {
    type Error = Error;

    fn try_from(raw: RawExchangeRate) -> Result<Self> {
        ExchangeRate::new(
            raw.id,
            &raw.base_currency_code,
            &raw.target_currency_code,
            raw.units,
            raw.rate,
            raw.info_source,
        )
    }
}

impl ExchangeRate {
    /// Builds a validated exchange rate.
    ///
    /// `units` defaults to 1 when omitted but a rate is present.
    pub fn new(
        id: Option<i32>,
        base_currency_code: &str,
        target_currency_code: &str,
        units: Option<u32>,
        rate: Option<Decimal>,
        info_source: Option<i32>,
    ) -> Result<Self> {
        Self::from_codes(
            id,
            CurrencyCode::parse(base_currency_code)?,
            CurrencyCode::parse(target_currency_code)?,
            units,
            rate,
            info_source,
        )
    }

    pub fn from_codes(
        id: Option<i32>,
        base_currency_code: CurrencyCode,
        target_currency_code: CurrencyCode,
        units: Option<u32>,
        rate: Option<Decimal>,
        info_source: Option<i32>,
    ) -> Result<Self> {
        if units == Some(0) {
            return Err(ValidationError::InvalidInput("units must be positive".to_string()).into());
        }
        if let Some(rate) = rate {
            if rate <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "rate must be positive, got {}",
                    rate
                ))
                .into());
            }
        }
        let units = match (units, rate) {
            (None, Some(_)) => Some(DEFAULT_UNITS),
            _ => units,
        };
        Ok(Self {
            id,
            base_currency_code,
            target_currency_code,
            units,
            rate,
            info_source,
        })
    }

    /// A rate computed by the engine rather than read from the store:
    /// one unit, no id and no source.
    pub fn derived(
        base_currency_code: CurrencyCode,
        target_currency_code: CurrencyCode,
        rate: Decimal,
    ) -> Self {
        Self {
            id: None,
            base_currency_code,
            target_currency_code,
            units: Some(DEFAULT_UNITS),
            rate: Some(rate),
            info_source: None,
        }
    }

    /// Returns a copy attributed to the given rate source.
    pub fn with_info_source(mut self, source_id: i32) -> Self {
        self.info_source = Some(source_id);
        self
    }

    fn units_or_default(&self) -> Decimal {
        Decimal::from(self.units.unwrap_or(DEFAULT_UNITS))
    }

    /// Price of one unit of base currency: `rate / units`.
    ///
    /// This is the value persisted by the store.
    pub fn reduced_rate(&self) -> Option<Decimal> {
        self.rate?.checked_div(self.units_or_default())
    }

    /// `1 / rate`, ignoring units.
    pub fn reciprocal_rate(&self) -> Option<Decimal> {
        Decimal::ONE.checked_div(self.rate?)
    }

    /// `units / rate`.
    pub fn unit_aware_reciprocal(&self) -> Option<Decimal> {
        self.units_or_default().checked_div(self.rate?)
    }

    /// True when the value carries a field an update can apply.
    pub fn has_changes(&self) -> bool {
        self.rate.is_some() || self.info_source.is_some()
    }

    pub fn pair(&self) -> (&CurrencyCode, &CurrencyCode) {
        (&self.base_currency_code, &self.target_currency_code)
    }
}

impl Identifiable for ExchangeRate {
    type Field = ExchangeRateField;

    const ENTITY: &'static str = "exchange rate";

    fn present_identity_fields(&self) -> Vec<ExchangeRateField> {
        let mut fields = Vec::with_capacity(3);
        if self.id.is_some() {
            fields.push(ExchangeRateField::Id);
        }
        fields.push(ExchangeRateField::BaseCurrency);
        fields.push(ExchangeRateField::TargetCurrency);
        fields
    }
}

/// Addresses an exchange rate by surrogate id and/or currency pair.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateQuery {
    pub id: Option<i32>,
    pub base: Option<CurrencyCode>,
    pub target: Option<CurrencyCode>,
}

impl ExchangeRateQuery {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_pair(base: &str, target: &str) -> Result<Self> {
        Ok(Self::for_pair(
            CurrencyCode::parse(base)?,
            CurrencyCode::parse(target)?,
        ))
    }

    pub fn for_pair(base: CurrencyCode, target: CurrencyCode) -> Self {
        Self {
            id: None,
            base: Some(base),
            target: Some(target),
        }
    }

    /// The pair, when both codes are present.
    pub fn pair(&self) -> Option<(&CurrencyCode, &CurrencyCode)> {
        match (&self.base, &self.target) {
            (Some(base), Some(target)) => Some((base, target)),
            _ => None,
        }
    }

    /// Query for the opposite edge `target -> base`, without the id.
    pub fn reversed(&self) -> Option<Self> {
        self.pair()
            .map(|(base, target)| Self::for_pair(target.clone(), base.clone()))
    }
}

impl From<&ExchangeRate> for ExchangeRateQuery {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            id: rate.id,
            base: Some(rate.base_currency_code.clone()),
            target: Some(rate.target_currency_code.clone()),
        }
    }
}

impl Identifiable for ExchangeRateQuery {
    type Field = ExchangeRateField;

    const ENTITY: &'static str = "exchange rate";

    fn present_identity_fields(&self) -> Vec<ExchangeRateField> {
        let mut fields = Vec::with_capacity(3);
        if self.id.is_some() {
            fields.push(ExchangeRateField::Id);
        }
        if self.pair().is_some() {
            fields.push(ExchangeRateField::BaseCurrency);
            fields.push(ExchangeRateField::TargetCurrency);
        }
        fields
    }
}

/// An outgoing stored edge of a currency, used by the pivot strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEdge {
    pub target_currency_id: i32,
    pub target_currency_code: CurrencyCode,
    /// Reduced (per one unit) stored rate.
    pub rate: Decimal,
}

/// Result of converting an amount between two currencies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub rate: ExchangeRate,
    pub amount: Decimal,
    pub converted_amount: Decimal,
}
