//! In-memory repositories used by the service tests.
//!
//! They enforce the same constraint taxonomy as the SQLite repositories so
//! service behaviour can be tested without a database.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::currencies::{Currency, CurrencyCode, CurrencyRepositoryTrait};
use crate::errors::{Error, Result};
use crate::fields::{describe_identity, require_identity};
use crate::fx::{ExchangeRate, ExchangeRateQuery, ExchangeRateRepositoryTrait, RateEdge};
use crate::updater::{AppealState, RateSource, RateSourceRepositoryTrait, SourceSchema};

struct StoredRate {
    id: i32,
    base_id: i32,
    target_id: i32,
    rate: Decimal,
    source: Option<i32>,
}

#[derive(Default)]
struct State {
    currencies: BTreeMap<i32, Currency>,
    rates: BTreeMap<i32, StoredRate>,
    sources: BTreeMap<i32, RateSource>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn currency_id(&self, code: &CurrencyCode) -> Option<i32> {
        self.currencies
            .values()
            .find(|c| c.code.as_ref() == Some(code))
            .and_then(|c| c.id)
    }

    fn code_of(&self, id: i32) -> Option<CurrencyCode> {
        self.currencies.get(&id).and_then(|c| c.code.clone())
    }

    fn find_currency(&self, query: &Currency) -> Option<Currency> {
        self.currencies
            .values()
            .find(|c| {
                query.id.map_or(true, |id| c.id == Some(id))
                    && query
                        .code
                        .as_ref()
                        .map_or(true, |code| c.code.as_ref() == Some(code))
            })
            .cloned()
    }

    fn find_rate(&self, query: &ExchangeRateQuery) -> Option<ExchangeRate> {
        let pair_ids = match query.pair() {
            Some((base, target)) => Some((self.currency_id(base)?, self.currency_id(target)?)),
            None => None,
        };
        self.rates
            .values()
            .find(|r| {
                query.id.map_or(true, |id| r.id == id)
                    && pair_ids.map_or(true, |(b, t)| r.base_id == b && r.target_id == t)
            })
            .and_then(|r| self.to_rate(r))
    }

    fn to_rate(&self, stored: &StoredRate) -> Option<ExchangeRate> {
        Some(ExchangeRate {
            id: Some(stored.id),
            base_currency_code: self.code_of(stored.base_id)?,
            target_currency_code: self.code_of(stored.target_id)?,
            units: Some(1),
            rate: Some(stored.rate),
            info_source: stored.source,
        })
    }

    fn check_source(&self, source: Option<i32>) -> Result<()> {
        match source {
            Some(id) if !self.sources.contains_key(&id) => {
                Err(Error::ReferentialIntegrity(format!("rate source {}", id)))
            }
            _ => Ok(()),
        }
    }
}

pub struct InMemoryStore {
    state: Mutex<State>,
    schema: SourceSchema,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            schema: SourceSchema::default(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn put_currency(&self, code: &str, full_name: &str, sign: &str) -> i32 {
        let mut state = self.state();
        let code = CurrencyCode::parse(code).unwrap();
        if let Some(id) = state.currency_id(&code) {
            return id;
        }
        let id = state.next_id();
        state.currencies.insert(
            id,
            Currency {
                id: Some(id),
                code: Some(code),
                full_name: Some(full_name.to_string()),
                sign: Some(sign.to_string()),
            },
        );
        id
    }

    /// Stores a one-unit rate, creating missing currencies.
    pub fn put_rate(&self, base: &str, target: &str, rate: Decimal) -> i32 {
        let base_id = self.put_currency(base, base, "");
        let target_id = self.put_currency(target, target, "");
        let mut state = self.state();
        let id = state.next_id();
        state.rates.insert(
            id,
            StoredRate {
                id,
                base_id,
                target_id,
                rate,
                source: None,
            },
        );
        id
    }

    pub fn put_source(&self, days_valid: i32) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.sources.insert(
            id,
            RateSource {
                source_id: id,
                src_path: format!("memory://{}", id),
                days_valid,
                last_appeal: None,
            },
        );
        id
    }

    pub fn set_last_appeal(&self, source_id: i32, date: NaiveDate) {
        if let Some(source) = self.state().sources.get_mut(&source_id) {
            source.last_appeal = Some(date);
        }
    }

    pub fn last_appeal(&self, source_id: i32) -> Option<NaiveDate> {
        self.state()
            .sources
            .get(&source_id)
            .and_then(|s| s.last_appeal)
    }

    pub fn rate_value(&self, base: &str, target: &str) -> Option<Decimal> {
        let query = ExchangeRateQuery::by_pair(base, target).ok()?;
        self.state().find_rate(&query).and_then(|r| r.rate)
    }

    pub fn rate_source(&self, base: &str, target: &str) -> Option<i32> {
        let query = ExchangeRateQuery::by_pair(base, target).ok()?;
        self.state().find_rate(&query).and_then(|r| r.info_source)
    }
}

impl CurrencyRepositoryTrait for InMemoryStore {
    fn get(&self, query: &Currency) -> Result<Option<Currency>> {
        require_identity(query)?;
        Ok(self.state().find_currency(query))
    }

    fn list(&self) -> Result<Vec<Currency>> {
        Ok(self.state().currencies.values().cloned().collect())
    }

    fn add(&self, currency: &Currency) -> Result<Currency> {
        let mut state = self.state();
        let code = currency
            .code
            .clone()
            .ok_or_else(|| Error::RequiredFieldMissing("code".to_string()))?;
        let full_name = currency
            .full_name
            .clone()
            .ok_or_else(|| Error::RequiredFieldMissing("full_name".to_string()))?;
        if state.currency_id(&code).is_some()
            || currency
                .id
                .is_some_and(|id| state.currencies.contains_key(&id))
        {
            return Err(Error::DuplicateIdentity(describe_identity(currency)));
        }
        let id = match currency.id {
            Some(id) => id,
            None => state.next_id(),
        };
        let stored = Currency {
            id: Some(id),
            code: Some(code),
            full_name: Some(full_name),
            sign: currency.sign.clone(),
        };
        state.currencies.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, delta: &Currency) -> Result<Currency> {
        require_identity(delta)?;
        let mut state = self.state();
        let Some(mut current) = state.find_currency(delta) else {
            return Err(Error::NoRecordToModify(describe_identity(delta)));
        };
        if !delta.has_changes() {
            return Err(Error::RequiredFieldMissing("full_name or sign".to_string()));
        }
        if let Some(full_name) = &delta.full_name {
            current.full_name = Some(full_name.clone());
        }
        if let Some(sign) = &delta.sign {
            current.sign = Some(sign.clone());
        }
        if let Some(id) = current.id {
            state.currencies.insert(id, current.clone());
        }
        Ok(current)
    }
}

impl ExchangeRateRepositoryTrait for InMemoryStore {
    fn get(&self, query: &ExchangeRateQuery) -> Result<Option<ExchangeRate>> {
        require_identity(query)?;
        Ok(self.state().find_rate(query))
    }

    fn list(&self) -> Result<Vec<ExchangeRate>> {
        let state = self.state();
        Ok(state
            .rates
            .values()
            .filter_map(|r| state.to_rate(r))
            .collect())
    }

    fn add(&self, rate: &ExchangeRate) -> Result<ExchangeRate> {
        let mut state = self.state();
        let (Some(base_id), Some(target_id)) = (
            state.currency_id(&rate.base_currency_code),
            state.currency_id(&rate.target_currency_code),
        ) else {
            return Err(Error::ReferentialIntegrity(describe_identity(rate)));
        };
        state.check_source(rate.info_source)?;
        let reduced = rate
            .reduced_rate()
            .ok_or_else(|| Error::RequiredFieldMissing("rate".to_string()))?;
        if state.find_rate(&ExchangeRateQuery::from(rate)).is_some()
            || state
                .rates
                .values()
                .any(|r| r.base_id == base_id && r.target_id == target_id)
        {
            return Err(Error::DuplicateIdentity(describe_identity(rate)));
        }
        let id = match rate.id {
            Some(id) => id,
            None => state.next_id(),
        };
        let stored = StoredRate {
            id,
            base_id,
            target_id,
            rate: reduced,
            source: rate.info_source,
        };
        let result = state.to_rate(&stored);
        state.rates.insert(id, stored);
        result.ok_or_else(|| Error::ReferentialIntegrity(describe_identity(rate)))
    }

    fn update(&self, delta: &ExchangeRate) -> Result<ExchangeRate> {
        require_identity(delta)?;
        let mut state = self.state();
        let Some(current) = state.find_rate(&ExchangeRateQuery::from(delta)) else {
            return Err(Error::NoRecordToModify(describe_identity(delta)));
        };
        if !delta.has_changes() {
            return Err(Error::RequiredFieldMissing("rate".to_string()));
        }
        state.check_source(delta.info_source)?;
        let id = current.id.unwrap_or_default();
        if let Some(stored) = state.rates.get_mut(&id) {
            if let Some(reduced) = delta.reduced_rate() {
                stored.rate = reduced;
            }
            if delta.info_source.is_some() {
                stored.source = delta.info_source;
            }
        }
        Ok(state
            .find_rate(&ExchangeRateQuery::by_id(id))
            .unwrap_or(current))
    }

    fn edges_from(&self, currency_id: i32) -> Result<Vec<RateEdge>> {
        let state = self.state();
        Ok(state
            .rates
            .values()
            .filter(|r| r.base_id == currency_id)
            .filter_map(|r| {
                Some(RateEdge {
                    target_currency_id: r.target_id,
                    target_currency_code: state.code_of(r.target_id)?,
                    rate: r.rate,
                })
            })
            .collect())
    }
}

impl RateSourceRepositoryTrait for InMemoryStore {
    fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    fn source_exists(&self, source_id: i32) -> Result<bool> {
        Ok(self.state().sources.contains_key(&source_id))
    }

    fn source_ids(&self) -> Result<Vec<i32>> {
        Ok(self.state().sources.keys().copied().collect())
    }

    fn get_appeal_state(&self, source_id: i32) -> Result<Option<AppealState>> {
        Ok(self.state().sources.get(&source_id).map(|s| AppealState {
            last_appeal: s.last_appeal,
            days_valid: s.days_valid,
        }))
    }

    fn get_source_path(&self, source_id: i32) -> Result<Option<String>> {
        Ok(self
            .state()
            .sources
            .get(&source_id)
            .map(|s| s.src_path.clone()))
    }

    fn stamp_last_appeal(&self, source_id: i32, date: NaiveDate, _commit: bool) -> Result<()> {
        self.set_last_appeal(source_id, date);
        Ok(())
    }

    fn add_source(&self, src_path: &str, days_valid: i32) -> Result<RateSource> {
        let id = self.put_source(days_valid);
        let mut state = self.state();
        let source = state
            .sources
            .get_mut(&id)
            .ok_or_else(|| Error::NoRecordToModify(format!("rate source {}", id)))?;
        source.src_path = src_path.to_string();
        Ok(source.clone())
    }
}
