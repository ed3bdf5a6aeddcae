//! Rate resolution: direct lookup, reciprocal inversion and pivot through a
//! common target currency.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use log::debug;

use super::fx_model::{ExchangeRate, ExchangeRateQuery};
use super::fx_traits::ExchangeRateRepositoryTrait;
use super::rate_calculations::{cross_rate, reciprocal_rate};
use crate::currencies::{Currency, CurrencyCode, CurrencyRepositoryTrait};
use crate::errors::{Error, Result};
use crate::fields::require_identity;

/// Set of derivation strategies tried after the direct lookup.
///
/// Strategies are always attempted in the order Direct, Reciprocal, Pivot and
/// the first success wins, regardless of how the flags were combined.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolutionStrategy(u8);

impl ResolutionStrategy {
    pub const DIRECT_ONLY: Self = Self(0);
    pub const NONE: Self = Self::DIRECT_ONLY;
    pub const RECIPROCAL: Self = Self(1);
    pub const COMMON_TARGET: Self = Self(1 << 1);
    pub const ALL: Self = Self(Self::RECIPROCAL.0 | Self::COMMON_TARGET.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_direct_only(self) -> bool {
        self.0 == 0
    }

    /// True when at least one requested strategy works on a code pair.
    pub const fn needs_pair(self) -> bool {
        !self.is_direct_only()
    }
}

impl BitOr for ResolutionStrategy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResolutionStrategy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::RECIPROCAL) {
            names.push("RECIPROCAL");
        }
        if self.contains(Self::COMMON_TARGET) {
            names.push("COMMON_TARGET");
        }
        if names.is_empty() {
            names.push("DIRECT_ONLY");
        }
        write!(f, "ResolutionStrategy({})", names.join(" | "))
    }
}

/// Resolves rate queries against the stored edges.
#[derive(Clone)]
pub struct RateResolver {
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    rates: Arc<dyn ExchangeRateRepositoryTrait>,
}

impl RateResolver {
    pub fn new(
        currencies: Arc<dyn CurrencyRepositoryTrait>,
        rates: Arc<dyn ExchangeRateRepositoryTrait>,
    ) -> Self {
        Self { currencies, rates }
    }

    /// Resolves `query` with the direct lookup first, then the requested
    /// strategies. Derived rates carry no id and no source, one unit, and a
    /// rate rounded to four places.
    pub fn resolve(
        &self,
        query: &ExchangeRateQuery,
        strategy: ResolutionStrategy,
    ) -> Result<Option<ExchangeRate>> {
        require_identity(query)?;
        let pair = query.pair();
        if strategy.needs_pair() && pair.is_none() {
            return Err(Error::InvalidUsage(format!(
                "{:?} requires both base and target currency codes",
                strategy
            )));
        }

        if let Some(rate) = self.rates.get(query)? {
            return Ok(Some(rate));
        }

        let Some((base, target)) = pair else {
            return Ok(None);
        };

        if strategy.contains(ResolutionStrategy::RECIPROCAL) {
            if let Some(rate) = self.resolve_reciprocal(base, target)? {
                debug!("Resolved {}->{} by reciprocal", base, target);
                return Ok(Some(rate));
            }
        }

        if strategy.contains(ResolutionStrategy::COMMON_TARGET) {
            if let Some(rate) = self.resolve_through_pivot(base, target)? {
                debug!("Resolved {}->{} through a common target", base, target);
                return Ok(Some(rate));
            }
        }

        Ok(None)
    }

    fn resolve_reciprocal(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Option<ExchangeRate>> {
        let reverse_query = ExchangeRateQuery::for_pair(target.clone(), base.clone());
        let Some(reverse) = self.rates.get(&reverse_query)? else {
            return Ok(None);
        };
        Ok(reverse
            .reduced_rate()
            .and_then(reciprocal_rate)
            .map(|rate| ExchangeRate::derived(base.clone(), target.clone(), rate)))
    }

    fn resolve_through_pivot(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Option<ExchangeRate>> {
        let (Some(base_id), Some(target_id)) = (self.currency_id(base)?, self.currency_id(target)?)
        else {
            return Ok(None);
        };

        let target_edges: BTreeMap<i32, _> = self
            .rates
            .edges_from(target_id)?
            .into_iter()
            .map(|edge| (edge.target_currency_id, edge.rate))
            .collect();
        let mut base_edges: BTreeMap<i32, _> = self
            .rates
            .edges_from(base_id)?
            .into_iter()
            .map(|edge| (edge.target_currency_id, edge.rate))
            .collect();
        base_edges.retain(|pivot, _| *pivot != base_id && *pivot != target_id);

        // Lowest pivot id wins.
        let pivot = base_edges.iter().find_map(|(pivot_id, base_rate)| {
            target_edges
                .get(pivot_id)
                .map(|target_rate| (*base_rate, *target_rate))
        });

        Ok(pivot
            .and_then(|(base_rate, target_rate)| cross_rate(base_rate, target_rate))
            .map(|rate| ExchangeRate::derived(base.clone(), target.clone(), rate)))
    }

    fn currency_id(&self, code: &CurrencyCode) -> Result<Option<i32>> {
        Ok(self
            .currencies
            .get(&Currency::for_code(code.clone()))?
            .and_then(|currency| currency.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_support::InMemoryStore;
    use rust_decimal_macros::dec;

    fn resolver_with(store: &Arc<InMemoryStore>) -> RateResolver {
        RateResolver::new(store.clone(), store.clone())
    }

    fn pair(base: &str, target: &str) -> ExchangeRateQuery {
        ExchangeRateQuery::by_pair(base, target).unwrap()
    }

    #[test]
    fn test_strategy_flags_combine() {
        let mut strategy = ResolutionStrategy::DIRECT_ONLY;
        assert!(!strategy.needs_pair());
        strategy |= ResolutionStrategy::COMMON_TARGET;
        assert!(strategy.contains(ResolutionStrategy::COMMON_TARGET));
        assert!(!strategy.contains(ResolutionStrategy::RECIPROCAL));
        assert_eq!(
            ResolutionStrategy::RECIPROCAL | ResolutionStrategy::COMMON_TARGET,
            ResolutionStrategy::ALL
        );
        assert_eq!(
            format!("{:?}", ResolutionStrategy::ALL),
            "ResolutionStrategy(RECIPROCAL | COMMON_TARGET)"
        );
    }

    #[test]
    fn test_direct_rate_is_returned_as_stored() {
        let store = Arc::new(InMemoryStore::new());
        store.put_rate("AUD", "RUB", dec!(58.02443));
        let resolver = resolver_with(&store);

        let rate = resolver
            .resolve(&pair("AUD", "RUB"), ResolutionStrategy::ALL)
            .unwrap()
            .unwrap();
        assert_eq!(rate.rate, Some(dec!(58.02443)));
        assert!(rate.id.is_some());
    }

    #[test]
    fn test_reverse_pair_needs_reciprocal_strategy() {
        let store = Arc::new(InMemoryStore::new());
        store.put_rate("AUD", "RUB", dec!(58.0244));
        let resolver = resolver_with(&store);

        let direct = resolver
            .resolve(&pair("RUB", "AUD"), ResolutionStrategy::DIRECT_ONLY)
            .unwrap();
        assert!(direct.is_none());

        let reciprocal = resolver
            .resolve(&pair("RUB", "AUD"), ResolutionStrategy::RECIPROCAL)
            .unwrap()
            .unwrap();
        assert_eq!(reciprocal.rate, Some(dec!(0.0172)));
        assert_eq!(reciprocal.units, Some(1));
        assert_eq!(reciprocal.id, None);
        assert_eq!(reciprocal.info_source, None);
        assert_eq!(reciprocal.base_currency_code, "RUB");
    }

    #[test]
    fn test_pivot_through_common_target() {
        let store = Arc::new(InMemoryStore::new());
        store.put_rate("AAA", "CCC", dec!(2.0));
        store.put_rate("BBB", "CCC", dec!(0.5));
        let resolver = resolver_with(&store);

        let rate = resolver
            .resolve(&pair("AAA", "BBB"), ResolutionStrategy::COMMON_TARGET)
            .unwrap()
            .unwrap();
        assert_eq!(rate.rate, Some(dec!(4)));
        assert_eq!(rate.id, None);

        // Reciprocal alone cannot find it.
        assert!(resolver
            .resolve(&pair("AAA", "BBB"), ResolutionStrategy::RECIPROCAL)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_pivot_prefers_lowest_currency_id() {
        let store = Arc::new(InMemoryStore::new());
        store.put_currency("USD", "US Dollar", "$");
        store.put_currency("EUR", "Euro", "€");
        store.put_rate("BTC", "EUR", dec!(10));
        store.put_rate("ETH", "EUR", dec!(1));
        store.put_rate("BTC", "USD", dec!(5000));
        store.put_rate("ETH", "USD", dec!(890.15));
        let resolver = resolver_with(&store);

        let rate = resolver
            .resolve(&pair("BTC", "ETH"), ResolutionStrategy::COMMON_TARGET)
            .unwrap()
            .unwrap();
        assert_eq!(rate.rate, Some(dec!(5.6170)));
    }

    #[test]
    fn test_direct_wins_over_derivations() {
        let store = Arc::new(InMemoryStore::new());
        store.put_rate("AAA", "BBB", dec!(3));
        store.put_rate("BBB", "AAA", dec!(0.5));
        let resolver = resolver_with(&store);

        let rate = resolver
            .resolve(&pair("AAA", "BBB"), ResolutionStrategy::ALL)
            .unwrap()
            .unwrap();
        assert_eq!(rate.rate, Some(dec!(3)));
    }

    #[test]
    fn test_unknown_codes_resolve_to_none() {
        let store = Arc::new(InMemoryStore::new());
        let resolver = resolver_with(&store);
        assert!(resolver
            .resolve(&pair("XXX", "YYY"), ResolutionStrategy::ALL)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_pivot_without_common_target_is_none() {
        let store = Arc::new(InMemoryStore::new());
        store.put_rate("AAA", "CCC", dec!(2));
        store.put_rate("BBB", "DDD", dec!(0.5));
        let resolver = resolver_with(&store);

        assert!(resolver
            .resolve(&pair("AAA", "BBB"), ResolutionStrategy::COMMON_TARGET)
            .unwrap()
            .is_none());
        assert!(resolver
            .resolve(&pair("AAA", "BBB"), ResolutionStrategy::ALL)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_strategy_without_pair_is_invalid_usage() {
        let store = Arc::new(InMemoryStore::new());
        let resolver = resolver_with(&store);

        let err = resolver
            .resolve(&ExchangeRateQuery::by_id(1), ResolutionStrategy::RECIPROCAL)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUsage);

        let err = resolver
            .resolve(
                &ExchangeRateQuery::by_id(1),
                ResolutionStrategy::COMMON_TARGET,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUsage);

        let err = resolver
            .resolve(
                &ExchangeRateQuery::default(),
                ResolutionStrategy::DIRECT_ONLY,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentityMissing);
    }
}
