//! Arithmetic helpers for derived rates.

use rust_decimal::Decimal;

use super::fx_model::ExchangeRate;
use crate::constants::RATE_PRECISION;

/// Rounds a derived rate to [`RATE_PRECISION`] decimal places.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp(RATE_PRECISION)
}

/// `round(1 / rate)`, or `None` for a zero rate.
pub fn reciprocal_rate(rate: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_div(rate).map(round_rate)
}

/// Rate `A -> B` from `A -> P` and `B -> P`: `round(base_to_pivot / target_to_pivot)`.
pub fn cross_rate(base_to_pivot: Decimal, target_to_pivot: Decimal) -> Option<Decimal> {
    base_to_pivot.checked_div(target_to_pivot).map(round_rate)
}

/// Returns `rates` followed by one synthesized rate for every unordered pair
/// of records sharing a target currency.
///
/// For a pair `(A -> T, B -> T)` the synthesized edge is `A -> B` with
/// `reduced(A -> T) / reduced(B -> T)`, unrounded. Records without a rate do
/// not take part in synthesis.
pub fn complete_rate_set(rates: Vec<ExchangeRate>) -> Vec<ExchangeRate> {
    let mut synthesized = Vec::new();
    for (i, first) in rates.iter().enumerate() {
        for second in &rates[i + 1..] {
            if first.target_currency_code != second.target_currency_code {
                continue;
            }
            let rate = first
                .reduced_rate()
                .zip(second.reduced_rate())
                .and_then(|(a, b)| a.checked_div(b));
            if let Some(rate) = rate {
                synthesized.push(ExchangeRate::derived(
                    first.base_currency_code.clone(),
                    second.base_currency_code.clone(),
                    rate,
                ));
            }
        }
    }

    let mut completed = rates;
    completed.extend(synthesized);
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(base: &str, target: &str, units: u32, value: Decimal) -> ExchangeRate {
        ExchangeRate::new(None, base, target, Some(units), Some(value), None).unwrap()
    }

    #[test]
    fn test_reciprocal_is_rounded_to_four_places() {
        assert_eq!(reciprocal_rate(dec!(58.0244)), Some(dec!(0.0172)));
        assert_eq!(reciprocal_rate(dec!(4)), Some(dec!(0.25)));
        assert_eq!(reciprocal_rate(Decimal::ZERO), None);
    }

    #[test]
    fn test_cross_rate() {
        assert_eq!(cross_rate(dec!(2.0), dec!(0.5)), Some(dec!(4)));
        assert_eq!(cross_rate(dec!(5000), dec!(890.15)), Some(dec!(5.6170)));
        assert_eq!(cross_rate(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn test_complete_rate_set_synthesizes_pairs_sharing_target() {
        let rates = vec![
            rate("USD", "RUB", 1, dec!(90)),
            rate("AMD", "RUB", 100, dec!(22.5)),
            rate("EUR", "USD", 1, dec!(1.1)),
        ];

        let completed = complete_rate_set(rates.clone());
        assert_eq!(completed.len(), 4);
        assert_eq!(&completed[..3], &rates[..]);

        let synthesized = &completed[3];
        assert_eq!(synthesized.base_currency_code, "USD");
        assert_eq!(synthesized.target_currency_code, "AMD");
        assert_eq!(synthesized.units, Some(1));
        assert_eq!(synthesized.rate, Some(dec!(400)));
        assert_eq!(synthesized.id, None);
        assert_eq!(synthesized.info_source, None);
    }

    #[test]
    fn test_complete_rate_set_of_three_sharing_target() {
        let rates = vec![
            rate("USD", "RUB", 1, dec!(90)),
            rate("EUR", "RUB", 1, dec!(100)),
            rate("GBP", "RUB", 1, dec!(120)),
        ];
        let completed = complete_rate_set(rates);
        let pairs: Vec<(&str, &str)> = completed[3..]
            .iter()
            .map(|r| (r.base_currency_code.as_str(), r.target_currency_code.as_str()))
            .collect();
        assert_eq!(pairs, vec![("USD", "EUR"), ("USD", "GBP"), ("EUR", "GBP")]);
    }
}
