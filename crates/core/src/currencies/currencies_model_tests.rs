//! Tests for currency domain models.

#[cfg(test)]
mod tests {
    use crate::currencies::{is_valid_currency_code, Currency, CurrencyCode};
    use crate::errors::{Error, ErrorKind, ValidationError};
    use crate::fields::{describe_identity, require_identity, CurrencyField};

    // ==================== CurrencyCode ====================

    #[test]
    fn test_currency_code_accepts_three_uppercase_letters() {
        let code = CurrencyCode::parse("RUB").unwrap();
        assert_eq!(code.as_str(), "RUB");
        assert_eq!(code.to_string(), "RUB");
        assert_eq!(code, "RUB");
    }

    #[test]
    fn test_currency_code_rejects_malformed_values() {
        for bad in ["", "US", "USDT", "usd", "U5D", "ÄBC", " US"] {
            assert!(!is_valid_currency_code(bad), "{bad:?} should be invalid");
            assert!(matches!(
                CurrencyCode::parse(bad),
                Err(ValidationError::InvalidCurrencyCode(_))
            ));
        }
    }

    #[test]
    fn test_currency_code_serde_validates() {
        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code, "EUR");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"eur\"").is_err());
    }

    // ==================== Currency ====================

    #[test]
    fn test_currency_new_with_invalid_code_fails() {
        let err = Currency::new(None, Some("Dollar"), Some("US Dollar"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_currency_deserialization_rejects_bad_code() {
        let json = r#"{"id": null, "code": "us", "fullName": "US Dollar", "sign": "$"}"#;
        assert!(serde_json::from_str::<Currency>(json).is_err());

        let json = r#"{"code": "USD", "fullName": "US Dollar"}"#;
        let currency: Currency = serde_json::from_str(json).unwrap();
        assert_eq!(currency.code.unwrap(), "USD");
        assert_eq!(currency.sign, None);
    }

    #[test]
    fn test_currency_has_changes_ignores_identity_fields() {
        let identity_only = Currency::new(Some(3), Some("USD"), None, None).unwrap();
        assert!(!identity_only.has_changes());

        let delta = Currency::new(Some(3), None, None, Some("$")).unwrap();
        assert!(delta.has_changes());
    }

    // ==================== Identity ====================

    #[test]
    fn test_identity_fields_surrogate_key_first() {
        let currency = Currency::new(Some(1), Some("USD"), None, None).unwrap();
        assert_eq!(
            require_identity(&currency).unwrap(),
            vec![CurrencyField::Id, CurrencyField::Code]
        );
        assert_eq!(describe_identity(&currency), "currency (id, code)");
    }

    #[test]
    fn test_identity_missing_without_id_or_code() {
        let currency = Currency::new(None, None, Some("US Dollar"), Some("$")).unwrap();
        assert!(matches!(
            require_identity(&currency),
            Err(Error::IdentityMissing(_))
        ));
    }
}
