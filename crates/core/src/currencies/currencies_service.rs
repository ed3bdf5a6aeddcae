use log::{debug, info};
use std::sync::Arc;

use super::currencies_model::Currency;
use super::currencies_traits::{CurrencyRepositoryTrait, CurrencyServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing currencies.
#[derive(Clone)]
pub struct CurrencyService {
    repository: Arc<dyn CurrencyRepositoryTrait>,
}

impl CurrencyService {
    pub fn new(repository: Arc<dyn CurrencyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl CurrencyServiceTrait for CurrencyService {
    fn get_currency(&self, query: &Currency) -> Result<Option<Currency>> {
        self.repository.get(query)
    }

    fn get_all_currencies(&self) -> Result<Vec<Currency>> {
        self.repository.list()
    }

    fn add_currency(&self, currency: &Currency) -> Result<Currency> {
        debug!("Adding currency {:?}", currency.code);
        self.repository.add(currency)
    }

    fn update_currency(&self, delta: &Currency) -> Result<Currency> {
        debug!("Updating currency id={:?} code={:?}", delta.id, delta.code);
        self.repository.update(delta)
    }

    fn seed_currencies(&self, catalog: &[Currency]) -> Result<usize> {
        let mut inserted = 0;
        for entry in catalog {
            let Some(code) = entry.code.clone() else {
                continue;
            };
            if self.repository.get(&Currency::for_code(code))?.is_some() {
                continue;
            }
            match self.repository.add(entry) {
                Ok(_) => inserted += 1,
                // Inserted concurrently by someone else.
                Err(Error::DuplicateIdentity(_)) => {}
                Err(e) => return Err(e),
            }
        }
        info!(
            "Seeded {} of {} catalog currencies",
            inserted,
            catalog.len()
        );
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_support::InMemoryStore;

    fn service() -> (CurrencyService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (CurrencyService::new(store.clone()), store)
    }

    #[test]
    fn test_add_then_get_by_code_round_trips() {
        let (service, _) = service();
        let amd = Currency::new(None, Some("AMD"), Some("Armenian Dram"), Some("դր.")).unwrap();
        let added = service.add_currency(&amd).unwrap();

        let found = service
            .get_currency(&Currency::with_code("AMD").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found, added);
        assert!(found.id.is_some());
    }

    #[test]
    fn test_seed_skips_existing_codes() {
        let (service, store) = service();
        store.put_currency("USD", "US Dollar", "$");

        let catalog = vec![
            Currency::new(None, Some("USD"), Some("Dollar"), Some("$")).unwrap(),
            Currency::new(None, Some("EUR"), Some("Euro"), Some("€")).unwrap(),
        ];
        assert_eq!(service.seed_currencies(&catalog).unwrap(), 1);
        assert_eq!(service.get_all_currencies().unwrap().len(), 2);

        let usd = service
            .get_currency(&Currency::with_code("USD").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(usd.full_name.as_deref(), Some("US Dollar"));
    }

    #[test]
    fn test_update_without_identity_is_rejected() {
        let (service, _) = service();
        let delta = Currency {
            sign: Some("x".into()),
            ..Currency::default()
        };
        let err = service.update_currency(&delta).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentityMissing);
    }
}
