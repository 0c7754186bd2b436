// 🚪 Facade - one call to migrate a customer
// Hides the two subsystems (postal lookup + CRM) behind migrate_customer()

use crate::crm::{CustomerRecord, CustomerStore};
use crate::error::MigrationError;
use crate::lookup::PostalCodeLookup;
use crate::validation::validate_migration_input;
use serde::{Deserialize, Serialize};

/// How much the facade checks its own input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPolicy {
    /// No checks: whatever the caller passes is looked up and persisted
    #[default]
    Lenient,

    /// Blank names and malformed postal codes are rejected before any call
    Strict,
}

/// Facade over a postal code lookup and a customer store
///
/// Both subsystems are injected, so the same flow runs against the stubs,
/// the CSV directory / SQLite store, or test fakes.
pub struct Facade<L, S> {
    lookup: L,
    store: S,
    policy: MigrationPolicy,
}

impl<L: PostalCodeLookup, S: CustomerStore> Facade<L, S> {
    pub fn new(lookup: L, store: S) -> Self {
        Facade {
            lookup,
            store,
            policy: MigrationPolicy::default(),
        }
    }

    /// Builder: set the input policy
    pub fn with_policy(mut self, policy: MigrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MigrationPolicy {
        self.policy
    }

    /// Migrate a customer: resolve city, then state, then save
    ///
    /// A failed lookup stops the migration before anything is saved.
    pub fn migrate_customer(&self, name: &str, postal_code: &str) -> Result<(), MigrationError> {
        if self.policy == MigrationPolicy::Strict {
            validate_migration_input(name, postal_code).inspect_err(|e| {
                tracing::warn!(error = %e, "migration rejected");
            })?;
        }

        let city = self.lookup.recover_city(postal_code).inspect_err(|e| {
            tracing::warn!(postal_code, error = %e, "city lookup failed");
        })?;
        tracing::debug!(postal_code, city = %city, "city resolved");

        let state = self.lookup.recover_state(postal_code).inspect_err(|e| {
            tracing::warn!(postal_code, error = %e, "state lookup failed");
        })?;
        tracing::debug!(postal_code, state = %state, "state resolved");

        let record = CustomerRecord::new(name.to_string(), postal_code.to_string(), city, state);
        self.store.save_customer(record).inspect_err(|e| {
            tracing::warn!(postal_code, error = %e, "customer save failed");
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::{ConsoleCrm, SqliteCrm};
    use crate::error::{ErrorKind, LookupError, StoreError};
    use crate::lookup::{Address, CepApi, CepDirectory};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        City(String),
        State(String),
        Save(CustomerRecord),
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    struct FakeLookup {
        log: CallLog,
        city: Result<&'static str, fn(String) -> LookupError>,
        state: Result<&'static str, fn(String) -> LookupError>,
    }

    impl FakeLookup {
        fn new(log: CallLog) -> Self {
            FakeLookup {
                log,
                city: Ok("Curitiba"),
                state: Ok("PR"),
            }
        }
    }

    impl PostalCodeLookup for FakeLookup {
        fn recover_city(&self, postal_code: &str) -> Result<String, LookupError> {
            self.log.lock().unwrap().push(Call::City(postal_code.to_string()));
            match self.city {
                Ok(city) => Ok(city.to_string()),
                Err(make) => Err(make(postal_code.to_string())),
            }
        }

        fn recover_state(&self, postal_code: &str) -> Result<String, LookupError> {
            self.log.lock().unwrap().push(Call::State(postal_code.to_string()));
            match self.state {
                Ok(state) => Ok(state.to_string()),
                Err(make) => Err(make(postal_code.to_string())),
            }
        }
    }

    struct FakeStore {
        log: CallLog,
    }

    impl CustomerStore for FakeStore {
        fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
            self.log.lock().unwrap().push(Call::Save(record));
            Ok(())
        }
    }

    fn fake_facade() -> (Facade<FakeLookup, FakeStore>, CallLog) {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let facade = Facade::new(FakeLookup::new(log.clone()), FakeStore { log: log.clone() });
        (facade, log)
    }

    #[test]
    fn test_migrate_calls_city_state_save_in_order() {
        let (facade, log) = fake_facade();

        facade.migrate_customer("Alice", "12345-678").unwrap();

        let calls = log.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                Call::City("12345-678".to_string()),
                Call::State("12345-678".to_string()),
                Call::Save(CustomerRecord::new(
                    "Alice".to_string(),
                    "12345-678".to_string(),
                    "Curitiba".to_string(),
                    "PR".to_string(),
                )),
            ]
        );
    }

    #[test]
    fn test_lenient_policy_persists_empty_name() {
        let (facade, log) = fake_facade();
        assert_eq!(facade.policy(), MigrationPolicy::Lenient);

        facade.migrate_customer("", "12345-678").unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 3);
        match &calls[2] {
            Call::Save(record) => {
                assert_eq!(record.name, "");
                assert_eq!(record.postal_code, "12345-678");
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_policy_rejects_before_any_call() {
        let (facade, log) = fake_facade();
        let facade = facade.with_policy(MigrationPolicy::Strict);

        let blank = facade.migrate_customer("", "12345-678").unwrap_err();
        let malformed = facade.migrate_customer("Alice", "12-34").unwrap_err();

        assert_eq!(blank.kind(), ErrorKind::ValidationFailure);
        assert_eq!(malformed.kind(), ErrorKind::ValidationFailure);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_strict_policy_allows_valid_input() {
        let (facade, log) = fake_facade();
        let facade = facade.with_policy(MigrationPolicy::Strict);

        facade.migrate_customer("Alice", "12345-678").unwrap();
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_failed_lookup_saves_nothing() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let lookup = FakeLookup {
            city: Err(LookupError::Unavailable),
            ..FakeLookup::new(log.clone())
        };
        let facade = Facade::new(lookup, FakeStore { log: log.clone() });

        let err = facade.migrate_customer("Alice", "12345-678").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(*log.lock().unwrap(), vec![Call::City("12345-678".to_string())]);
    }

    #[test]
    fn test_failed_state_lookup_saves_nothing() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let lookup = FakeLookup {
            state: Err(LookupError::NotFound),
            ..FakeLookup::new(log.clone())
        };
        let facade = Facade::new(lookup, FakeStore { log: log.clone() });

        let err = facade.migrate_customer("Alice", "12345-678").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Call::City("12345-678".to_string()),
                Call::State("12345-678".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_facade_uses_stub_placeholders() {
        let crm = ConsoleCrm::new(Vec::new());
        let facade = Facade::new(CepApi::shared(), &crm);

        facade.migrate_customer("Alice", "12345-678").unwrap();
        drop(facade);

        let output = String::from_utf8(crm.into_inner()).unwrap();
        assert_eq!(
            output,
            "Customer Saved on CRM System..\nName: Alice\nCEP: 12345-678\nState: State\nCity: City\n"
        );
    }

    #[test]
    fn test_directory_not_found_leaves_database_empty() {
        let directory = CepDirectory::from_entries(vec![Address {
            cep: "80010-000".to_string(),
            city: "Curitiba".to_string(),
            state: "PR".to_string(),
        }]);
        let crm = SqliteCrm::open_in_memory().unwrap();
        let facade = Facade::new(&directory, &crm);

        let err = facade.migrate_customer("Alice", "99999-999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(crm.count_customers().unwrap(), 0);

        facade.migrate_customer("Bob", "80010000").unwrap();
        let customers = crm.get_all_customers().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].record.city, "Curitiba");
        assert_eq!(customers[0].record.state, "PR");
        assert_eq!(customers[0].record.postal_code, "80010000");
    }
}
