// 📮 Postal code lookup - city and state from a CEP
// Two implementations: the fixed-value CepApi stub and a CSV-backed CepDirectory

use crate::error::LookupError;
use crate::formatting::normalize_postal_code;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// LOOKUP CONTRACT
// ============================================================================

/// PostalCodeLookup - what the facade needs from an address service
///
/// Lookups are read-only; implementations must be safe to share across threads.
pub trait PostalCodeLookup: Send + Sync {
    fn recover_city(&self, postal_code: &str) -> Result<String, LookupError>;

    fn recover_state(&self, postal_code: &str) -> Result<String, LookupError>;
}

impl<T: PostalCodeLookup + ?Sized> PostalCodeLookup for &T {
    fn recover_city(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_city(postal_code)
    }

    fn recover_state(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_state(postal_code)
    }
}

impl<T: PostalCodeLookup + ?Sized> PostalCodeLookup for Box<T> {
    fn recover_city(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_city(postal_code)
    }

    fn recover_state(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_state(postal_code)
    }
}

impl<T: PostalCodeLookup + ?Sized> PostalCodeLookup for Arc<T> {
    fn recover_city(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_city(postal_code)
    }

    fn recover_state(&self, postal_code: &str) -> Result<String, LookupError> {
        (**self).recover_state(postal_code)
    }
}

// ============================================================================
// CEP API (shared stub)
// ============================================================================

/// Stub address API: every postal code resolves to the same placeholders
///
/// One process-wide instance, built at compile time and read-only for the
/// life of the process. Prefer injecting `CepApi::shared()` over calling it
/// from inside other components.
#[derive(Debug)]
pub struct CepApi {
    city: &'static str,
    state: &'static str,
}

static SHARED_CEP_API: CepApi = CepApi::new();

impl CepApi {
    const fn new() -> Self {
        CepApi {
            city: "City",
            state: "State",
        }
    }

    /// The single shared instance
    pub fn shared() -> &'static CepApi {
        &SHARED_CEP_API
    }
}

impl PostalCodeLookup for CepApi {
    fn recover_city(&self, _postal_code: &str) -> Result<String, LookupError> {
        Ok(self.city.to_string())
    }

    fn recover_state(&self, _postal_code: &str) -> Result<String, LookupError> {
        Ok(self.state.to_string())
    }
}

// ============================================================================
// CEP DIRECTORY (CSV-backed)
// ============================================================================

/// One row of the address table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub city: String,
    pub state: String,
}

/// Address table keyed by the digits of the postal code
///
/// `12345-678` and `12345678` hit the same entry.
#[derive(Debug, Default)]
pub struct CepDirectory {
    entries: HashMap<String, Address>,
}

impl CepDirectory {
    pub fn new() -> Self {
        CepDirectory {
            entries: HashMap::new(),
        }
    }

    /// Build a directory from known addresses (later duplicates win)
    pub fn from_entries(entries: impl IntoIterator<Item = Address>) -> Self {
        let mut directory = CepDirectory::new();
        for address in entries {
            directory.insert(address);
        }
        directory
    }

    /// Load a CSV file with a `cep,city,state` header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open CEP directory: {}", path.display()))?;

        let mut directory = CepDirectory::new();
        for (line_num, result) in reader.deserialize::<Address>().enumerate() {
            let address = result.with_context(|| {
                format!(
                    "Failed to parse CEP directory line {} in {}",
                    line_num + 2,
                    path.display()
                )
            })?;
            directory.insert(address);
        }

        tracing::info!(entries = directory.len(), path = %path.display(), "CEP directory loaded");
        Ok(directory)
    }

    pub fn insert(&mut self, address: Address) {
        self.entries
            .insert(normalize_postal_code(&address.cep), address);
    }

    pub fn get(&self, postal_code: &str) -> Option<&Address> {
        self.entries.get(&normalize_postal_code(postal_code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve(&self, postal_code: &str) -> Result<&Address, LookupError> {
        self.get(postal_code)
            .ok_or_else(|| LookupError::NotFound(postal_code.to_string()))
    }
}

impl PostalCodeLookup for CepDirectory {
    fn recover_city(&self, postal_code: &str) -> Result<String, LookupError> {
        self.resolve(postal_code).map(|a| a.city.clone())
    }

    fn recover_state(&self, postal_code: &str) -> Result<String, LookupError> {
        self.resolve(postal_code).map(|a| a.state.clone())
    }
}
