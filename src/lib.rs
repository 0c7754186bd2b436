// Design Patterns - Core Library
// Strategy (swappable movement behavior) and Facade (customer migration over two subsystems)

pub mod error;
pub mod strategy;       // Strategy: Behavior + Context
pub mod lookup;         // Subsystem 1: postal code lookup
pub mod crm;            // Subsystem 2: customer store
pub mod facade;         // Facade: migrate_customer
pub mod formatting;     // CPF / CNPJ / CEP formatting
pub mod validation;     // Email, password, migration input checks
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{ErrorKind, LookupError, MigrationError, StoreError};
pub use strategy::{
    Behavior, BehaviorKind, Context, MoveOutcome,
    AggressiveBehavior, DefensiveBehavior, NormalBehavior,
    get_behavior, NO_STRATEGY_MESSAGE,
};
pub use lookup::{Address, CepApi, CepDirectory, PostalCodeLookup};
pub use crm::{
    ConsoleCrm, CustomerEvent, CustomerRecord, CustomerStore, SqliteCrm, StoredCustomer,
    setup_database,
};
pub use facade::{Facade, MigrationPolicy};
pub use formatting::{format_cnpj, format_cpf, normalize_postal_code, remove_format};
pub use validation::{
    validate_customer_name, validate_email, validate_migration_input, validate_password,
    validate_postal_code,
};
pub use config::{AppConfig, DataConfig, LookupConfig, MigrationConfig, StrategyConfig};
pub use logging::init_logging;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
