use anyhow::{bail, Result};
use std::env;
use std::io;

use design_patterns::{
    format_cnpj, format_cpf, get_behavior, init_logging, validate_email, validate_password,
    AppConfig, BehaviorKind, CepApi, CepDirectory, ConsoleCrm, Context, CustomerStore, Facade,
    MoveOutcome, PostalCodeLookup, SqliteCrm,
};

const USAGE: &str = "Usage:
  design-patterns [demo]
  design-patterns move <aggressive|defensive|normal|none>
  design-patterns migrate <name> <postal_code>
  design-patterns customers
  design-patterns format-cpf <value>
  design-patterns format-cnpj <value>
  design-patterns check-email <value>
  design-patterns check-password <value>";

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let config = AppConfig::load()?;

    match args.get(1).map(String::as_str) {
        None | Some("demo") => run_demo(&config)?,
        Some("move") => run_move(&config, args.get(2).map(String::as_str))?,
        Some("migrate") => {
            let (Some(name), Some(postal_code)) = (args.get(2), args.get(3)) else {
                bail!("migrate needs <name> <postal_code>\n\n{}", USAGE);
            };
            run_migrate(&config, name, postal_code)?;
        }
        Some("customers") => run_customers(&config)?,
        Some("format-cpf") => println!("{}", format_cpf(required(&args, 2)?)),
        Some("format-cnpj") => println!("{}", format_cnpj(required(&args, 2)?)),
        Some("check-email") => print_check(validate_email(required(&args, 2)?)),
        Some("check-password") => print_check(validate_password(required(&args, 2)?)),
        Some("help") | Some("--help") | Some("-h") => println!("{}", USAGE),
        Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }

    Ok(())
}

fn required(args: &[String], index: usize) -> Result<&str> {
    match args.get(index) {
        Some(value) => Ok(value.as_str()),
        None => bail!("Missing argument\n\n{}", USAGE),
    }
}

fn print_check(valid: bool) {
    if valid {
        println!("✓ valid");
    } else {
        println!("✗ invalid");
    }
}

fn run_demo(config: &AppConfig) -> Result<()> {
    println!("🎯 Strategy");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut context = Context::new();
    if let Some(kind) = config.strategy.default_behavior {
        context.set_strategy(Some(get_behavior(kind)));
    }

    let mut out = io::stdout();
    context.perform_move(&mut out)?;
    for kind in BehaviorKind::ALL {
        context.set_strategy(Some(get_behavior(kind)));
        context.perform_move(&mut out)?;
    }

    println!("\n🚪 Facade");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    run_migrate(config, "Alice", "12345-678")
}

fn run_move(config: &AppConfig, kind: Option<&str>) -> Result<()> {
    let mut context = Context::new();

    match kind {
        Some("none") => context.set_strategy(None),
        Some(kind) => context.set_strategy(Some(get_behavior(kind.parse::<BehaviorKind>()?))),
        None => {
            if let Some(kind) = config.strategy.default_behavior {
                context.set_strategy(Some(get_behavior(kind)));
            }
        }
    }

    if context.perform_move(&mut io::stdout())? == MoveOutcome::NoStrategy {
        tracing::debug!("move requested without a strategy");
    }

    Ok(())
}

fn build_lookup(config: &AppConfig) -> Result<Box<dyn PostalCodeLookup>> {
    match &config.lookup.directory {
        Some(path) => Ok(Box::new(CepDirectory::from_csv(path)?)),
        None => Ok(Box::new(CepApi::shared())),
    }
}

fn build_store(config: &AppConfig) -> Result<Box<dyn CustomerStore>> {
    if config.data.database_path.is_some() {
        Ok(Box::new(SqliteCrm::open(&config.data)?))
    } else {
        Ok(Box::new(ConsoleCrm::stdout()))
    }
}

fn run_migrate(config: &AppConfig, name: &str, postal_code: &str) -> Result<()> {
    let facade = Facade::new(build_lookup(config)?, build_store(config)?)
        .with_policy(config.migration.policy);

    facade.migrate_customer(name, postal_code)?;

    if config.data.database_path.is_some() {
        println!("✓ Migrated {} ({})", name, postal_code);
    }

    Ok(())
}

fn run_customers(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.data.database_path else {
        bail!(
            "No customer database configured (set data.database_path or {})",
            design_patterns::config::DATABASE_ENV
        );
    };

    if !path.exists() {
        eprintln!("❌ Database not found: {}", path.display());
        eprintln!("   Run: design-patterns migrate <name> <postal_code>");
        eprintln!("   to save a customer first.");
        std::process::exit(1);
    }

    let crm = SqliteCrm::open(&config.data)?;
    let customers = crm.get_all_customers()?;

    println!("📇 {} customers", customers.len());
    for customer in customers {
        println!(
            "{:>4}  {}  {:<20} {:<10} {:<20} {}",
            customer.id,
            customer.saved_at.format("%Y-%m-%d %H:%M"),
            customer.record.name,
            customer.record.postal_code,
            customer.record.city,
            customer.record.state,
        );
    }

    Ok(())
}
