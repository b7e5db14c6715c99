//! # Bella CLI Library
//!
//! Command-line front end of the Bella ledger.
//!
//! ## Module Organization
//! ```text
//! bella_cli/
//! ├── lib.rs          ◄─── You are here (run, tracing, dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (toml + env)
//! │   └── store.rs    ◄─── Opening the entity store
//! ├── commands/
//! │   ├── customer.rs ◄─── Customer commands
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── sale.rs     ◄─── Sale commands
//! │   ├── installment.rs
//! │   ├── dashboard.rs
//! │   └── profile.rs
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Contract
//! - stdout: one JSON document, the command result or an [`ApiError`]
//! - stderr: logs
//! - exit status: 0 on success, 1 on error, 2 on usage errors (clap)

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use bella_core::{Clock, CreateSaleRequest, CustomerUpdate, NewProduct};
use bella_store::{EntityStore, SnapshotPersistence};
use cli::{
    Cli, Command, ConfigCommand, CustomerCommand, InstallmentCommand, ProductCommand,
    ProfileCommand, SaleCommand,
};
use commands::product::ProductFilter;
use commands::profile::ProfileChanges;
use error::ApiError;
use state::{open_store, AppConfig};

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Run                                       │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, writing to stderr             │
/// │                                                                         │
/// │  2. Parse Arguments ──────────────────────────────────────────────────► │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → config.toml → BELLA_* environment                      │
/// │                                                                         │
/// │  4. Open Store ───────────────────────────────────────────────────────► │
/// │     • <data dir>/bellagestao_v1.json, defaults if missing/corrupt       │
/// │                                                                         │
/// │  5. Execute Command, print JSON ──────────────────────────────────────► │
/// │                                                                         │
/// │  6. Close Store ──────────────────────────────────────────────────────► │
/// │     • retries any save that failed during the command                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    match execute(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", to_json(&err).unwrap_or_else(|_| err.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bella=trace` - Show trace for bella crates only
/// - Default: INFO, DEBUG for bella crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bella=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Executes a parsed command line and returns the JSON to print.
pub fn execute(cli: Cli) -> Result<String, ApiError> {
    let Cli {
        config: config_path,
        command,
    } = cli;
    let config =
        AppConfig::load(config_path.clone()).map_err(|e| ApiError::config(e.to_string()))?;

    match command {
        Command::Config(command) => run_config(command, &config, config_path),
        command => {
            let mut store = open_store(&config)?;
            let output = dispatch(command, &mut store, &config);
            finish(store, output)
        }
    }
}

/// Closes the store after a command.
///
/// A close failure is returned only when the command succeeded; when both
/// fail the command's error is returned and the close error is logged.
pub fn finish<P, C>(
    store: EntityStore<P, C>,
    output: Result<String, ApiError>,
) -> Result<String, ApiError>
where
    P: SnapshotPersistence,
    C: Clock,
{
    match (output, store.close()) {
        (output, Ok(())) => {
            info!("Store closed");
            output
        }
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(command_err), Err(close_err)) => {
            error!(error = %close_err, "Store close failed after a failed command");
            Err(command_err)
        }
    }
}

fn run_config(
    command: ConfigCommand,
    config: &AppConfig,
    path: Option<std::path::PathBuf>,
) -> Result<String, ApiError> {
    #[derive(Serialize)]
    struct EffectiveConfig<'a> {
        #[serde(flatten)]
        config: &'a AppConfig,
        resolved_data_dir: std::path::PathBuf,
    }

    if let ConfigCommand::Init = command {
        config
            .save(path)
            .map_err(|e| ApiError::config(e.to_string()))?;
    }

    to_json(&EffectiveConfig {
        config,
        resolved_data_dir: config.resolved_data_dir(),
    })
}

/// Routes a command to its handler.
///
/// Amounts are formatted with the symbol of the profile currency unless
/// the config pins one.
pub fn dispatch<P, C>(
    command: Command,
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
) -> Result<String, ApiError>
where
    P: SnapshotPersistence,
    C: Clock,
{
    use commands::{customer, dashboard, installment, product, profile, sale};

    let config = &config.with_currency(&store.snapshot().profile.currency);

    match command {
        Command::Customer(command) => match command {
            CustomerCommand::Add { name, phone } => {
                to_json(&customer::add_customer(store, config, name, phone)?)
            }
            CustomerCommand::Edit { id, name, phone } => to_json(&customer::edit_customer(
                store,
                config,
                &id,
                CustomerUpdate { name, phone },
            )?),
            CustomerCommand::Delete { id } => to_json(&customer::delete_customer(store, &id)?),
            CustomerCommand::List { search } => {
                to_json(&customer::list_customers(&*store, config, search.as_deref())?)
            }
            CustomerCommand::Show { id } => to_json(&customer::show_customer(&*store, config, &id)?),
        },

        Command::Product(command) => match command {
            ProductCommand::Add(args) => to_json(&product::add_product(
                store,
                config,
                NewProduct {
                    name: args.name,
                    category: args.category,
                    price_cents: args.price_cents,
                    stock: args.stock,
                    min_stock: args.min_stock,
                },
            )?),
            ProductCommand::List {
                search,
                category,
                low_stock,
            } => to_json(&product::list_products(
                &*store,
                config,
                &ProductFilter {
                    search,
                    category,
                    low_stock,
                },
            )?),
            ProductCommand::Restock { id, delta } => {
                to_json(&product::restock(store, config, &id, delta)?)
            }
            ProductCommand::Categories => to_json(&product::list_categories(&*store)?),
        },

        Command::Sale(command) => match command {
            SaleCommand::Create {
                customer,
                items,
                payment,
                installments,
            } => to_json(&sale::create_sale(
                store,
                config,
                CreateSaleRequest {
                    customer_id: customer,
                    items,
                    payment_method: payment,
                    installments_count: installments,
                },
            )?),
            SaleCommand::List { customer } => {
                to_json(&sale::list_sales(&*store, config, customer.as_deref())?)
            }
        },

        Command::Installment(command) => match command {
            InstallmentCommand::Pay { id } => {
                to_json(&installment::pay_installment(store, config, &id)?)
            }
            InstallmentCommand::Pending { overdue } => {
                to_json(&installment::pending_installments(&*store, config, overdue)?)
            }
        },

        Command::Dashboard => to_json(&dashboard::dashboard(&*store, config)?),

        Command::Profile(command) => match command {
            ProfileCommand::Show => to_json(&profile::show_profile(&*store)?),
            ProfileCommand::Set {
                name,
                business_name,
                currency,
                theme,
            } => to_json(&profile::set_profile(
                store,
                ProfileChanges {
                    name,
                    business_name,
                    currency,
                    theme,
                },
            )?),
        },

        Command::Config(_) => Err(ApiError::internal("config commands do not use the store")),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}
