//! # Commands Module
//!
//! One function per CLI subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (exports)
//! ├── customer.rs     ◄─── Customer CRUD, search, account view
//! ├── product.rs      ◄─── Catalog, stock adjustment
//! ├── sale.rs         ◄─── Credit sales
//! ├── installment.rs  ◄─── Payments and receivables
//! ├── dashboard.rs    ◄─── Aggregated figures
//! └── profile.rs      ◄─── Operator profile
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ bella installment pay 7d0e...                                        │
//! │         │                                                               │
//! │         ▼  (clap)                                                       │
//! │  Command::Installment(InstallmentCommand::Pay { id })                   │
//! │         │                                                               │
//! │         ▼  (lib.rs dispatch)                                            │
//! │  fn pay_installment(                                                    │
//! │      store: &mut EntityStore<P, C>,   ◄── Opened once per run           │
//! │      config: &AppConfig,              ◄── Currency formatting           │
//! │      id: &str,                                                          │
//! │  ) -> Result<Option<InstallmentDto>, ApiError>                          │
//! │         │                                                               │
//! │         ▼  (serde_json)                                                 │
//! │  stdout: {"id":"7d0e...","paid":true,...}                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands are generic over the persistence and the clock, so tests run
//! them against an in-memory store at a fixed instant.
//!
//! Mutations on an unknown id return `None` and print `null`: nothing
//! happened, and that is not an error.

pub mod customer;
pub mod dashboard;
pub mod installment;
pub mod product;
pub mod profile;
pub mod sale;
