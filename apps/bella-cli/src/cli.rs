//! # Command-Line Surface
//!
//! clap definitions only; dispatch lives in `lib.rs`.
//!
//! ```text
//! bella [--config FILE] <COMMAND>
//!
//!   customer     add | edit | delete | list | show
//!   product      add | list | restock | categories
//!   sale         create | list
//!   installment  pay | pending
//!   dashboard
//!   profile      show | set
//!   config       show | init
//! ```

use bella_core::{PaymentMethod, SaleLine, Theme};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::sale::parse_sale_line;

#[derive(Debug, Parser)]
#[command(
    name = "bella",
    version,
    about = "Credit-sales ledger: customers, stock, installments and collections"
)]
pub struct Cli {
    /// Config file (default: the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Record and list sales
    #[command(subcommand)]
    Sale(SaleCommand),

    /// Payments and receivables
    #[command(subcommand)]
    Installment(InstallmentCommand),

    /// Show today's figures and receivables by month
    Dashboard,

    /// Operator profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Register a customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Change name and/or phone
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer with all their sales and installments
    Delete { id: String },
    /// List customers
    List {
        /// Name or phone fragment
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show a customer's account
    Show { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Register a product
    Add(NewProductArgs),
    /// List products
    List {
        /// Name fragment
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Only products at or below their minimum stock
        #[arg(long)]
        low_stock: bool,
    },
    /// Add stock (negative to remove)
    Restock {
        id: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// List categories in use
    Categories,
}

#[derive(Debug, Args)]
pub struct NewProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub category: String,
    /// Unit price in cents
    #[arg(long)]
    pub price_cents: i64,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long, default_value_t = 0)]
    pub min_stock: i64,
}

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Record a sale on installments
    Create {
        #[arg(long)]
        customer: String,
        /// PRODUCT_ID[:QTY], repeatable
        #[arg(long = "item", required = true, value_parser = parse_sale_line)]
        items: Vec<SaleLine>,
        /// pix, credit_card, debit_card or cash
        #[arg(long, default_value = "pix")]
        payment: PaymentMethod,
        #[arg(long, default_value_t = 1)]
        installments: u32,
    },
    /// List sales, newest first
    List {
        #[arg(long)]
        customer: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum InstallmentCommand {
    /// Mark an installment paid
    Pay { id: String },
    /// List unpaid installments by due date
    Pending {
        #[arg(long)]
        overdue: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Change profile fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        business_name: Option<String>,
        /// ISO 4217 code
        #[arg(long)]
        currency: Option<String>,
        /// light or dark
        #[arg(long)]
        theme: Option<Theme>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init,
}
