//! Shopdesk CLI - order-admin workflow from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List every order, or one customer's
//! shopdesk orders list
//! shopdesk orders list --customer 42
//!
//! # Compose and create an order: two of product 7, one of product 9
//! shopdesk orders create --customer 42 --line 7:2 --line 9 --payment card
//!
//! # Move an order through its lifecycle
//! shopdesk orders set-status 18 shipped
//!
//! # Browse the catalog with effective prices
//! shopdesk catalog list
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPDESK_API_URL` - Base URL of the store backend API
//! - `SHOPDESK_API_TOKEN` - Bearer token for the backend API

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about = "Shopdesk order-admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List {
        /// Restrict to one customer
        #[arg(short, long)]
        customer: Option<i64>,
    },
    /// Compose and create a new order
    Create {
        /// Customer the order belongs to
        #[arg(short, long)]
        customer: i64,

        /// Line as `<product-id>[:<quantity>]`; repeatable
        #[arg(short, long = "line", required = true)]
        lines: Vec<String>,

        /// Payment method label
        #[arg(short, long, default_value = "card")]
        payment: String,
    },
    /// Change an order's status
    SetStatus {
        /// Order to update
        order: i64,

        /// New status (pending, in_progress, prepared, shipped, cancelled)
        status: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog items with their effective prices
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Orders { action } => match action {
            OrdersAction::List { customer } => commands::orders::list(customer).await?,
            OrdersAction::Create {
                customer,
                lines,
                payment,
            } => commands::orders::create(customer, &lines, payment).await?,
            OrdersAction::SetStatus { order, status } => {
                commands::orders::set_status(order, &status).await?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list().await?,
        },
    }
    Ok(())
}
