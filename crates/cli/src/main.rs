//! Jozoor CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run all database migrations
//! jozoor migrate
//!
//! # Run only the admin (catalog) or storefront migrations
//! jozoor migrate admin
//! jozoor migrate storefront
//!
//! # Create admin user
//! jozoor admin create -u amina -n "أمينة" -p 'a long passphrase'
//!
//! # Load a product catalog
//! jozoor seed products seed/products.yaml --clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin users
//! - `seed products` - Insert products from a YAML catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jozoor")]
#[command(author, version, about = "Jozoor store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        /// Which side to migrate (defaults to all)
        #[command(subcommand)]
        target: Option<MigrateTarget>,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Catalog and admin tables, admin session table
    Admin,
    /// Storefront session table
    Storefront,
    /// Everything
    All,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML catalog
    Products {
        /// Path to the YAML file
        file: String,

        /// Delete all existing products first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target.unwrap_or(MigrateTarget::All) {
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::All => {
                commands::migrate::admin().await?;
                commands::migrate::storefront().await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                name,
                password,
            } => {
                commands::admin::create_user(&username, &name, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file, clear } => {
                commands::seed::products(&file, clear).await?;
            }
        },
    }
    Ok(())
}
