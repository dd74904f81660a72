//! Recipe Box CLI - database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema and create the session table
//! recipe-cli migrate
//!
//! # Create a user without going through the signup form
//! recipe-cli user create -n "Ada" -e ada@example.com -p pancakes
//! ```
//!
//! Both commands read `RECIPES_DATABASE_URL` (a `.env` file is honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "recipe-cli")]
#[command(author, version, about = "Recipe Box CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address, used to log in
        #[arg(short, long)]
        email: String,

        /// Plaintext password, hashed before storage
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
            } => {
                commands::user::create(&name, &email, &password).await?;
            }
        },
    }
    Ok(())
}
