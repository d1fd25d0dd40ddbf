//! Wicket Keeper - credential administration CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wicket_keeper::{Authenticator, FileCredentialStore, KeeperConfig};

/// Wicket Keeper - credential accounts with brute-force lockout
#[derive(Parser)]
#[command(name = "wicket-keeper")]
#[command(about = "Administer Wicket credential accounts and sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to keeper data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a new account
    Init {
        /// Account name
        #[arg(long)]
        username: String,

        /// Initial password
        #[arg(long)]
        password: String,
    },

    /// Attempt a login and print the issued session
    Login {
        /// Account name
        #[arg(long)]
        username: String,

        /// Password to verify
        #[arg(long)]
        password: String,
    },

    /// Show an account's lockout state
    Status {
        /// Account name
        #[arg(long)]
        username: String,
    },

    /// Clear an account's failure counter and lock
    Unlock {
        /// Account name
        #[arg(long)]
        username: String,
    },

    /// Change an account's password
    Passwd {
        /// Account name
        #[arg(long)]
        username: String,

        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,
    },

    /// List provisioned accounts
    List,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wicket_keeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match cli.data_dir {
        Some(data_dir) => KeeperConfig::with_data_dir(data_dir),
        None => KeeperConfig::default(),
    };

    let store = FileCredentialStore::open(config.credentials_path())?;
    let auth = Authenticator::new(store, config.policy(), config.session_config());

    match cli.command {
        Commands::Init { username, password } => {
            auth.provision(&username, &password)?;
            println!("Account '{}' provisioned", username);
        }

        Commands::Login { username, password } => match auth.authenticate(&username, &password) {
            Ok(session) => {
                println!("Authenticated '{}'", username);
                println!("  session token: {}", session.token);
                println!("  expires at:    {}", session.expires_at);
            }
            Err(e) => {
                // Operator surface: show the real reason, unlike the
                // generic message an unauthenticated caller would get.
                println!("Login failed: {}", e);
            }
        },

        Commands::Status { username } => {
            let status = auth.status(&username)?;
            println!("Account '{}'", username);
            println!("  failed attempts:    {}", status.login_attempts);
            println!("  locked:             {}", status.account_locked);
            println!("  attempts remaining: {}", status.attempts_remaining);
            match status.last_login {
                Some(at) => println!("  last login:         {}", at),
                None => println!("  last login:         never"),
            }
            println!("  provisioned at:     {}", status.created_at);
        }

        Commands::Unlock { username } => {
            auth.unlock(&username)?;
            println!("Account '{}' unlocked", username);
        }

        Commands::Passwd {
            username,
            current,
            new,
        } => {
            auth.change_password(&username, &current, &new)?;
            println!("Password changed for '{}'", username);
        }

        Commands::List => {
            let accounts = auth.list_accounts()?;
            if accounts.is_empty() {
                println!("No accounts provisioned");
            } else {
                for name in accounts {
                    println!("{}", name);
                }
            }
        }
    }

    Ok(())
}
