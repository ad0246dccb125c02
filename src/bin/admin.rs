//! CLI administration tool for ads-reporting.
//!
//! Provides commands for managing API tokens, viewing table statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token scoped to one account
//! cargo run --bin admin -- token create --name "Acme dashboard" --account 6f1c...
//!
//! # Issue an admin token (sees every account)
//! cargo run --bin admin -- token create --name "Ops" --account 6f1c... --admin
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Acme dashboard"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use ads_reporting::application::services::hash_token;
use ads_reporting::config::mask_connection_string;
use ads_reporting::domain::repositories::{NewApiToken, TokenRepository};
use ads_reporting::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing ads-reporting.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Acme dashboard")
        #[arg(short, long)]
        name: Option<String>,

        /// Account the token acts for
        #[arg(short, long)]
        account: Option<Uuid>,

        /// Grant access to every account
        #[arg(long)]
        admin: bool,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Options for `token create`.
struct CreateTokenArgs {
    name: Option<String>,
    account: Option<Uuid>,
    admin: bool,
    token: Option<String>,
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            account,
            admin,
            token,
            yes,
        } => {
            let args = CreateTokenArgs {
                name,
                account,
                admin,
                token,
                yes,
            };
            create_token(repo, args).await?;
        }
        TokenAction::List => {
            list_tokens(repo).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(repo, name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for token name and account (or use provided)
/// 2. Generate random token or use provided value
/// 3. Display token details with warning
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash token with HMAC-SHA256 keyed by `TOKEN_SIGNING_SECRET`
/// 6. Store in database
///
/// # Security
///
/// - Only the HMAC is stored in the database
/// - Raw token is displayed once and cannot be retrieved later
/// - Tokens are 48 characters (alphanumeric) for high entropy
async fn create_token(repo: Arc<PgTokenRepository>, args: CreateTokenArgs) -> Result<()> {
    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
    if signing_secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let token_name = match args.name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Reporting API")
            .interact_text()?,
    };

    let account_id = match args.account {
        Some(id) => id,
        None => {
            let raw: String = Input::new().with_prompt("Account ID (UUID)").interact_text()?;
            Uuid::parse_str(raw.trim()).context("Account ID must be a UUID")?
        }
    };

    let token_value = match args.token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token();
            println!("{}", "Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:    {}", token_name.cyan());
    println!("  Account: {}", account_id.to_string().cyan());
    println!(
        "  Scope:   {}",
        if args.admin {
            "all accounts (admin)".red().bold()
        } else {
            "own account".green()
        }
    );
    println!("  Token:   {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let new_token = NewApiToken {
        name: token_name,
        token_hash: hash_token(&signing_secret, &token_value),
        account_id,
        is_admin: args.admin,
    };

    repo.create_token(new_token)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "Token created successfully!".green().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token_value.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/aggregate/dimensions",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
///
/// # Output Format
///
/// ```text
/// API Tokens
///
///   ID  Name                      Account                               Admin  Created           Status
///   1   Acme dashboard            6f1c0d2e-...                          no     2024-01-15 10:30  ACTIVE
/// ```
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<25} {:<37} {:<6} {:<17} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Account".bright_white().bold(),
        "Admin".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(104).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let admin = if token.is_admin {
            "yes".red()
        } else {
            "no".normal()
        };

        println!(
            "  {:<4} {:<25} {:<37} {:<6} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.account_id.to_string(),
            admin,
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// # Lookup
///
/// - If input is numeric, lookup by ID
/// - Otherwise, lookup by name (exact match)
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token:   {}", token.name.cyan());
    println!("  ID:      {}", token.id.to_string().bright_black());
    println!("  Account: {}", token.account_id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays metrics table and token statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let (rows, accounts, first_day, last_day): (
        i64,
        i64,
        Option<chrono::NaiveDate>,
        Option<chrono::NaiveDate>,
    ) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(DISTINCT account_id), MIN(day), MAX(day) FROM ads_metrics",
    )
    .fetch_one(pool)
    .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    let range = match (first_day, last_day) {
        (Some(first), Some(last)) => format!("{first} .. {last}"),
        _ => "-".to_string(),
    };

    println!("  Metric rows:   {}", rows.to_string().bright_green().bold());
    println!(
        "  Accounts:      {}",
        accounts.to_string().bright_green().bold()
    );
    println!("  Date range:    {}", range.bright_green().bold());
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let table_size: Option<String> = sqlx::query_scalar(
                "SELECT pg_size_pretty(pg_total_relation_size(to_regclass('ads_metrics')))",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL:        {}", version.bright_white());
            println!(
                "  ads_metrics size:  {}",
                table_size
                    .unwrap_or_else(|| "not migrated".to_string())
                    .bright_white()
            );
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
