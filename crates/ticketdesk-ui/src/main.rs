//! `ticketdesk` support ticket console
//!
//! Submit, triage and chart support tickets served by a remote ticketing API,
//! either interactively or with one-shot subcommands.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use ticketdesk_client::{ApiClient, TicketApi};
use ticketdesk_core::{
    Config, TicketCategory, TicketCreatePayload, TicketFilters, TicketId, TicketPriority,
    TicketStatus, TicketUpdatePayload,
};
use ticketdesk_ui::render::{
    Theme, format_card, format_classification, format_recent, format_stats,
};
use ticketdesk_ui::{Page, console, form::REQUIRED_FIELDS_ERROR};
use tokio::io::BufReader;
use tracing::{info, warn};

/// Command line interface for the ticketdesk console
#[derive(Parser)]
#[command(
    name = "ticketdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Support ticket console backed by a remote ticketing API",
    long_about = "Submit tickets with AI-suggested category and priority, search and triage them, and chart ticket statistics, all from the terminal."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long)]
    log_format: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Ticketing API base URL (overrides api.base_url)
    #[arg(long, env = "TICKETDESK_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Commands that talk to the ticketing API
    #[command(flatten)]
    Api(ApiCommand),

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration values
        #[arg(short, long)]
        validate: bool,
    },
}

/// Subcommands served through the API client
#[derive(Subcommand)]
enum ApiCommand {
    /// Interactive console (default)
    Console,

    /// List tickets
    List(ListArgs),

    /// Create a ticket
    Create(CreateArgs),

    /// Change a ticket's status
    SetStatus {
        /// Ticket id
        #[arg(value_name = "ID")]
        id: TicketId,

        /// New status (open, in_progress, resolved, closed)
        #[arg(value_name = "STATUS")]
        status: TicketStatus,
    },

    /// Ask the classifier for a category and priority
    Classify {
        /// Ticket description
        #[arg(value_name = "DESCRIPTION")]
        description: String,
    },

    /// Show ticket statistics and recent activity
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

/// Output format for one-shot commands
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rendered cards and charts
    Pretty,
    /// Raw API JSON
    Json,
}

/// Filters for `list`
#[derive(Args)]
struct ListArgs {
    /// Only this category
    #[arg(long)]
    category: Option<TicketCategory>,

    /// Only this priority
    #[arg(long)]
    priority: Option<TicketPriority>,

    /// Only this status
    #[arg(long)]
    status: Option<TicketStatus>,

    /// Search title and description
    #[arg(short, long)]
    search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

/// Fields for `create`
#[derive(Args)]
struct CreateArgs {
    /// Short summary (up to 200 characters)
    #[arg(short, long)]
    title: String,

    /// Full problem description
    #[arg(short, long)]
    description: String,

    /// Category (default general)
    #[arg(long, conflicts_with = "classify")]
    category: Option<TicketCategory>,

    /// Priority (default medium)
    #[arg(long, conflicts_with = "classify")]
    priority: Option<TicketPriority>,

    /// Let the classifier pick category and priority
    #[arg(long)]
    classify: bool,
}

/// Main entry point for the ticketdesk console
///
/// # Errors
///
/// Returns error if configuration is invalid or an API call fails
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli)?;
    ticketdesk_core::init_logging(&config.logging).context("failed to initialize logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "ticketdesk starting"
    );

    let theme = Theme {
        color: config.ui.color,
    };

    match cli.command.unwrap_or(Commands::Api(ApiCommand::Console)) {
        Commands::Config { show, validate } => handle_config_command(&config, show, validate),
        Commands::Api(command) => {
            config.validate().context("invalid configuration")?;
            let api: Arc<dyn TicketApi> = Arc::new(
                ApiClient::from_config(&config.api).context("failed to build API client")?,
            );
            run_command(command, api, &config, theme).await
        }
    }
}

/// Load configuration and apply command line overrides
///
/// # Errors
///
/// Returns error if the configuration file cannot be read or parsed
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_from(cli.config.as_deref()).with_context(|| {
        cli.config.as_ref().map_or_else(
            || "failed to load configuration".to_string(),
            |path| format!("failed to load configuration from {}", path.display()),
        )
    })?;

    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(format) = &cli.log_format {
        config.logging.format.clone_from(format);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    if cli.no_color {
        config.ui.color = false;
    }

    Ok(config)
}

async fn run_command(
    command: ApiCommand,
    api: Arc<dyn TicketApi>,
    config: &Config,
    theme: Theme,
) -> Result<()> {
    match command {
        ApiCommand::Console => run_console(api, config, theme).await,
        ApiCommand::List(args) => list_tickets(api.as_ref(), &args, theme).await,
        ApiCommand::Create(args) => create_ticket(api.as_ref(), &args, theme).await,
        ApiCommand::SetStatus { id, status } => {
            let ticket = api
                .update_ticket(id, &TicketUpdatePayload::status(status))
                .await
                .with_context(|| format!("failed to update ticket #{id}"))?;
            println!("{}", format_card(&ticket, false, theme, Utc::now()));
            Ok(())
        }
        ApiCommand::Classify { description } => {
            let suggestion = api
                .classify_ticket(&description)
                .await
                .context("classification failed")?;
            println!("{}", format_classification(&suggestion, theme));
            Ok(())
        }
        ApiCommand::Stats { format } => show_stats(api.as_ref(), config, format, theme).await,
    }
}

/// Run the interactive console on stdin/stdout
///
/// # Errors
///
/// Returns error if the terminal cannot be read or written
async fn run_console(api: Arc<dyn TicketApi>, config: &Config, theme: Theme) -> Result<()> {
    let mut page = Page::new(api, &config.ui);
    let mut stdout = tokio::io::stdout();

    console::run(
        &mut page,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        theme,
    )
    .await
    .context("console I/O failed")?;

    info!("console closed");
    Ok(())
}

async fn list_tickets(api: &dyn TicketApi, args: &ListArgs, theme: Theme) -> Result<()> {
    let filters = TicketFilters {
        category: args.category,
        priority: args.priority,
        status: args.status,
        search: None,
    }
    .with_search(args.search.as_deref().unwrap_or_default());

    let tickets = api
        .fetch_tickets(&filters)
        .await
        .context("failed to fetch tickets")?;

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
        return Ok(());
    }

    let now = Utc::now();
    println!(
        "{} ticket{}",
        tickets.len(),
        if tickets.len() == 1 { "" } else { "s" }
    );
    for ticket in &tickets {
        println!("\n{}", format_card(ticket, false, theme, now));
    }
    Ok(())
}

async fn create_ticket(api: &dyn TicketApi, args: &CreateArgs, theme: Theme) -> Result<()> {
    let title = args.title.trim();
    let description = args.description.trim();
    if title.is_empty() || description.is_empty() {
        bail!(REQUIRED_FIELDS_ERROR);
    }

    let mut category = args.category.unwrap_or_default();
    let mut priority = args.priority.unwrap_or_default();

    if args.classify {
        match api.classify_ticket(description).await {
            Ok(suggestion) => {
                category = suggestion.suggested_category;
                priority = suggestion.suggested_priority;
            }
            Err(e) => warn!(error = %e, "classification failed, using defaults"),
        }
    }

    let ticket = api
        .create_ticket(&TicketCreatePayload::new(
            title,
            description,
            category,
            priority,
        ))
        .await
        .context("failed to create ticket")?;

    println!("{}", format_card(&ticket, false, theme, Utc::now()));
    Ok(())
}

async fn show_stats(
    api: &dyn TicketApi,
    config: &Config,
    format: OutputFormat,
    theme: Theme,
) -> Result<()> {
    let all = TicketFilters::default();
    let (stats, tickets) = tokio::join!(api.fetch_stats(), api.fetch_tickets(&all));
    let stats = stats.context("failed to fetch statistics")?;
    let tickets = tickets.context("failed to fetch recent tickets")?;

    let recent: Vec<_> = tickets
        .into_iter()
        .take(config.ui.recent_activity_limit)
        .collect();

    if format == OutputFormat::Json {
        let body = serde_json::json!({ "stats": stats, "recent": recent });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", format_stats(&stats, theme));
    println!();
    println!("{}", format_recent(&recent, theme, Utc::now()));
    Ok(())
}

/// Show configuration as TOML
///
/// # Errors
///
/// Returns error if configuration cannot be serialized
fn show_config(config: &Config) -> Result<()> {
    let config_toml =
        toml::to_string_pretty(config).context("failed to serialize configuration")?;
    println!("{config_toml}");
    Ok(())
}

/// Handle configuration commands
///
/// # Errors
///
/// Returns error if validation fails or configuration cannot be serialized
fn handle_config_command(config: &Config, show: bool, validate: bool) -> Result<()> {
    if validate {
        config.validate().context("invalid configuration")?;
        println!("Configuration is valid");
    }

    if show || !validate {
        show_config(config)?;
    }

    Ok(())
}
