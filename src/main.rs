use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use team_assigner::assignment::{AssignmentEngine, FairnessTracker};
use team_assigner::config::Config;
use team_assigner::models::WeekContext;
use team_assigner::notifications::NotificationManager;
use team_assigner::runner::{RunOutcome, TeamAssigner};
use team_assigner::schedule::{resolve_season_week, EspnClient};

#[derive(Parser)]
#[command(
    name = "team-assigner",
    version,
    about = "Weekly NFL team draw with fair bye rotation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the config file's setting
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw this week's teams and email them to every player (default)
    Run {
        /// Week to draw for instead of the current one
        #[arg(short, long)]
        week: Option<String>,

        /// Print the assignments instead of sending them
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Seed the shuffle for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the resolved season year and week
    Week,

    /// Show the teams on bye for a week and the byes assigned before it
    Byes {
        /// Week to inspect instead of the current one
        #[arg(short, long)]
        week: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(&cli.config)?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(config = %cli.config.display(), players = config.players.len(), "team-assigner starting");

    let result = match cli.command.unwrap_or(Commands::Run {
        week: None,
        dry_run: false,
        seed: None,
    }) {
        Commands::Run {
            week,
            dry_run,
            seed,
        } => {
            tracing::info!(week = ?week, dry_run = %dry_run, seed = ?seed, "Starting run command");
            run(config, week, dry_run, seed).await
        }
        Commands::Week => {
            tracing::info!("Starting week command");
            show_week(config).await
        }
        Commands::Byes { week } => {
            tracing::info!(week = ?week, "Starting byes command");
            show_byes(config, week).await
        }
    };

    // Config failures happen before the subscriber exists; main prints those.
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "team-assigner failed");
    }
    result
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("team_assigner=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("team_assigner={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn provider(config: &Config) -> Result<EspnClient> {
    EspnClient::with_base_url(&config.app.base_url, config.request_timeout())
        .context("Failed to create ESPN client")
}

fn notifier(config: &Config) -> Result<NotificationManager> {
    let mut manager = NotificationManager::new();
    manager
        .add_email_channel(config.email.clone())
        .context("Failed to configure email channel")?;
    tracing::debug!(channels = manager.channel_count(), "Notification channels ready");
    Ok(manager)
}

/// CLI `--week` wins over the configured override
fn week_override(config: &Config, cli_week: Option<String>) -> Option<String> {
    cli_week.or_else(|| config.week_override().map(str::to_string))
}

async fn run(config: Config, week: Option<String>, dry_run: bool, seed: Option<u64>) -> Result<ExitCode> {
    let engine = match seed {
        Some(seed) => AssignmentEngine::with_seed(seed),
        None => AssignmentEngine::new(),
    };

    let mut assigner = TeamAssigner::new(
        provider(&config)?,
        notifier(&config)?,
        config.players.clone(),
        &config.app.admin_email,
    )
    .with_week_override(week_override(&config, week))
    .with_engine(engine)
    .with_dry_run(dry_run);

    let outcome = assigner.run(chrono::Utc::now()).await?;

    match &outcome {
        RunOutcome::Delivered { ctx, statuses, .. } => {
            for status in statuses {
                tracing::info!("{status}");
            }
            println!("Week {} assignments sent to {} players", ctx.week, config.players.len());
        }
        RunOutcome::DryRun { ctx, result } => {
            println!("Week: {}\n", ctx.week);
            print!("{result}");
        }
        RunOutcome::Skipped(reason) => {
            println!("{reason}");
        }
        RunOutcome::Failed {
            error,
            admin_notified,
        } => {
            eprintln!("Run failed: {error}");
            if !admin_notified {
                eprintln!("The administrator was not notified.");
            }
        }
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn show_week(config: Config) -> Result<ExitCode> {
    let client = provider(&config)?;
    let ctx = resolve_season_week(&client, chrono::Utc::now(), config.week_override()).await?;

    println!("{ctx}");
    if !ctx.is_regular_season() {
        println!("Not in a regular season week.");
    }
    Ok(ExitCode::SUCCESS)
}

async fn show_byes(config: Config, week: Option<String>) -> Result<ExitCode> {
    let client = provider(&config)?;
    let week = week_override(&config, week);
    let ctx: WeekContext = resolve_season_week(&client, chrono::Utc::now(), week.as_deref()).await?;

    let mut tracker = FairnessTracker::new(&client);
    let byes = tracker.bye_teams(ctx).await?;
    let debt = tracker.bye_debt_to_date(ctx).await?;

    println!("{ctx}");
    if byes.is_empty() {
        println!("No teams on bye");
    }
    for team in &byes {
        println!("Bye Team: {team}");
    }
    println!("Bye Team Count To Date: {debt}");
    Ok(ExitCode::SUCCESS)
}
