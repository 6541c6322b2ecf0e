use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_stats::api::{build_router, state::AppState};
use league_stats::calculate::{derive_from_form, FormCount};
use league_stats::config::AppConfig;
use league_stats::models::{GameId, StatCategory};
use league_stats::schedule;

#[derive(Parser)]
#[command(name = "league-stats")]
#[command(about = "Box scores and game leaders for a recreational basketball league")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a week's games with their leaders
    Week {
        /// Week to show, the current week by default
        #[arg(long)]
        week: Option<u32>,

        /// Season to show, the current season by default
        #[arg(long)]
        season: Option<u32>,
    },

    /// Print the leaders of one game
    Leaders {
        /// Game ID
        #[arg(long)]
        game: String,
    },

    /// Compute field goals made and points from made shots
    Derive {
        /// Two-point field goals made
        #[arg(long)]
        two: Option<String>,

        /// Three-point field goals made
        #[arg(long)]
        three: Option<String>,

        /// Free throws made
        #[arg(long)]
        ft: Option<String>,
    },

    /// Print the current league settings
    Settings,
}

fn init_tracing(level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level).to_string();
    init_tracing(&level, cli.json_logs);

    tracing::debug!("Starting league-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            if !config.admin.enabled() {
                tracing::warn!("No admin token configured, admin routes are disabled");
            }

            let state = AppState::from_config(&config);
            let app = build_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(
                "Serving league data from {} on http://{}",
                config.data_dir.display(),
                addr
            );
            axum::serve(listener, app).await?;
        }
        Commands::Week { week, season } => {
            let state = AppState::from_config(&config);
            let settings = state.settings()?;
            let season = season.unwrap_or(settings.current_season);
            let week = week.unwrap_or(settings.current_week);

            println!("{}", settings.league_name);
            println!("Season {} • {}", season, settings.week_label(week));
            let cards = schedule::week_games(&state.store, season, week)?;
            if cards.is_empty() {
                println!("No games scheduled.");
            }
            for card in cards {
                println!();
                println!(
                    "{}  {} {} - {} {}  [{}]",
                    card.date_label,
                    card.team1.name,
                    card.team1.score,
                    card.team2.score,
                    card.team2.name,
                    card.status
                );
                for category in StatCategory::ALL {
                    println!(
                        "  {:<9} {}",
                        category.label(),
                        card.leaders.get(category).display(category)
                    );
                }
            }
        }
        Commands::Leaders { game } => {
            let state = AppState::from_config(&config);
            let card = schedule::game_card(&state.store, &GameId::new(game))?;
            println!(
                "{} vs {} ({})",
                card.team1.name, card.team2.name, card.date_label
            );
            for category in StatCategory::ALL {
                println!(
                    "{:<9} {}",
                    category.label(),
                    card.leaders.get(category).display(category)
                );
            }
        }
        Commands::Derive { two, three, ft } => {
            let derived = derive_from_form(
                FormCount::parse(two.as_deref()),
                FormCount::parse(three.as_deref()),
                FormCount::parse(ft.as_deref()),
            );
            println!("{}", serde_json::to_string_pretty(&derived)?);
        }
        Commands::Settings => {
            let state = AppState::from_config(&config);
            let settings = state.settings()?;
            println!("{}", settings.league_name);
            println!("{}", settings.season_banner());
        }
    }

    Ok(())
}
