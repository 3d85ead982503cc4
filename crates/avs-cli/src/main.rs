mod report;
mod tables;

use std::path::{Path, PathBuf};

use anyhow::Context;
use avs_core::{AppConfig, Assistant, Category, Mention};
use avs_engine::AnalyticsEngine;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "avs-cli")]
#[command(about = "AI visibility analytics over recorded assistant mentions")]
struct Cli {
    /// Mentions YAML file (defaults to AVS_MENTIONS_PATH, then ./config/mentions.yaml)
    #[arg(long, global = true)]
    mentions: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Visibility scores for every brand, highest first
    Scores {
        /// Show only this brand
        #[arg(long)]
        brand: Option<String>,
        /// Show only brands whose dominant category is this one
        #[arg(long)]
        category: Option<Category>,
        /// Date the scores are computed for (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Brand of the day, recurring winners and emerging brands
    Highlights {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Best-ranked brand for each category and assistant
    Matrix,
    /// Tracked share of voice within a category
    Sov {
        #[arg(long)]
        category: Category,
        /// Restrict to one assistant (ChatGPT, Gemini, Perplexity)
        #[arg(long)]
        assistant: Option<Assistant>,
    },
    /// Markdown gap report: why BRAND_B is beating (or trailing) BRAND_A
    Gap {
        brand_a: String,
        brand_b: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Markdown narrative for one brand in one category
    Narrative {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Markdown visibility audit with competitor gap and recommendations
    Audit {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List the query-intent catalog and category weights
    Catalog {
        #[arg(long)]
        category: Option<Category>,
    },
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Load the mentions file and build an in-memory engine from `config`.
fn open(config: &AppConfig, path: &Path) -> anyhow::Result<(AnalyticsEngine, Vec<Mention>)> {
    let file = avs_core::load_mentions(path)
        .with_context(|| format!("loading mentions from {}", path.display()))?;
    tracing::debug!(count = file.mentions.len(), path = %path.display(), "mentions loaded");
    let engine = AnalyticsEngine::from_config(config)?;
    Ok((engine, file.mentions))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = avs_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("avs-cli ready; run `avs-cli --help` for commands");
        return Ok(());
    };

    let path = cli.mentions.unwrap_or_else(|| config.mentions_path.clone());

    match command {
        Commands::Scores {
            brand,
            category,
            as_of,
        } => {
            let (engine, mentions) = open(&config, &path)?;
            tables::run_scores(
                &engine,
                &mentions,
                brand.as_deref(),
                category,
                as_of.unwrap_or_else(today),
            )
            .await?;
        }
        Commands::Highlights { as_of } => {
            let (engine, mentions) = open(&config, &path)?;
            let as_of = as_of.unwrap_or_else(today);
            let highlights = engine.highlights(&mentions, as_of).await?;
            print!("{}", tables::render_highlights(&highlights, as_of));
        }
        Commands::Matrix => {
            let (engine, mentions) = open(&config, &path)?;
            print!("{}", tables::render_matrix(&engine.prompt_matrix(&mentions)));
        }
        Commands::Sov {
            category,
            assistant,
        } => {
            let (engine, mentions) = open(&config, &path)?;
            let entries = engine.compute_share_of_voice(&mentions, category, assistant);
            print!("{}", tables::render_sov(category, assistant, &entries));
        }
        Commands::Gap {
            brand_a,
            brand_b,
            as_of,
        } => {
            let (engine, mentions) = open(&config, &path)?;
            let gap = engine
                .compute_gap(&brand_a, &brand_b, &mentions, as_of.unwrap_or_else(today))
                .await?;
            print!("{}", report::render_gap(&gap));
        }
        Commands::Narrative {
            brand,
            category,
            as_of,
        } => {
            let (engine, mentions) = open(&config, &path)?;
            let narrative = engine
                .compute_narrative(&brand, category, &mentions, as_of.unwrap_or_else(today))
                .await?;
            print!("{}", report::render_narrative(&narrative));
        }
        Commands::Audit {
            brand,
            category,
            as_of,
        } => {
            let (engine, mentions) = open(&config, &path)?;
            let report = engine
                .compute_audit(&brand, category, &mentions, as_of.unwrap_or_else(today))
                .await?;
            print!("{}", report::render_audit(&report));
        }
        Commands::Catalog { category } => print!("{}", tables::render_catalog(category)),
    }

    Ok(())
}
