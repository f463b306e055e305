#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use diversity_harness::data::{load_intent_model, read_recommendations, write_recommendations};
use diversity_harness::rerank::{
    load_config_from_path, rerank_batch, reranker_from_config, validate_config, AspectModelKind,
    RerankerConfig, StrategySpec,
};

#[derive(Parser)]
#[command(name = "diversify", version, about = "Aspect-aware diversification of recommendation lists")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rerank a JSONL file of recommendations
    Rerank {
        /// Input recommendations, one JSON object per line
        #[arg(long)]
        recommendations: PathBuf,
        /// Intent model JSON (item aspects, optional user distributions)
        #[arg(long)]
        intents: PathBuf,
        /// Output JSONL path
        #[arg(long)]
        out: PathBuf,
        /// Reranker config JSON; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        lambda: Option<f64>,
        /// Maximum output length per user (negative values mean 0)
        #[arg(long, allow_negative_numbers = true)]
        cutoff: Option<i64>,
        #[arg(long)]
        normalize: Option<bool>,
        #[arg(long, value_enum)]
        strategy: Option<CliStrategy>,
        #[arg(long, value_enum)]
        aspect_model: Option<CliAspectModel>,
    },
    /// Load, validate and print a reranker config
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CliStrategy {
    Xquad,
    Mmr,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliAspectModel {
    Relevance,
    Scores,
}

impl From<CliAspectModel> for AspectModelKind {
    fn from(value: CliAspectModel) -> Self {
        match value {
            CliAspectModel::Relevance => AspectModelKind::Relevance,
            CliAspectModel::Scores => AspectModelKind::Scores,
        }
    }
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging(json_output: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt_layer = match json_output {
        true => fmt_layer.json().flatten_event(true).boxed(),
        false => fmt_layer.boxed(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<RerankerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(RerankerConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Rerank {
            recommendations,
            intents,
            out,
            config,
            lambda,
            cutoff,
            normalize,
            strategy,
            aspect_model,
        } => {
            let mut config = load_config(config)?;
            if let Some(v) = lambda {
                config.lambda = v;
            }
            if let Some(v) = cutoff {
                config.cutoff = usize::try_from(v).unwrap_or(0);
            }
            if let Some(v) = normalize {
                config.normalize = v;
            }
            match (strategy, aspect_model) {
                (Some(CliStrategy::Mmr), _) => config.strategy = StrategySpec::Mmr,
                (Some(CliStrategy::Xquad), kind) => {
                    config.strategy = StrategySpec::Xquad {
                        aspect_model: kind.map(Into::into).unwrap_or_default(),
                    }
                }
                (None, Some(kind)) => {
                    if let StrategySpec::Xquad { aspect_model } = &mut config.strategy {
                        *aspect_model = kind.into();
                    } else {
                        return Err("--aspect-model only applies to the xquad strategy".into());
                    }
                }
                (None, None) => {}
            }
            validate_config(&config)?;
            info!(%config, "reranking");

            let intent_model = Arc::new(load_intent_model(&intents)?);
            info!(
                items = intent_model.item_count(),
                users = intent_model.user_count(),
                "loaded intent model"
            );
            let recs = read_recommendations(&recommendations)?;
            let reranker = reranker_from_config::<String, String, _>(&config, intent_model)?;

            let outcome = rerank_batch(&*reranker, &recs);
            let failed = outcome.failed();
            let mut reranked = Vec::with_capacity(outcome.succeeded());
            for (rec, result) in recs.iter().zip(outcome.results) {
                match result {
                    Ok(r) => reranked.push(r),
                    Err(err) => warn!(user = %rec.user, error = %err, "skipping user"),
                }
            }
            let written = write_recommendations(&out, &reranked)?;
            info!(written, out = %out.display(), "wrote reranked recommendations");
            if failed > 0 {
                return Err(format!("{failed} of {} users failed to rerank", recs.len()).into());
            }
        }
        Commands::Config { config } => {
            let config = load_config(config)?;
            println!("{config}");
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
