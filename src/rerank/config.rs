//! Reranker configuration and loader.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::lambda::LambdaReranker;
use super::mmr::{AspectJaccardDistance, Mmr};
use super::permutation::PermutationReranker;
use super::xquad::XQuad;
use crate::intent::{IntentModel, RelevanceAspectModel, ScoresAspectModel};

/// Which aspect-coverage curve xQuAD uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectModelKind {
    /// Exponential curve relative to the best candidate per aspect.
    #[default]
    Relevance,
    /// Share of the aspect's total candidate score.
    Scores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    Xquad {
        #[serde(default)]
        aspect_model: AspectModelKind,
    },
    Mmr,
}

impl Default for StrategySpec {
    fn default() -> Self {
        StrategySpec::Xquad {
            aspect_model: AspectModelKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankerConfig {
    /// Relevance/novelty tradeoff. 0 keeps the input order.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Maximum output length per user.
    #[serde(default = "default_cutoff")]
    pub cutoff: usize,
    /// z-score relevance and novelty before combining.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    #[serde(default)]
    pub strategy: StrategySpec,
}

fn default_lambda() -> f64 {
    0.5
}

fn default_cutoff() -> usize {
    10
}

fn default_normalize() -> bool {
    true
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            cutoff: default_cutoff(),
            normalize: default_normalize(),
            strategy: StrategySpec::default(),
        }
    }
}

impl fmt::Display for RerankerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match &self.strategy {
            StrategySpec::Xquad { aspect_model } => format!("xquad/{aspect_model:?}"),
            StrategySpec::Mmr => "mmr".to_string(),
        };
        write!(
            f,
            "RerankerConfig(strategy={}, lambda={}, cutoff={}, normalize={})",
            strategy.to_lowercase(),
            self.lambda,
            self.cutoff,
            self.normalize
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read reranker config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse reranker config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid reranker config: {0}")]
    Invalid(String),
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<RerankerConfig, ConfigError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: RerankerConfig = serde_json::from_str(&raw)?;
    validate_config(&config)?;
    Ok(config)
}

/// Lambda outside `[0, 1]` is allowed; only non-finite values are rejected.
pub fn validate_config(config: &RerankerConfig) -> Result<(), ConfigError> {
    if !config.lambda.is_finite() {
        return Err(ConfigError::Invalid(format!(
            "lambda must be finite, got {}",
            config.lambda
        )));
    }
    Ok(())
}

/// Build the reranker a config describes over a shared intent model.
pub fn reranker_from_config<U, I, M>(
    config: &RerankerConfig,
    intents: Arc<M>,
) -> Result<Arc<dyn PermutationReranker<U, I> + Send + Sync>, ConfigError>
where
    U: Clone + 'static,
    I: 'static,
    M: IntentModel<U, I> + Send + Sync + 'static,
{
    validate_config(config)?;
    let RerankerConfig {
        lambda,
        cutoff,
        normalize,
        ..
    } = *config;
    let reranker: Arc<dyn PermutationReranker<U, I> + Send + Sync> = match config.strategy {
        StrategySpec::Xquad {
            aspect_model: AspectModelKind::Relevance,
        } => Arc::new(LambdaReranker::new(
            XQuad::new(RelevanceAspectModel::new(intents)),
            lambda,
            cutoff,
            normalize,
        )),
        StrategySpec::Xquad {
            aspect_model: AspectModelKind::Scores,
        } => Arc::new(LambdaReranker::new(
            XQuad::new(ScoresAspectModel::new(intents)),
            lambda,
            cutoff,
            normalize,
        )),
        StrategySpec::Mmr => Arc::new(LambdaReranker::new(
            Mmr::new(Arc::new(AspectJaccardDistance::<M, U>::new(intents))),
            lambda,
            cutoff,
            normalize,
        )),
    };
    Ok(reranker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: RerankerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RerankerConfig::default());
        assert_eq!(
            config.to_string(),
            "RerankerConfig(strategy=xquad/relevance, lambda=0.5, cutoff=10, normalize=true)"
        );
    }

    #[test]
    fn parses_tagged_strategy() {
        let config: RerankerConfig = serde_json::from_str(
            r#"{"lambda": 0.8, "cutoff": 5, "strategy": {"type": "xquad", "aspect_model": "scores"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.strategy,
            StrategySpec::Xquad {
                aspect_model: AspectModelKind::Scores
            }
        );
        assert!(config.normalize);

        let config: RerankerConfig =
            serde_json::from_str(r#"{"strategy": {"type": "mmr"}, "normalize": false}"#).unwrap();
        assert_eq!(config.strategy, StrategySpec::Mmr);
        assert!(!config.normalize);
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!(serde_json::from_str::<RerankerConfig>(r#"{"strategy": {"type": "pm2"}}"#).is_err());
    }

    #[test]
    fn validate_allows_out_of_range_lambda_but_not_nan() {
        let config = RerankerConfig {
            lambda: 1.5,
            ..RerankerConfig::default()
        };
        validate_config(&config).unwrap();

        let config = RerankerConfig {
            lambda: f64::NAN,
            ..RerankerConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
