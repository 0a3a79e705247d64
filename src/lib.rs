//! Agora — community knowledge graph core
//!
//! Typed content nodes (words, definitions, statements, open questions,
//! answers, categories) earn acceptance through two independent community
//! votes before unlocking further capabilities. The crate provides:
//! - a dual-phase vote ledger with threshold-gated eligibility
//! - a polymorphic content contract implemented once and specialized per type
//! - keyword tag propagation building a weighted similarity graph
//! - Neo4j-backed storage behind a mockable `GraphStore` trait
//!
//! The HTTP layer, keyword extraction, dictionary lookup, discussions, and
//! auth are external collaborators; see `collaborators` for the interfaces
//! consumed here.

pub mod categories;
pub mod collaborators;
pub mod content;
pub mod error;
pub mod neo4j;
pub mod schemas;
pub mod tagging;
pub mod voting;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{CoreError, Result};

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "agora123".into(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to `from_yaml_and_env(None)`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with
    /// env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file
    /// doesn't exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> anyhow::Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with the graph store initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let graph = Arc::new(
            neo4j::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        Ok(Self {
            graph,
            config: Arc::new(config),
        })
    }

    /// Build the content services over this state's store handle.
    pub fn services(
        &self,
        extractor: Arc<dyn collaborators::KeywordExtractor>,
        dictionary: Option<Arc<dyn collaborators::DictionaryClient>>,
    ) -> schemas::ContentServices {
        schemas::ContentServices::new(self.graph.clone(), extractor, dictionary)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
neo4j:
  uri: bolt://db:7687
  user: admin
  password: secret
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.neo4j.user, "admin");
        assert_eq!(config.neo4j.password, "secret");
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
    }

    /// Combined test for YAML file loading, env var overrides, and the
    /// defaults fallback. Runs as a single test to avoid parallel env var
    /// race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &["NEO4J_URI", "NEO4J_USER", "NEO4J_PASSWORD"] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
neo4j:
  uri: bolt://yaml-host:7687
  user: yaml-user
  password: yaml-pass
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://yaml-host:7687");
        assert_eq!(config.neo4j_user, "yaml-user");
        assert_eq!(config.neo4j_password, "yaml-pass");

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("NEO4J_URI", "bolt://env-host:7687");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://env-host:7687");
        // YAML value still used where no env override
        assert_eq!(config.neo4j_user, "yaml-user");

        clear_env();

        // --- Phase 3: No YAML file → defaults ---
        let nonexistent = Path::new("/tmp/nonexistent-agora-config.yaml");
        let config = Config::from_yaml_and_env(Some(nonexistent)).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j_user, "neo4j");
    }
}
