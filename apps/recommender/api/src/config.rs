use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_recommendations::{EmbeddingConfig, GeminiConfig, RecommenderOptions, StoreConfig};

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library and the
/// recommendations domain
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub options: RecommenderOptions,
    /// Present only when preprocessing is enabled
    pub gemini: Option<GeminiConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let store = StoreConfig::from_env()?;
        let embedding = EmbeddingConfig::from_env()?;
        let options = RecommenderOptions::from_env()?;

        // GEMINI_API_KEY is only required when something will use it
        let gemini = if options.enable_preprocessing {
            Some(GeminiConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            store,
            embedding,
            options,
            gemini,
        })
    }
}
