pub mod app_config;
pub mod config;
pub mod records;
pub mod request;
pub mod site;

pub use app_config::{AppConfig, BrowserSettings, DataSource, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{
    product_id, CandidateRecord, ItemRecord, PipelineResult, ResultEntry, RestaurantsEnvelope,
};
pub use request::{SearchParams, SearchRequest};
pub use site::{load_site_profile, resolve_site_profile, SiteProfile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site profile {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profile: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("site profile validation failed: {0}")]
    Validation(String),
}
