use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppEnv;

const DEFAULT_FILTER: &str = "nannyhub=info,tower_http=info";

/// Installs the global subscriber: bunyan JSON in production, human-readable
/// lines otherwise. `RUST_LOG` overrides the default filter.
pub fn init_tracing(app_env: AppEnv) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match app_env {
        AppEnv::Production => {
            Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new("nannyhub".into(), std::io::stdout))
                .init();
        }
        AppEnv::Development => {
            Registry::default()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
