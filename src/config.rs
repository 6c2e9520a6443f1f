use std::sync::Arc;

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::engine::Engine;
use crate::store::{MemoryStore, MongoStore, Store};

/// Header carrying the caller's identity when none is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "X-User-Id";

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_identity_header")]
    identity_header: String,
}

fn default_identity_header() -> String {
    DEFAULT_IDENTITY_HEADER.to_string()
}

impl Config {
    /// The request header in which a trusted upstream asserts who the caller is.
    pub fn identity_header(&self) -> &str {
        &self.identity_header
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
        }
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Reading caller identity from header '{}'", config.identity_header());

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the backing store.
#[derive(Deserialize)]
struct StoreConfig {
    // secrets
    #[serde(default)]
    db_uri: Option<String>,
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "ballotbox".to_string()
}

/// A fairing that loads the store config, connects to the database if one is
/// configured, and places the resulting [`Engine`] into managed state.
///
/// Without a `db_uri` the engine runs on a volatile in-memory store.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store: Arc<dyn Store> = match config.db_uri {
            Some(uri) => {
                info!("Loaded database config, connecting...");
                match MongoStore::connect(&uri, &config.db_name).await {
                    Ok(store) => {
                        info!("...database connection online!");
                        Arc::new(store)
                    }
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                }
            }
            None => {
                warn!("No `db_uri` configured, elections will be kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        // Manage the state.
        rocket = rocket.manage(Engine::new(store));
        Ok(rocket)
    }
}
