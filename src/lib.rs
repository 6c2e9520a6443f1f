#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use std::sync::Arc;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, StoreFairing};
use crate::engine::Engine;
use crate::logging::LoggerFairing;
use crate::store::Store;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod logging;
pub mod model;
pub mod store;

/// Build the server, with the store chosen by configuration.
pub fn build() -> Rocket<Build> {
    base().attach(StoreFairing)
}

/// Build the server on top of the given store.
pub fn rocket_for_store(store: Arc<dyn Store>) -> Rocket<Build> {
    base().manage(Engine::new(store))
}

fn base() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
}
