/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

#[macro_use]
extern crate rocket;

use keyserver_lib::config::KeyserverConfig;
use keyserver_lib::lookup::LookupService;
use rocket::fairing::AdHoc;
use rocket::figment::providers::Env;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod async_helper;
mod error;
mod keys_endpoint;
mod lookup_endpoint;
mod responses;

const CONFIG_KEY: &str = "keyserver";

const LOG_LEVEL: &str = "LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "info";

#[launch]
//noinspection RsMainFunctionNotFound
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(LOG_LEVEL).ok()))
        .init();
    build(rocket::Config::figment())
}

/// `LOG_LEVEL` wins over `RUST_LOG`.
fn log_filter(log_level: Option<String>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level.to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    }
}

/// `HOST`, `PORT` and `KEYS_DIR` override `address`, `port` and `keyserver.keys_dir`.
fn env_overrides(figment: Figment, env: fn() -> Env) -> Figment {
    figment
        .merge(env().only(&["HOST"]).map(|_| "address".into()))
        .merge(env().only(&["PORT"]).map(|_| "port".into()))
        .merge(env().only(&["KEYS_DIR"]).map(|_| "keyserver.keys_dir".into()))
}

fn build(figment: Figment) -> Rocket<Build> {
    let figment = env_overrides(figment.join((CONFIG_KEY, KeyserverConfig::default())), Env::raw);

    rocket::custom(figment)
        .mount(
            "/",
            routes![
                lookup_endpoint::banner,
                lookup_endpoint::lookup,
                lookup_endpoint::lookup_by_key_id,
                keys_endpoint::list_keys,
                keys_endpoint::key_by_email,
            ],
        )
        .attach(AdHoc::try_on_ignite("Keyserver Config", |rocket| async move {
            match rocket.figment().extract_inner::<KeyserverConfig>(CONFIG_KEY) {
                Ok(config) => {
                    info!("Serving keys from {}", config.keys_dir.display());
                    let service = LookupService::from_config(&config);
                    Ok(rocket.manage(service))
                }
                Err(e) => {
                    error!("Keyserver config invalid: {}", e);
                    Err(rocket)
                }
            }
        }))
}
