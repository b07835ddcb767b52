/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use keyserver_lib::lookup::LookupService;
use keyserver_lib::types::KeySummary;
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

use crate::async_helper::blocking;
use crate::error::ErrorResponse;
use crate::responses::ArmoredKey;

#[derive(Debug, Serialize)]
pub struct KeyList {
    keys: Vec<KeySummary>,
}

#[get("/keys")]
#[tracing::instrument(skip(service))]
pub async fn list_keys(service: &State<LookupService>) -> Result<Json<KeyList>, ErrorResponse> {
    let service = service.inner().clone();
    let keys = blocking(move || service.list_summaries()).await?;
    Ok(Json(KeyList { keys }))
}

#[get("/keys/<email>")]
#[tracing::instrument(skip(service))]
pub async fn key_by_email(email: String, service: &State<LookupService>) -> Result<ArmoredKey, ErrorResponse> {
    let service = service.inner().clone();
    let download = blocking(move || service.get_by_email(&email)).await??;
    Ok(download.into())
}
