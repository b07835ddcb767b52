/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use keyserver_lib::hkp::SERVER_BANNER;
use keyserver_lib::lookup::{LookupQuery, LookupRequest, LookupService};
use rocket::State;

use crate::async_helper::blocking;
use crate::error::ErrorResponse;
use crate::responses::{ArmoredKey, LookupReply};

#[get("/")]
pub fn banner() -> &'static str {
    SERVER_BANNER
}

#[get("/pks/lookup?<op>&<search>&<options>&<fingerprint>&<exact>")]
#[tracing::instrument(skip(service))]
pub async fn lookup(
    op: Option<String>,
    search: Option<String>,
    options: Option<String>,
    fingerprint: Option<String>,
    exact: Option<String>,
    service: &State<LookupService>,
) -> Result<LookupReply, ErrorResponse> {
    let request = LookupRequest::parse(&LookupQuery {
        op,
        search,
        options,
        fingerprint,
        exact,
    })?;
    let service = service.inner().clone();
    let response = blocking(move || service.lookup(&request)).await??;
    Ok(response.into())
}

#[get("/pks/lookup/<keyid>")]
#[tracing::instrument(skip(service))]
pub async fn lookup_by_key_id(keyid: String, service: &State<LookupService>) -> Result<ArmoredKey, ErrorResponse> {
    let service = service.inner().clone();
    let download = blocking(move || service.get_by_key_id(&keyid)).await??;
    Ok(download.into())
}
