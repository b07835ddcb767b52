/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use keyserver_lib::hkp::{KeyDownload, KeyMediaType};
use keyserver_lib::lookup::LookupResponse;
use rocket::http::{ContentType, Header};

#[derive(Responder)]
pub struct ArmoredKey {
    inner: (ContentType, String),
    disposition: Header<'static>,
    status: Header<'static>,
    key_type: Header<'static>,
}

impl From<KeyDownload> for ArmoredKey {
    fn from(download: KeyDownload) -> Self {
        let content_type = match download.media_type {
            KeyMediaType::PgpKeys => ContentType::new("application", "pgp-keys"),
            KeyMediaType::PlainText => ContentType::new("text", "plain"),
        };
        ArmoredKey {
            disposition: Header::new("Content-Disposition", download.content_disposition()),
            status: Header::new("X-HKP-Status", download.hkp_status()),
            key_type: Header::new("X-HKP-Key-Type", download.hkp_key_type()),
            inner: (content_type, download.body),
        }
    }
}

#[derive(Responder)]
pub enum LookupReply {
    Key(ArmoredKey),
    Index((ContentType, String)),
}

impl From<LookupResponse> for LookupReply {
    fn from(response: LookupResponse) -> Self {
        match response {
            LookupResponse::Key(download) => LookupReply::Key(download.into()),
            LookupResponse::Index(index) => LookupReply::Index((ContentType::new("text", "plain"), index)),
        }
    }
}
