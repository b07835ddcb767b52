/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::borrow::Cow;

use sequoia_openpgp::cert::Cert;
use sequoia_openpgp::cert::CertParser;
use sequoia_openpgp::parse::Parse;
#[cfg(any(test, feature = "testing"))]
use sequoia_openpgp::serialize::SerializeInto;

pub const ARMOR_HEADER: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
pub const ARMOR_FOOTER: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// Wraps key material in public key block markers unless it already carries them.
pub fn ensure_armored(content: &str) -> Cow<'_, str> {
    if content.contains(ARMOR_HEADER) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(format!("{}\n\n{}\n{}", ARMOR_HEADER, content, ARMOR_FOOTER))
    }
}

pub fn parse_certs(data: &[u8]) -> Result<Vec<Cert>, anyhow::Error> {
    // Packets that can't be parsed are skipped, a file without any usable cert yields an empty list.
    Ok(CertParser::from_bytes(data)?.flatten().collect())
}

#[cfg(any(test, feature = "testing"))]
pub fn export_armored_cert(cert: &Cert) -> Result<String, anyhow::Error> {
    let serialized = cert.armored().export_to_vec()?;
    Ok(String::from_utf8(serialized)?)
}
