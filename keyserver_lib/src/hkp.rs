/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

//! Wire format of the HTTP Keyserver Protocol: the machine readable `index` listing and
//! the shape of `get` responses.

use crate::types::KeyRecord;
use crate::utils::armor::ensure_armored;

pub const SERVER_BANNER: &str = "SKS OpenPGP Public Key Server\n\
                                 Software: sks-service 1.0.0\n\
                                 Supported operations: get, index\n";

pub const HKP_STATUS_SUCCESS: &str = "Success";
pub const HKP_KEY_TYPE_PUBLIC: &str = "public";
pub const DEFAULT_DOWNLOAD_NAME: &str = "pubkey.asc";

/// Characters besides ASCII alphanumerics that stay unescaped in `uid:` lines.
const UID_SAFE_CHARACTERS: &str = "@(),.=&-_~!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyMediaType {
    /// `application/pgp-keys`
    PgpKeys,
    /// `text/plain`, requested with the `mr` option.
    PlainText,
}

impl KeyMediaType {
    pub fn for_options(machine_readable: bool) -> Self {
        match machine_readable {
            true => KeyMediaType::PlainText,
            false => KeyMediaType::PgpKeys,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMediaType::PgpKeys => "application/pgp-keys",
            KeyMediaType::PlainText => "text/plain",
        }
    }
}

/// Transport independent result of a key download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDownload {
    pub body: String,
    pub media_type: KeyMediaType,
    pub filename: String,
}

impl KeyDownload {
    pub fn new(content: &str, machine_readable: bool) -> Self {
        Self {
            body: ensure_armored(content).into_owned(),
            media_type: KeyMediaType::for_options(machine_readable),
            filename: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }

    pub fn with_filename(mut self, filename: String) -> Self {
        self.filename = filename;
        self
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn hkp_status(&self) -> &'static str {
        HKP_STATUS_SUCCESS
    }

    pub fn hkp_key_type(&self) -> &'static str {
        HKP_KEY_TYPE_PUBLIC
    }
}

/// Percent-encodes a user id for the colon separated index format.
pub fn escape_uid(uid: &str) -> String {
    let mut escaped = String::with_capacity(uid.len());
    let mut buffer = [0u8; 4];
    for c in uid.chars() {
        if c.is_ascii_alphanumeric() || UID_SAFE_CHARACTERS.contains(c) {
            escaped.push(c);
        } else {
            escaped.push_str(&urlencoding::encode(c.encode_utf8(&mut buffer)));
        }
    }
    escaped
}

/// Renders `records` as a machine readable index, one `pub:` line per key followed by its `uid:` lines.
pub fn format_index(records: &[KeyRecord], show_fingerprint: bool) -> String {
    let mut index = format!("info:1:{}\n", records.len());
    for record in records {
        let id = match show_fingerprint {
            true => &record.fingerprint,
            false => &record.keyid,
        };
        index.push_str(&format!(
            "pub:{}:{}:{}:{}:{}:{}\n",
            id, record.algo, record.keylen, record.created, record.expires, record.flags
        ));
        for uid in &record.uids {
            index.push_str(&format!(
                "uid:{}:{}:{}:{}\n",
                escape_uid(uid),
                record.created,
                record.expires,
                record.flags
            ));
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::armor::{ARMOR_FOOTER, ARMOR_HEADER};

    fn record(email: &str, uids: &[&str], flags: &str) -> KeyRecord {
        KeyRecord {
            email: email.into(),
            filename: format!("{}.pgp", email),
            keyid: "K1".into(),
            fingerprint: "F1".into(),
            algo: "22".into(),
            keylen: "256".into(),
            created: "1600000000".into(),
            expires: "1700000000".into(),
            flags: flags.into(),
            uids: uids.iter().map(|u| u.to_string()).collect(),
            content: "".into(),
        }
    }

    #[test]
    fn escapes_uid() {
        assert_eq!(escape_uid("Bob <bob@example.com>"), "Bob%20%3Cbob@example.com%3E");
        assert_eq!(escape_uid("a(b),c.d=e&f-g_h~i!"), "a(b),c.d=e&f-g_h~i!");
        assert_eq!(escape_uid("x:y/z%"), "x%3Ay%2Fz%25");
        assert_eq!(escape_uid("Jürgen"), "J%C3%BCrgen");
    }

    #[test]
    fn empty_index() {
        assert_eq!(format_index(&[], false), "info:1:0\n");
    }

    #[test]
    fn index_lines() {
        let records = vec![
            record("bob@example.com", &["Bob <bob@example.com>", "bob@work.example"], ""),
            record("old@example.com", &[], "e"),
        ];
        let index = format_index(&records, false);
        assert_eq!(
            index,
            "info:1:2\n\
             pub:K1:22:256:1600000000:1700000000:\n\
             uid:Bob%20%3Cbob@example.com%3E:1600000000:1700000000:\n\
             uid:bob@work.example:1600000000:1700000000:\n\
             pub:K1:22:256:1600000000:1700000000:e\n"
        );
    }

    #[test]
    fn index_with_fingerprint() {
        let index = format_index(&[record("bob@example.com", &[], "")], true);
        assert!(index.contains("\npub:F1:"));
    }

    #[test]
    fn info_count_matches_pub_lines() {
        let records: Vec<KeyRecord> = (0..5)
            .map(|i| record(&format!("user{}@example.com", i), &["uid"], ""))
            .collect();
        let index = format_index(&records, false);
        let pub_lines = index.lines().filter(|l| l.starts_with("pub:")).count();
        assert!(index.starts_with(&format!("info:1:{}\n", pub_lines)));
        assert!(index.ends_with('\n'));
    }

    #[test]
    fn download_media_types() {
        let armored = format!("{}\n\nAAAA\n{}\n", ARMOR_HEADER, ARMOR_FOOTER);
        let download = KeyDownload::new(&armored, false);
        assert_eq!(download.body, armored);
        assert_eq!(download.media_type.as_str(), "application/pgp-keys");
        assert_eq!(download.content_disposition(), "attachment; filename=\"pubkey.asc\"");

        let download = KeyDownload::new(&armored, true);
        assert_eq!(download.media_type.as_str(), "text/plain");
    }

    #[test]
    fn download_wraps_bare_content() {
        let download = KeyDownload::new("AAAA", false).with_filename("ABCDEF12.asc".into());
        assert!(download.body.starts_with(ARMOR_HEADER));
        assert!(download.body.ends_with(ARMOR_FOOTER));
        assert_eq!(download.content_disposition(), "attachment; filename=\"ABCDEF12.asc\"");
    }
}
