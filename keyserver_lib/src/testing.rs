/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

//! Certificate fixtures for tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sequoia_openpgp::cert::{CertBuilder, CipherSuite};
use sequoia_openpgp::packet::key::{Key4, PrimaryRole, SecretParts};
use sequoia_openpgp::packet::signature::SignatureBuilder;
use sequoia_openpgp::packet::{Key, UserID};
use sequoia_openpgp::types::{Curve, HashAlgorithm, KeyFlags, SignatureType};
use sequoia_openpgp::{Cert, Packet};

use crate::utils::armor::export_armored_cert;

pub fn generate_cert(userids: &[&str], creation_time: Option<SystemTime>, validity: Option<Duration>) -> Cert {
    let mut builder = CertBuilder::new()
        .set_cipher_suite(CipherSuite::Cv25519)
        .set_validity_period(validity)
        .add_transport_encryption_subkey();
    if let Some(creation_time) = creation_time {
        builder = builder.set_creation_time(creation_time);
    }
    for userid in userids {
        builder = builder.add_userid(*userid);
    }
    let (cert, _revocation) = builder.generate().expect("Key generation failed");
    cert
}

/// A cert that expired a day ago.
pub fn generate_expired_cert(userids: &[&str]) -> Cert {
    let day = Duration::from_secs(60 * 60 * 24);
    generate_cert(userids, Some(SystemTime::now() - day * 2), Some(day))
}

/// A cert whose only self-signature is a SHA-1 user id binding, as older GnuPG versions made them.
pub fn generate_sha1_bound_cert(userid: &str, creation_time: SystemTime, validity: Duration) -> Cert {
    let mut key: Key4<SecretParts, PrimaryRole> =
        Key4::generate_ecc(true, Curve::Ed25519).expect("Key generation failed");
    key.set_creation_time(creation_time).expect("Invalid creation time");
    let key: Key<SecretParts, PrimaryRole> = key.into();
    let mut signer = key.clone().into_keypair().expect("Key has no secret");
    let cert = Cert::from_packets(std::iter::once(Packet::from(key.parts_into_public())))
        .expect("Failed to build cert");

    let userid = UserID::from(userid);
    let builder = SignatureBuilder::new(SignatureType::PositiveCertification)
        .set_hash_algo(HashAlgorithm::SHA1)
        .set_signature_creation_time(creation_time)
        .and_then(|b| b.set_key_validity_period(validity))
        .and_then(|b| b.set_key_flags(KeyFlags::empty().set_certification().set_signing()))
        .expect("Invalid signature parameters");
    let binding = userid.bind(&mut signer, &cert, builder).expect("Signing failed");
    cert.insert_packets(vec![Packet::from(userid), Packet::from(binding)])
        .expect("Failed to add user id")
}

pub fn armored(cert: &Cert) -> String {
    export_armored_cert(cert).expect("Armoring failed")
}

pub fn write_key_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).expect("Failed to write key file");
    path
}
