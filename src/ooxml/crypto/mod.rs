//! Password protection of presentation packages.
//!
//! An encrypted package is a compound file holding the agile
//! `EncryptionInfo` descriptor and the `EncryptedPackage` stream. Only
//! compiled with the `ooxml_encryption` feature.

mod agile;
mod container;

pub use agile::{decrypt_package, encrypt_package};
pub use container::CFB_SIGNATURE;

fn password_to_utf16le(password: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(password.len() * 2);
    for ch in password.encode_utf16() {
        buf.extend_from_slice(&ch.to_le_bytes());
    }
    buf
}
