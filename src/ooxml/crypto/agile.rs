//! Agile encryption (MS-OFFCRYPTO 2.3.4.10 - 2.3.4.15).
//!
//! Packages are written with AES-128/SHA-1 and read with either that or the
//! AES-256/SHA-512 parameters current Office versions use.

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use hmac::{Hmac, Mac};
use quick_xml::Reader;
use quick_xml::events::Event;
use rand::Rng;
use sha1::{Digest, Sha1};
use sha2::Sha512;

use super::container::{read_container, write_container};
use super::password_to_utf16le;
use crate::common::xml::attr;
use crate::common::{Error, Result};

const BLOCK_SIZE: usize = 16;
const SALT_SIZE: usize = 16;
const SPIN_COUNT: u32 = 100_000;
const SEGMENT_SIZE: usize = 4096;
const VERSION_MAJOR: u16 = 4;
const VERSION_MINOR: u16 = 4;
const ENCRYPTION_FLAGS: u32 = 0x0000_0040;

const K_VERIFIER_INPUT_BLOCK: [u8; 8] = [0xfe, 0xa7, 0xd2, 0x76, 0x3b, 0x4b, 0x9e, 0x79];
const K_HASHED_VERIFIER_BLOCK: [u8; 8] = [0xd7, 0xaa, 0x0f, 0x6d, 0x30, 0x61, 0x34, 0x4e];
const K_CRYPTO_KEY_BLOCK: [u8; 8] = [0x14, 0x6e, 0x0b, 0xe7, 0xab, 0xac, 0xd0, 0xd6];
const K_INTEGRITY_KEY_BLOCK: [u8; 8] = [0x5f, 0xb2, 0xad, 0x01, 0x0c, 0xb9, 0xe1, 0xf6];
const K_INTEGRITY_VALUE_BLOCK: [u8; 8] = [0xa0, 0x67, 0x7f, 0x02, 0xb2, 0x2c, 0x84, 0x33];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashAlgorithm {
    Sha1,
    Sha512,
}

impl HashAlgorithm {
    fn from_name(name: &str) -> Result<Self> {
        match name {
            "SHA1" | "SHA-1" => Ok(HashAlgorithm::Sha1),
            "SHA512" | "SHA-512" => Ok(HashAlgorithm::Sha512),
            other => Err(Error::UnsupportedFormat(format!(
                "agile encryption hash algorithm {other}"
            ))),
        }
    }

    fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    fn size(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha512 => 64,
        }
    }

    fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => {
                let mut sha = Sha1::new();
                for part in parts {
                    sha.update(part);
                }
                sha.finalize().to_vec()
            },
            HashAlgorithm::Sha512 => {
                let mut sha = Sha512::new();
                for part in parts {
                    sha.update(part);
                }
                sha.finalize().to_vec()
            },
        }
    }

    fn hmac(self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let init = |e: &dyn std::fmt::Display| Error::Crypto(format!("failed to init HMAC: {e}"));
        Ok(match self {
            HashAlgorithm::Sha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(|e| init(&e))?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            },
            HashAlgorithm::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(|e| init(&e))?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            },
        })
    }
}

/// Cipher parameters shared by `keyData` and the password key encryptor.
#[derive(Debug, Clone, Copy)]
struct Params {
    hash: HashAlgorithm,
    key_bits: usize,
}

impl Params {
    const WRITE: Params = Params {
        hash: HashAlgorithm::Sha1,
        key_bits: 128,
    };

    fn key_bytes(&self) -> usize {
        self.key_bits / 8
    }
}

/// What `EncryptionInfo` tells a reader.
#[derive(Debug, Default)]
struct EncryptionInfo {
    key_data_salt: Vec<u8>,
    key_data: Option<Params>,
    hmac_key: Vec<u8>,
    hmac_value: Vec<u8>,
    spin_count: u32,
    password_salt: Vec<u8>,
    password: Option<Params>,
    verifier_input: Vec<u8>,
    verifier_value: Vec<u8>,
    key_value: Vec<u8>,
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes);
    bytes
}

/// Encrypt a package and wrap it in a compound file container.
pub fn encrypt_package(package_bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    encrypt_with(package_bytes, password, Params::WRITE, SPIN_COUNT)
}

fn encrypt_with(
    package_bytes: &[u8],
    password: &str,
    params: Params,
    spin_count: u32,
) -> Result<Vec<u8>> {
    if package_bytes.is_empty() {
        return Err(Error::Crypto("cannot encrypt an empty package".to_string()));
    }
    let hash = params.hash;
    let key_bytes = params.key_bytes();

    let verifier_salt: [u8; SALT_SIZE] = random_bytes();
    let verifier: [u8; SALT_SIZE] = random_bytes();
    let key_salt: [u8; SALT_SIZE] = random_bytes();
    let content_key = random_bytes::<32>()[..key_bytes].to_vec();
    let integrity_salt = random_bytes::<64>()[..hash.size()].to_vec();

    let pw_hash = hash_password(hash, password, &verifier_salt, spin_count);
    let password_key = |block: &[u8; 8]| generate_key(hash, &pw_hash, block, key_bytes);
    let salt_iv = pad_to_block(verifier_salt.to_vec());

    let encrypted_verifier = cbc_encrypt(
        &password_key(&K_VERIFIER_INPUT_BLOCK),
        &salt_iv,
        &pad_zero(&verifier),
    )?;
    let encrypted_verifier_hash = cbc_encrypt(
        &password_key(&K_HASHED_VERIFIER_BLOCK),
        &salt_iv,
        &pad_zero(&hash.digest(&[&verifier])),
    )?;
    let encrypted_key = cbc_encrypt(
        &password_key(&K_CRYPTO_KEY_BLOCK),
        &salt_iv,
        &pad_zero(&content_key),
    )?;

    let encrypted_package = encrypt_stream(hash, &content_key, &key_salt, package_bytes)?;

    let encrypted_hmac_key = cbc_encrypt(
        &content_key,
        &generate_iv(hash, &key_salt, Some(&K_INTEGRITY_KEY_BLOCK)),
        &pad_zero(&integrity_salt),
    )?;
    let hmac_value = hash.hmac(&integrity_salt, &encrypted_package)?;
    let encrypted_hmac_value = cbc_encrypt(
        &content_key,
        &generate_iv(hash, &key_salt, Some(&K_INTEGRITY_VALUE_BLOCK)),
        &pad_zero(&hmac_value),
    )?;

    let xml = encryption_info_xml(
        params,
        spin_count,
        &[
            &key_salt,
            &verifier_salt,
            &encrypted_verifier,
            &encrypted_verifier_hash,
            &encrypted_key,
            &encrypted_hmac_key,
            &encrypted_hmac_value,
        ],
    );
    let mut encryption_info = Vec::with_capacity(8 + xml.len());
    encryption_info.extend_from_slice(&VERSION_MAJOR.to_le_bytes());
    encryption_info.extend_from_slice(&VERSION_MINOR.to_le_bytes());
    encryption_info.extend_from_slice(&ENCRYPTION_FLAGS.to_le_bytes());
    encryption_info.extend_from_slice(xml.as_bytes());

    write_container(&encryption_info, &encrypted_package)
}

/// Decrypt a compound file container back into package bytes.
///
/// A password that fails the verifier check is [`Error::WrongPassword`]; a
/// package whose integrity HMAC does not match is [`Error::Crypto`].
pub fn decrypt_package(container: &[u8], password: &str) -> Result<Vec<u8>> {
    let (info_stream, encrypted_package) = read_container(container)?;
    let info = parse_encryption_info(&info_stream)?;
    let (Some(key_data), Some(pw_params)) = (info.key_data, info.password) else {
        return Err(Error::Crypto(
            "EncryptionInfo lacks keyData or a password key encryptor".to_string(),
        ));
    };

    let pw_hash = hash_password(pw_params.hash, password, &info.password_salt, info.spin_count);
    let password_key =
        |block: &[u8; 8]| generate_key(pw_params.hash, &pw_hash, block, pw_params.key_bytes());
    let salt_iv = pad_to_block(info.password_salt.clone());

    let verifier = cbc_decrypt(
        &password_key(&K_VERIFIER_INPUT_BLOCK),
        &salt_iv,
        &info.verifier_input,
    )?;
    let verifier_hash = cbc_decrypt(
        &password_key(&K_HASHED_VERIFIER_BLOCK),
        &salt_iv,
        &info.verifier_value,
    )?;
    let hash_size = pw_params.hash.size();
    let expected = pw_params
        .hash
        .digest(&[&verifier[..SALT_SIZE.min(verifier.len())]]);
    if verifier_hash.len() < hash_size || expected[..] != verifier_hash[..hash_size] {
        return Err(Error::WrongPassword);
    }

    let mut content_key = cbc_decrypt(
        &password_key(&K_CRYPTO_KEY_BLOCK),
        &salt_iv,
        &info.key_value,
    )?;
    content_key.truncate(key_data.key_bytes());

    if !info.hmac_key.is_empty() {
        verify_integrity(&info, key_data.hash, &content_key, &encrypted_package)?;
    }
    decrypt_stream(key_data.hash, &content_key, &info.key_data_salt, &encrypted_package)
}

fn verify_integrity(
    info: &EncryptionInfo,
    hash: HashAlgorithm,
    content_key: &[u8],
    encrypted_package: &[u8],
) -> Result<()> {
    let hash_size = hash.size();
    let hmac_key = cbc_decrypt(
        content_key,
        &generate_iv(hash, &info.key_data_salt, Some(&K_INTEGRITY_KEY_BLOCK)),
        &info.hmac_key,
    )?;
    let expected = cbc_decrypt(
        content_key,
        &generate_iv(hash, &info.key_data_salt, Some(&K_INTEGRITY_VALUE_BLOCK)),
        &info.hmac_value,
    )?;
    if hmac_key.len() < hash_size || expected.len() < hash_size {
        return Err(Error::Crypto("truncated data integrity values".to_string()));
    }
    let actual = hash.hmac(&hmac_key[..hash_size], encrypted_package)?;
    if actual[..] != expected[..hash_size] {
        return Err(Error::Crypto("encrypted package failed its integrity check".to_string()));
    }
    Ok(())
}

fn hash_password(hash: HashAlgorithm, password: &str, salt: &[u8], spin_count: u32) -> Vec<u8> {
    let mut digest = hash.digest(&[salt, &password_to_utf16le(password)]);
    for i in 0..spin_count {
        digest = hash.digest(&[&i.to_le_bytes(), &digest]);
    }
    digest
}

/// `H(H_n || blockKey)` cut or `0x36`-padded to `key_size`.
fn generate_key(hash: HashAlgorithm, password_hash: &[u8], block_key: &[u8], key_size: usize) -> Vec<u8> {
    let mut key = hash.digest(&[password_hash, block_key]);
    key.resize(key_size, 0x36);
    key
}

fn pad_to_block(mut iv: Vec<u8>) -> Vec<u8> {
    iv.resize(BLOCK_SIZE, 0x36);
    iv
}

fn generate_iv(hash: HashAlgorithm, salt: &[u8], block_key: Option<&[u8]>) -> Vec<u8> {
    match block_key {
        Some(block_key) => pad_to_block(hash.digest(&[salt, block_key])),
        None => pad_to_block(salt.to_vec()),
    }
}

fn pad_zero(input: &[u8]) -> Vec<u8> {
    let mut out = input.to_vec();
    let len = input.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
    out.resize(len, 0);
    out
}

fn cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(Error::Crypto("AES input is not block aligned".to_string()));
    }
    let bad_key = |_| Error::Crypto(format!("invalid AES key length {}", key.len()));
    Ok(match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        other => return Err(Error::Crypto(format!("invalid AES key length {other}"))),
    })
}

fn cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::Crypto("AES ciphertext is not block aligned".to_string()));
    }
    let bad_key = |_| Error::Crypto(format!("invalid AES key length {}", key.len()));
    let unpad = |e: aes::cipher::block_padding::UnpadError| Error::Crypto(e.to_string());
    match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .decrypt_padded_vec_mut::<NoPadding>(data)
            .map_err(unpad),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .decrypt_padded_vec_mut::<NoPadding>(data)
            .map_err(unpad),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(bad_key)?
            .decrypt_padded_vec_mut::<NoPadding>(data)
            .map_err(unpad),
        other => Err(Error::Crypto(format!("invalid AES key length {other}"))),
    }
}

/// `EncryptedPackage` stream: the plain size as u64 LE, then 4096-byte
/// segments each encrypted with its own IV.
fn encrypt_stream(hash: HashAlgorithm, content_key: &[u8], key_salt: &[u8], plain: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(8 + plain.len() + BLOCK_SIZE);
    out.extend_from_slice(&(plain.len() as u64).to_le_bytes());
    for (index, segment) in (0u32..).zip(plain.chunks(SEGMENT_SIZE)) {
        let iv = generate_iv(hash, key_salt, Some(&index.to_le_bytes()));
        let bad_key = |_| Error::Crypto(format!("invalid AES key length {}", content_key.len()));
        // only the last segment can be short; it takes PKCS#7 padding
        let encrypted = if segment.len() % BLOCK_SIZE == 0 {
            cbc_encrypt(content_key, &iv, segment)?
        } else {
            match content_key.len() {
                16 => cbc::Encryptor::<Aes128>::new_from_slices(content_key, &iv)
                    .map_err(bad_key)?
                    .encrypt_padded_vec_mut::<Pkcs7>(segment),
                32 => cbc::Encryptor::<Aes256>::new_from_slices(content_key, &iv)
                    .map_err(bad_key)?
                    .encrypt_padded_vec_mut::<Pkcs7>(segment),
                other => return Err(Error::Crypto(format!("invalid AES key length {other}"))),
            }
        };
        out.extend_from_slice(&encrypted);
    }
    Ok(out)
}

fn decrypt_stream(hash: HashAlgorithm, content_key: &[u8], key_salt: &[u8], stream: &[u8]) -> Result<Vec<u8>> {
    let Some((size, body)) = stream.split_first_chunk::<8>() else {
        return Err(Error::Crypto("EncryptedPackage stream is too short".to_string()));
    };
    let size = u64::from_le_bytes(*size) as usize;
    let mut plain = Vec::with_capacity(body.len());
    for (index, segment) in (0u32..).zip(body.chunks(SEGMENT_SIZE)) {
        let iv = generate_iv(hash, key_salt, Some(&index.to_le_bytes()));
        // trailing bytes past the last whole block are container slack
        let aligned = segment.len() - segment.len() % BLOCK_SIZE;
        if aligned == 0 {
            break;
        }
        plain.extend_from_slice(&cbc_decrypt(content_key, &iv, &segment[..aligned])?);
        if plain.len() >= size {
            break;
        }
    }
    if plain.len() < size {
        return Err(Error::Crypto(format!(
            "EncryptedPackage declares {size} bytes but holds {}",
            plain.len()
        )));
    }
    plain.truncate(size);
    Ok(plain)
}

fn encryption_info_xml(params: Params, spin_count: u32, values: &[&[u8]; 7]) -> String {
    let [key_salt, verifier_salt, enc_verifier, enc_verifier_hash, enc_key, enc_hmac_key, enc_hmac_value] =
        values.map(|v| BASE64_STANDARD.encode(v));
    let hash = params.hash.name();
    let hash_size = params.hash.size();
    let key_bits = params.key_bits;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<encryption xmlns="http://schemas.microsoft.com/office/2006/encryption" xmlns:p="http://schemas.microsoft.com/office/2006/keyEncryptor/password"><keyData saltSize="{SALT_SIZE}" blockSize="{BLOCK_SIZE}" keyBits="{key_bits}" hashSize="{hash_size}" cipherAlgorithm="AES" cipherChaining="ChainingModeCBC" hashAlgorithm="{hash}" saltValue="{key_salt}"/><dataIntegrity encryptedHmacKey="{enc_hmac_key}" encryptedHmacValue="{enc_hmac_value}"/><keyEncryptors><keyEncryptor uri="http://schemas.microsoft.com/office/2006/keyEncryptor/password"><p:encryptedKey spinCount="{spin_count}" saltSize="{SALT_SIZE}" blockSize="{BLOCK_SIZE}" keyBits="{key_bits}" hashSize="{hash_size}" cipherAlgorithm="AES" cipherChaining="ChainingModeCBC" hashAlgorithm="{hash}" saltValue="{verifier_salt}" encryptedVerifierHashInput="{enc_verifier}" encryptedVerifierHashValue="{enc_verifier_hash}" encryptedKeyValue="{enc_key}"/></keyEncryptor></keyEncryptors></encryption>"#
    )
}

fn parse_encryption_info(stream: &[u8]) -> Result<EncryptionInfo> {
    let Some((version, xml)) = stream.split_first_chunk::<8>() else {
        return Err(Error::Crypto("EncryptionInfo stream is too short".to_string()));
    };
    let major = u16::from_le_bytes([version[0], version[1]]);
    let minor = u16::from_le_bytes([version[2], version[3]]);
    if (major, minor) != (VERSION_MAJOR, VERSION_MINOR) {
        return Err(Error::UnsupportedFormat(format!(
            "encryption version {major}.{minor}; only agile encryption (4.4) is read"
        )));
    }

    let decode = |name: &str, value: Option<String>| -> Result<Vec<u8>> {
        let value = value.ok_or_else(|| Error::Crypto(format!("EncryptionInfo lacks {name}")))?;
        BASE64_STANDARD
            .decode(value.trim())
            .map_err(|e| Error::Crypto(format!("EncryptionInfo {name} is not base64: {e}")))
    };
    let params = |e: &quick_xml::events::BytesStart<'_>| -> Result<Params> {
        let hash = HashAlgorithm::from_name(attr(e, b"hashAlgorithm")?.as_deref().unwrap_or("SHA1"))?;
        let key_bits = attr(e, b"keyBits")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(128);
        Ok(Params { hash, key_bits })
    };

    let mut info = EncryptionInfo::default();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"keyData" => {
                    info.key_data = Some(params(&e)?);
                    info.key_data_salt = decode("keyData saltValue", attr(&e, b"saltValue")?)?;
                },
                b"dataIntegrity" => {
                    info.hmac_key = decode("encryptedHmacKey", attr(&e, b"encryptedHmacKey")?)?;
                    info.hmac_value =
                        decode("encryptedHmacValue", attr(&e, b"encryptedHmacValue")?)?;
                },
                b"encryptedKey" => {
                    info.password = Some(params(&e)?);
                    info.spin_count = attr(&e, b"spinCount")?
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(SPIN_COUNT);
                    info.password_salt = decode("saltValue", attr(&e, b"saltValue")?)?;
                    info.verifier_input = decode(
                        "encryptedVerifierHashInput",
                        attr(&e, b"encryptedVerifierHashInput")?,
                    )?;
                    info.verifier_value = decode(
                        "encryptedVerifierHashValue",
                        attr(&e, b"encryptedVerifierHashValue")?,
                    )?;
                    info.key_value = decode("encryptedKeyValue", attr(&e, b"encryptedKeyValue")?)?;
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_SPIN: u32 = 10;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_round_trip_across_segments() {
        let plain = sample(SEGMENT_SIZE * 2 + 123);
        let container = encrypt_with(&plain, "secret", Params::WRITE, FAST_SPIN).unwrap();
        assert!(container.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]));
        assert_eq!(decrypt_package(&container, "secret").unwrap(), plain);
    }

    #[test]
    fn test_sha512_aes256_round_trip() {
        let params = Params {
            hash: HashAlgorithm::Sha512,
            key_bits: 256,
        };
        let plain = sample(SEGMENT_SIZE);
        let container = encrypt_with(&plain, "pässwörd", params, FAST_SPIN).unwrap();
        assert_eq!(decrypt_package(&container, "pässwörd").unwrap(), plain);
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let container = encrypt_with(&sample(100), "right", Params::WRITE, FAST_SPIN).unwrap();
        assert!(matches!(
            decrypt_package(&container, "wrong"),
            Err(Error::WrongPassword)
        ));
    }

    #[test]
    fn test_empty_package_is_refused() {
        assert!(matches!(encrypt_package(&[], "pw"), Err(Error::Crypto(_))));
    }

    #[test]
    fn test_key_derivation_pads_and_truncates() {
        let key = generate_key(HashAlgorithm::Sha1, &[1; 20], &K_CRYPTO_KEY_BLOCK, 32);
        assert_eq!(key.len(), 32);
        assert_eq!(&key[20..], &[0x36; 12]);
        let key = generate_key(HashAlgorithm::Sha512, &[1; 64], &K_CRYPTO_KEY_BLOCK, 16);
        assert_eq!(key.len(), 16);
        assert_eq!(pad_zero(&[1; 20]).len(), 32);
        assert_eq!(pad_zero(&[]).len(), BLOCK_SIZE);
    }
}
