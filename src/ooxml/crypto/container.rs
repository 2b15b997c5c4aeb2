//! Compound file container around an encrypted package.
//!
//! Besides `EncryptionInfo` and `EncryptedPackage` the container carries the
//! `\u{6}DataSpaces` storage (MS-OFFCRYPTO 2.1) naming the
//! StrongEncryptionDataSpace transform.

use std::io::{Cursor, Read, Seek, Write};

use cfb::CompoundFile;

use crate::common::{Error, Result};

const ENCRYPTION_INFO: &str = "/EncryptionInfo";
const ENCRYPTED_PACKAGE: &str = "/EncryptedPackage";
const DATA_SPACES: &str = "/\u{6}DataSpaces";

pub use crate::ooxml::opc::constants::CFB_SIGNATURE;

pub(crate) fn write_container(encryption_info: &[u8], encrypted_package: &[u8]) -> Result<Vec<u8>> {
    let mut cfb = CompoundFile::create(Cursor::new(Vec::new()))?;
    write_stream(&mut cfb, ENCRYPTION_INFO, encryption_info)?;
    write_stream(&mut cfb, ENCRYPTED_PACKAGE, encrypted_package)?;

    cfb.create_storage(DATA_SPACES)?;
    cfb.create_storage(&format!("{DATA_SPACES}/DataSpaceInfo"))?;
    cfb.create_storage(&format!("{DATA_SPACES}/TransformInfo"))?;
    cfb.create_storage(&format!("{DATA_SPACES}/TransformInfo/StrongEncryptionTransform"))?;
    write_stream(&mut cfb, &format!("{DATA_SPACES}/Version"), &version_stream())?;
    write_stream(&mut cfb, &format!("{DATA_SPACES}/DataSpaceMap"), &data_space_map_stream())?;
    write_stream(
        &mut cfb,
        &format!("{DATA_SPACES}/DataSpaceInfo/StrongEncryptionDataSpace"),
        &data_space_definition_stream(),
    )?;
    write_stream(
        &mut cfb,
        &format!("{DATA_SPACES}/TransformInfo/StrongEncryptionTransform/\u{6}Primary"),
        &transform_primary_stream(),
    )?;

    cfb.flush()?;
    Ok(cfb.into_inner().into_inner())
}

fn write_stream<F: Read + Write + Seek>(cfb: &mut CompoundFile<F>, path: &str, data: &[u8]) -> Result<()> {
    let mut stream = cfb.create_stream(path)?;
    stream.write_all(data)?;
    stream.flush()?;
    Ok(())
}

/// `(EncryptionInfo, EncryptedPackage)` stream contents.
pub(crate) fn read_container(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut cfb = CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| Error::Crypto(format!("unreadable compound file: {e}")))?;
    if !cfb.is_stream(ENCRYPTION_INFO) || !cfb.is_stream(ENCRYPTED_PACKAGE) {
        return Err(Error::UnsupportedFormat(
            "compound file is not an encrypted package (legacy binary presentation?)".to_string(),
        ));
    }
    Ok((read_stream(&mut cfb, ENCRYPTION_INFO)?, read_stream(&mut cfb, ENCRYPTED_PACKAGE)?))
}

fn read_stream<F: Read + Seek>(cfb: &mut CompoundFile<F>, path: &str) -> Result<Vec<u8>> {
    let mut stream = cfb.open_stream(path)?;
    let mut data = Vec::with_capacity(stream.len() as usize);
    stream.read_to_end(&mut data)?;
    Ok(data)
}

/// Length-prefixed UTF-16LE string padded to four bytes.
fn write_unicode_lpp4(buf: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    let len = (units.len() * 2) as u32;
    buf.extend_from_slice(&len.to_le_bytes());
    for unit in units {
        buf.extend_from_slice(&unit.to_le_bytes());
    }
    if len % 4 == 2 {
        buf.extend_from_slice(&[0, 0]);
    }
}

/// Reader, updater and writer versions, all 1.0.
fn push_versions(buf: &mut Vec<u8>) {
    for _ in 0..3 {
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
    }
}

fn version_stream() -> Vec<u8> {
    let mut buf = Vec::new();
    write_unicode_lpp4(&mut buf, "Microsoft.Container.DataSpaces");
    push_versions(&mut buf);
    buf
}

fn data_space_map_stream() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());

    let entry_start = buf.len();
    buf.extend_from_slice(&0u32.to_le_bytes());
    // one reference component of type stream (0)
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    write_unicode_lpp4(&mut buf, "EncryptedPackage");
    write_unicode_lpp4(&mut buf, "StrongEncryptionDataSpace");
    let entry_len = (buf.len() - entry_start) as u32;
    buf[entry_start..entry_start + 4].copy_from_slice(&entry_len.to_le_bytes());
    buf
}

fn data_space_definition_stream() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());
    write_unicode_lpp4(&mut buf, "StrongEncryptionTransform");
    buf
}

fn transform_primary_stream() -> Vec<u8> {
    let mut buf = Vec::new();
    let header_start = buf.len();
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());
    write_unicode_lpp4(&mut buf, "{FF9A3F03-56EF-4613-BDD5-5A41C1D07246}");
    let header_len = (buf.len() - header_start) as u32;
    buf[header_start..header_start + 4].copy_from_slice(&header_len.to_le_bytes());

    write_unicode_lpp4(&mut buf, "Microsoft.Container.EncryptionTransform");
    push_versions(&mut buf);
    // empty cipher name, key size 0, block size 4
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_streams_survive() {
        let bytes = write_container(b"info", &[7u8; 5000]).unwrap();
        assert!(bytes.starts_with(&CFB_SIGNATURE));
        let (info, package) = read_container(&bytes).unwrap();
        assert_eq!(info, b"info");
        assert_eq!(package, vec![7u8; 5000]);

        let cfb = CompoundFile::open(Cursor::new(&bytes[..])).unwrap();
        assert!(cfb.is_stream("/\u{6}DataSpaces/DataSpaceMap"));
        assert!(cfb.is_storage("/\u{6}DataSpaces/TransformInfo/StrongEncryptionTransform"));
    }

    #[test]
    fn test_lpp4_padding() {
        let mut buf = Vec::new();
        write_unicode_lpp4(&mut buf, "abc");
        assert_eq!(buf.len(), 4 + 6 + 2);
        assert_eq!(&buf[..4], &6u32.to_le_bytes());
    }

    #[test]
    fn test_compound_file_without_package_is_unsupported() {
        let mut cfb = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        cfb.create_stream("/PowerPoint Document").unwrap().write_all(b"x").unwrap();
        cfb.flush().unwrap();
        let bytes = cfb.into_inner().into_inner();
        assert!(matches!(read_container(&bytes), Err(Error::UnsupportedFormat(_))));
    }
}
