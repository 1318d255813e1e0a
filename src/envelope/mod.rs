use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

use crate::config::{
    DEFAULT_EXTRACTED_NAME, DEFAULT_SECRET_NAME, ENVELOPE_HEADER_SIZE, MAGIC, MAX_NAME_LEN,
};

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("secret file is empty")]
    EmptySecret,
    #[error("filename is too long: {0} bytes (max 65535)")]
    NameTooLong(usize),
    #[error("extracted data is too short: {0} bytes")]
    TooShort(usize),
    #[error("invalid payload format: bad magic")]
    BadMagic,
    #[error("corrupted payload: name of {name_len} bytes overruns {have}-byte buffer")]
    Corrupted { name_len: usize, have: usize },
    #[error("extracted file content is empty")]
    EmptyData,
}

/// A recovered secret: its original file name and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Strip any directory components, accepting both `/` and `\` separators.
pub fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Serialize a secret file.
/// Layout: MAGIC(4) || name_len(2, BE) || name || data
pub fn pack(filename: &str, data: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    if data.is_empty() {
        return Err(EnvelopeError::EmptySecret);
    }

    let name = match basename(filename).trim() {
        "" => DEFAULT_SECRET_NAME,
        name => name,
    };
    let name_bytes = name.as_bytes();
    if name_bytes.len() > MAX_NAME_LEN {
        return Err(EnvelopeError::NameTooLong(name_bytes.len()));
    }

    let mut envelope = vec![0u8; ENVELOPE_HEADER_SIZE];
    envelope[..MAGIC.len()].copy_from_slice(MAGIC);
    BigEndian::write_u16(&mut envelope[MAGIC.len()..], name_bytes.len() as u16);
    envelope.reserve(name_bytes.len() + data.len());
    envelope.extend_from_slice(name_bytes);
    envelope.extend_from_slice(data);
    Ok(envelope)
}

/// Parse an envelope produced by [`pack`].
///
/// The name is decoded lossily: malformed UTF-8 is replaced, never fatal.
pub fn unpack(envelope: &[u8]) -> Result<SecretFile, EnvelopeError> {
    if envelope.len() < ENVELOPE_HEADER_SIZE {
        return Err(EnvelopeError::TooShort(envelope.len()));
    }
    if &envelope[..MAGIC.len()] != MAGIC {
        return Err(EnvelopeError::BadMagic);
    }

    let name_len = BigEndian::read_u16(&envelope[MAGIC.len()..ENVELOPE_HEADER_SIZE]) as usize;
    let data_offset = ENVELOPE_HEADER_SIZE + name_len;
    if envelope.len() < data_offset {
        return Err(EnvelopeError::Corrupted {
            name_len,
            have: envelope.len(),
        });
    }

    let decoded = String::from_utf8_lossy(&envelope[ENVELOPE_HEADER_SIZE..data_offset]);
    let filename = match decoded.trim() {
        "" => DEFAULT_EXTRACTED_NAME.to_string(),
        name => name.to_string(),
    };

    let data = &envelope[data_offset..];
    if data.is_empty() {
        return Err(EnvelopeError::EmptyData);
    }

    Ok(SecretFile {
        filename,
        data: data.to_vec(),
    })
}
