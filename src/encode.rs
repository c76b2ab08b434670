//! Binary payloads of inline `DataArray` elements.
//!
//! A binary array is written as the base64 encoding of a `UInt32` header holding the byte
//! length of the raw data, immediately followed by the base64 encoding of the raw data
//! itself. Both are in the native byte order of the machine, which is announced in the
//! `byte_order` attribute of the `VTKFile` element.

use crate::traits::Numeric;
use crate::parse::InvalidValue;
use crate::{Error, ParseError};

/// length of the base64 text of the 4 byte header
const HEADER_CHARS: usize = 8;

/// whether this machine stores multi-byte integers most significant byte first
pub fn is_big_endian() -> bool {
    let probe: u32 = 0x01020304;
    probe.to_ne_bytes()[0] == 1
}

/// value of the `byte_order` attribute for this machine
pub fn byte_order() -> &'static str {
    if is_big_endian() {
        "BigEndian"
    } else {
        "LittleEndian"
    }
}

/// base64 text of a raw byte buffer
pub fn encode(bytes: &[u8]) -> String {
    base64::encode(bytes)
}

/// base64 text of the length header followed by base64 text of the values
pub fn encode_with_header<T: Numeric>(values: &[T]) -> Result<String, Error> {
    let data_len = values.len() * T::SIZE;
    let header = u32::try_from(data_len).map_err(|_| Error::PayloadTooLarge(data_len))?;

    let mut bytes: Vec<u8> = Vec::with_capacity(data_len);
    values
        .iter()
        .for_each(|value| value.extend_ne_bytes(&mut bytes));

    let mut text = encode(&header.to_ne_bytes());
    text.push_str(&encode(&bytes));

    Ok(text)
}

/// Decode a payload written by [`encode_with_header`] on a machine of the given byte
/// order. The declared length must match the decoded data.
pub fn decode_with_header(text: &str, big_endian: bool) -> Result<Vec<u8>, ParseError> {
    let text = text.trim();
    if !text.is_ascii() {
        let what = "base64 payload".to_string();
        return Err(ParseError::InvalidValue(InvalidValue::new(what, text.to_string())));
    }
    if text.len() < HEADER_CHARS {
        return Err(ParseError::TruncatedHeader(text.len()));
    }

    let (header, data) = text.split_at(HEADER_CHARS);
    let header = base64::decode(header)?;
    if header.len() != 4 {
        return Err(ParseError::TruncatedHeader(header.len()));
    }
    let declared = header_value(&header, big_endian) as usize;

    let bytes = base64::decode(data)?;
    if bytes.len() != declared {
        return Err(ParseError::LengthMismatch {
            declared,
            actual: bytes.len(),
        });
    }

    Ok(bytes)
}

fn header_value(header: &[u8], big_endian: bool) -> u32 {
    let mut arr = [0; 4];
    arr.copy_from_slice(&header[..4]);
    if big_endian {
        u32::from_be_bytes(arr)
    } else {
        u32::from_le_bytes(arr)
    }
}

/// reinterpret raw bytes of the given byte order as values
pub fn values_from_bytes<T: Numeric>(bytes: &[u8], big_endian: bool) -> Vec<T> {
    bytes
        .chunks_exact(T::SIZE)
        .map(|chunk| T::from_bytes(chunk, big_endian))
        .collect()
}
