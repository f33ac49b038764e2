//! Hex text <-> raw bytes for the text-oriented transport.
//!
//! Decoding is all-or-nothing: odd length or a single non-hex character rejects
//! the whole input. Encoding always emits lowercase digits and refuses to
//! produce output that would not fit the caller's capacity.

use crate::error::{ControlError, Result};

/// Decode ASCII hex text (`[0-9a-fA-F]`, even length) into bytes.
pub fn decode_hex(text: &[u8]) -> Result<Vec<u8>> {
    Ok(hex::decode(text)?)
}

/// Encoded length of `bytes`, in hex characters
pub fn encoded_len(bytes: &[u8]) -> usize {
    bytes.len() * 2
}

/// Encode `bytes` as lowercase hex into `out`, returning the number of
/// characters written.
///
/// Fails with [`ControlError::BufferTooSmall`] when `out` cannot hold the
/// whole encoding; `out` is left untouched in that case.
pub fn encode_hex_into(bytes: &[u8], out: &mut [u8]) -> Result<usize> {
    let (required, capacity) = (encoded_len(bytes), out.len());
    if required > capacity {
        return Err(ControlError::BufferTooSmall { required, capacity });
    }
    // The only failure left is a length mismatch, which is a sizing error too.
    hex::encode_to_slice(bytes, &mut out[..required])
        .map_err(|_| ControlError::BufferTooSmall { required, capacity })?;
    Ok(required)
}

/// Encode `bytes` as lowercase hex text of at most `capacity` characters.
pub fn encode_hex(bytes: &[u8], capacity: usize) -> Result<String> {
    let required = encoded_len(bytes);
    if required > capacity {
        return Err(ControlError::BufferTooSmall { required, capacity });
    }
    Ok(hex::encode(bytes))
}
