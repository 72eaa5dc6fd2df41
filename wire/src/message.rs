//! Whole-message framing: header plus record payload.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::header::{decode_header, encode_header, MessageHeader, HEADER_SIZE};
use crate::limits::Limits;

/// A framed message borrowed from an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireMessage<'a> {
    pub header: MessageHeader,
    /// Packed record bits, exactly `header.payload_len` bytes.
    pub payload: &'a [u8],
}

/// Decodes the header and slices out the payload.
///
/// The buffer must contain exactly one message: trailing bytes are an error.
pub fn decode_message<'a>(bytes: &'a [u8], limits: &Limits) -> WireResult<WireMessage<'a>> {
    if bytes.len() > limits.max_message_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::MessageBytes,
            limit: limits.max_message_bytes,
            actual: bytes.len(),
        });
    }
    let header = decode_header(bytes)?;
    let component_count = header.component_count as usize;
    if component_count > limits.max_components {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::ComponentCount,
            limit: limits.max_components,
            actual: component_count,
        });
    }
    let payload = &bytes[HEADER_SIZE..];
    let header_len = header.payload_len as usize;
    if payload.len() != header_len {
        return Err(DecodeError::PayloadLengthMismatch {
            header_len,
            actual_len: payload.len(),
        });
    }
    Ok(WireMessage { header, payload })
}

/// Appends a header for `payload` followed by the payload itself.
///
/// `header.payload_len` is overwritten with the real payload length.
pub fn encode_message(
    mut header: MessageHeader,
    payload: &[u8],
    out: &mut Vec<u8>,
) -> Result<usize, EncodeError> {
    header.payload_len = u32::try_from(payload.len()).map_err(|_| EncodeError::LengthOverflow {
        length: payload.len(),
    })?;
    let start = out.len();
    out.resize(start + HEADER_SIZE, 0);
    encode_header(&header, &mut out[start..])?;
    out.extend_from_slice(payload);
    Ok(HEADER_SIZE + payload.len())
}
