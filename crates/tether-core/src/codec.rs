//! Base64/protobuf helpers for the string-typed host boundary

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use prost::Message;

use crate::error::{Result, TetherError};

/// Decode standard base64, naming what was being decoded on failure
pub fn decode_base64(what: &'static str, input: &str) -> Result<Vec<u8>> {
    STANDARD.decode(input).map_err(|e| TetherError::Base64 {
        what,
        reason: e.to_string(),
    })
}

/// Encode bytes as standard base64
pub fn encode_base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode a protobuf message from raw bytes
pub fn decode_proto<M: Message + Default>(what: &'static str, bytes: &[u8]) -> Result<M> {
    M::decode(bytes).map_err(|e| TetherError::Protobuf {
        what,
        reason: e.to_string(),
    })
}

/// Decode a protobuf message wrapped in base64
pub fn decode_b64_proto<M: Message + Default>(what: &'static str, input: &str) -> Result<M> {
    let bytes = decode_base64(what, input)?;
    decode_proto(what, &bytes)
}

/// Encode a protobuf message and wrap it in base64
pub fn encode_b64_proto<M: Message>(message: &M) -> String {
    encode_base64(message.encode_to_vec())
}
