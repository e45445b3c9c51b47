//! MessagePack envelope and raw buffer decoding.

use bytes::Bytes;
use seaview_common::{DecodedField, FieldError, FieldResult, GridShape};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Content type the array server answers with.
pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

/// The only element type the server produces.
const EXPECTED_DTYPE: &str = "float32";

/// Wire envelope as sent by the array server.
///
/// The component buffers are MessagePack `bin` values holding native-endian
/// `f32` samples in `[z][y][x]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    pub shape: Vec<i64>,
    pub dtype: String,
    #[serde(rename = "u_array")]
    pub u: Bytes,
    #[serde(rename = "v_array")]
    pub v: Bytes,
    #[serde(rename = "w_array")]
    pub w: Bytes,
}

impl RawPayload {
    /// Build a float32 payload from decoded arrays.
    pub fn from_components(shape: [usize; 3], u: &[f32], v: &[f32], w: &[f32]) -> Self {
        Self {
            shape: shape.iter().map(|&d| d as i64).collect(),
            dtype: EXPECTED_DTYPE.to_string(),
            u: Bytes::from(f32_to_bytes(u)),
            v: Bytes::from(f32_to_bytes(v)),
            w: Bytes::from(f32_to_bytes(w)),
        }
    }

    /// Deserialize a response body.
    pub fn from_msgpack(body: &[u8]) -> FieldResult<Self> {
        rmp_serde::from_slice(body).map_err(|e| FieldError::decode(e.to_string()))
    }

    /// Serialize as a named-field MessagePack map, the layout the server emits.
    pub fn to_msgpack(&self) -> FieldResult<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| FieldError::decode(e.to_string()))
    }

    /// Convert the raw buffers into a validated [`DecodedField`].
    pub fn decode(self) -> FieldResult<DecodedField> {
        if self.dtype != EXPECTED_DTYPE {
            warn!(dtype = %self.dtype, "Unexpected dtype tag, decoding as float32");
        }

        let shape = GridShape::from_dims(&self.shape)?;
        let u = bytes_to_f32(&self.u, "u")?;
        let v = bytes_to_f32(&self.v, "v")?;
        let w = bytes_to_f32(&self.w, "w")?;

        debug!(
            shape = %shape,
            u0 = ?u.first(),
            v0 = ?v.first(),
            w0 = ?w.first(),
            "Decoded velocity payload"
        );

        DecodedField::new(shape, u, v, w)
    }
}

/// Reinterpret a byte buffer as native-endian `f32` values.
///
/// The buffer must be a whole number of 4-byte groups; no byte swapping or
/// value conversion is applied.
pub fn bytes_to_f32(bytes: &[u8], component: &str) -> FieldResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(FieldError::decode(format!(
            "{} buffer length {} is not a multiple of 4",
            component,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Inverse of [`bytes_to_f32`].
pub fn f32_to_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_f32_rejects_partial_group() {
        let err = bytes_to_f32(&[0, 0, 128, 63, 1], "u").unwrap_err();
        assert!(matches!(err, FieldError::Decode(_)));
        assert!(err.to_string().contains("u buffer length 5"));
    }

    #[test]
    fn test_bytes_to_f32_empty() {
        assert!(bytes_to_f32(&[], "w").unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let values = [
            0.0f32,
            -0.0,
            1.5,
            f32::MIN_POSITIVE,
            f32::MAX,
            f32::INFINITY,
            f32::from_bits(0x7fc0_0001),
        ];
        let decoded = bytes_to_f32(&f32_to_bytes(&values), "u").unwrap();
        let original_bits: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        let decoded_bits: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
        assert_eq!(original_bits, decoded_bits);
    }

    #[test]
    fn test_decode_wrong_component_length_is_shape_error() {
        let mut payload =
            RawPayload::from_components([1, 2, 2], &[1.0; 4], &[0.0; 4], &[0.0; 4]);
        payload.w = Bytes::from(f32_to_bytes(&[0.0; 3]));

        let err = payload.decode().unwrap_err();
        assert!(matches!(err, FieldError::Shape(_)));
    }

    #[test]
    fn test_decode_non_float32_dtype_still_decodes() {
        let mut payload = RawPayload::from_components([1, 1, 1], &[2.0], &[0.0], &[0.0]);
        payload.dtype = "float64".to_string();
        let field = payload.decode().unwrap();
        assert_eq!(field.u(), &[2.0]);
    }
}
