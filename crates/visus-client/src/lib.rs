//! Client side of the Visus array server protocol.
//!
//! ```text
//! QueryDescriptor ──► to_url() ──► ArrayTransport::get()
//!                                        │
//!                                        ▼
//!                     RawPayload::from_msgpack() ──► decode() ──► DecodedField
//! ```
//!
//! The server answers a GET with a MessagePack map holding the grid `shape`,
//! a `dtype` tag, and one raw native-endian `f32` buffer per velocity
//! component (`u_array`, `v_array`, `w_array`).

pub mod client;
pub mod config;
pub mod payload;
pub mod query;
pub mod transport;

pub use client::{decode_body, VisusClient};
pub use config::ClientConfig;
pub use payload::{bytes_to_f32, f32_to_bytes, RawPayload, MSGPACK_CONTENT_TYPE};
pub use query::{AxisRange, QueryDescriptor};
pub use transport::{ArrayTransport, HttpTransport};
