//! Request orchestration between the UI, the array server and the renderer.
//!
//! ```text
//! UI ──request(query)──► Pipeline
//!                          │  loading = true
//!                          ├─► VisusClient::fetch_raw      (async, only await point)
//!                          ├─► spawn_blocking(decode + build)
//!                          ├─► publish if newest generation
//!                          │  loading = false
//!                          ▼
//!                 watch::Receiver<Published> ──► renderer
//! ```

pub mod loading;
pub mod pipeline;

pub use loading::LoadingState;
pub use pipeline::{Pipeline, Published, RunOutcome};
