//! The per-request pipeline and atomic batch publication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use field_sampler::{build, BatchSet, BatchSummary, SamplerConfig};
use seaview_common::{ColorRamp, FieldError, FieldResult};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, instrument, warn};
use visus_client::{decode_body, QueryDescriptor, VisusClient};

use crate::loading::LoadingState;

/// Snapshot the renderer reads.
///
/// `generation` is the issuance ticket of the request that produced
/// `batches`; zero means nothing has been published yet.
#[derive(Debug, Clone, Default)]
pub struct Published {
    pub generation: u64,
    pub query: Option<QueryDescriptor>,
    pub batches: Option<Arc<BatchSet>>,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// The run's batches are now the published set.
    Published { generation: u64, summary: BatchSummary },
    /// A newer request published first; this result was dropped.
    Superseded { generation: u64 },
}

impl RunOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            RunOutcome::Published { generation, .. } | RunOutcome::Superseded { generation } => {
                *generation
            }
        }
    }
}

/// Fetches, decodes and batches velocity grids, one run per request.
///
/// Runs may overlap. Each takes a generation ticket when issued and only
/// publishes if no newer ticket has published already, so the published set
/// always comes from the most recently issued request that completed.
pub struct Pipeline {
    client: VisusClient,
    sampler: SamplerConfig,
    ramp: Arc<dyn ColorRamp>,
    next_generation: AtomicU64,
    published: watch::Sender<Published>,
    loading: LoadingState,
    /// Last run started through [`Pipeline::replace_request`].
    current: Mutex<Option<AbortHandle>>,
}

impl Pipeline {
    pub fn new(
        client: VisusClient,
        sampler: SamplerConfig,
        ramp: Arc<dyn ColorRamp>,
    ) -> FieldResult<Self> {
        sampler.validate()?;
        let (published, _rx) = watch::channel(Published::default());

        Ok(Self {
            client,
            sampler,
            ramp,
            next_generation: AtomicU64::new(0),
            published,
            loading: LoadingState::new(),
            current: Mutex::new(None),
        })
    }

    /// Receiver for published batch sets.
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.published.subscribe()
    }

    /// Receiver for the loading flag.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Current published snapshot.
    pub fn latest(&self) -> Published {
        self.published.borrow().clone()
    }

    pub fn sampler_config(&self) -> &SamplerConfig {
        &self.sampler
    }

    pub fn client(&self) -> &VisusClient {
        &self.client
    }

    /// Run the pipeline for `query` on a new task.
    pub fn spawn_request(
        self: &Arc<Self>,
        query: QueryDescriptor,
    ) -> JoinHandle<FieldResult<RunOutcome>> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.request(query).await })
    }

    /// Run the pipeline for `query` on a new task, cancelling the run started
    /// by the previous call if it is still in flight.
    ///
    /// The cancelled run stops at its next await point, so periodic callers
    /// never accumulate downloads whose result would be discarded. Aborting a
    /// run that already finished has no effect.
    pub fn replace_request(
        self: &Arc<Self>,
        query: QueryDescriptor,
    ) -> JoinHandle<FieldResult<RunOutcome>> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.take() {
            debug!("Cancelling previous request if still in flight");
            previous.abort();
        }

        let handle = self.spawn_request(query);
        *current = Some(handle.abort_handle());
        handle
    }

    /// Run the pipeline for `query` and wait for it.
    ///
    /// Errors are returned as-is; the published set is left untouched and
    /// the loading flag is cleared either way.
    #[instrument(skip(self), fields(generation))]
    pub async fn request(&self, query: QueryDescriptor) -> FieldResult<RunOutcome> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("generation", generation);

        let _loading = self.loading.begin();
        let start = Instant::now();

        let result = self.run(generation, query).await;

        match &result {
            Ok(RunOutcome::Published { summary, .. }) => info!(
                arrows = summary.arrow_instances,
                land = summary.land_instances,
                max_magnitude = summary.max_magnitude,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Published glyph batches"
            ),
            Ok(RunOutcome::Superseded { .. }) => {
                info!("Discarded result superseded by a newer request")
            }
            Err(e) => warn!(kind = e.kind(), error = %e, "Pipeline run failed"),
        }

        result
    }

    async fn run(&self, generation: u64, query: QueryDescriptor) -> FieldResult<RunOutcome> {
        let body = self.client.fetch_raw(&query).await?;

        if self.is_stale(generation) {
            return Ok(RunOutcome::Superseded { generation });
        }

        let sampler = self.sampler.clone();
        let ramp = Arc::clone(&self.ramp);
        let batches = tokio::task::spawn_blocking(move || -> FieldResult<BatchSet> {
            let field = decode_body(&body)?;
            Ok(build(field, &sampler, ramp.as_ref()))
        })
        .await
        .map_err(|e| FieldError::Task(e.to_string()))??;

        Ok(self.publish(generation, query, batches))
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.published.borrow().generation > generation
    }

    fn publish(&self, generation: u64, query: QueryDescriptor, batches: BatchSet) -> RunOutcome {
        let summary = batches.summary();
        let batches = Arc::new(batches);

        let replaced = self.published.send_if_modified(|current| {
            if generation > current.generation {
                *current = Published {
                    generation,
                    query: Some(query),
                    batches: Some(batches),
                };
                true
            } else {
                false
            }
        });

        if replaced {
            RunOutcome::Published {
                generation,
                summary,
            }
        } else {
            RunOutcome::Superseded { generation }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("client", &self.client)
            .field("sampler", &self.sampler)
            .field("next_generation", &self.next_generation)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}
