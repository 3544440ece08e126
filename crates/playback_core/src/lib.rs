use std::sync::Arc;

use reqwest::Client;
use shared::{
    domain::{is_valid_array_size, Algorithm, AlgorithmDetails, Speed, DEFAULT_ARRAY_SIZE},
    protocol::{SortResult, SortStep},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod events;
pub mod source;
pub mod trace;

pub use config::{load_settings, ArraySourceKind, Settings};
pub use error::{Operation, PlaybackError};
pub use events::{Frame, Highlights, PlaybackEvent};
pub use source::{ArraySource, LocalArraySource, RemoteArraySource};
pub use trace::{HttpSortTraceProvider, MissingSortTraceProvider, SortTraceProvider};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Initial selections of a freshly built controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackDefaults {
    pub algorithm: Algorithm,
    pub array_size: usize,
    pub speed: Speed,
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            array_size: DEFAULT_ARRAY_SIZE,
            speed: Speed::default(),
        }
    }
}

impl From<&Settings> for PlaybackDefaults {
    fn from(settings: &Settings) -> Self {
        Self {
            algorithm: settings.algorithm,
            array_size: settings.array_size,
            speed: settings.speed,
        }
    }
}

/// How a call to [`PlaybackController::start_or_resume`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    NotStarted,
    Aborted(PlaybackError),
    /// An animation loop was still running and picked the resume up.
    Resumed,
    Paused {
        at: usize,
    },
    Finished,
    /// A reset discarded the trace this loop was animating.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub algorithm: Algorithm,
    pub array_size: usize,
    pub array: Vec<u32>,
    pub highlights: Highlights,
    pub current_step: Option<usize>,
    pub trace_len: Option<usize>,
    pub trace_name: Option<String>,
    pub is_playing: bool,
    pub is_loading: bool,
    pub speed: Speed,
}

#[derive(Debug)]
struct Trace {
    steps: Vec<SortStep>,
    name: Option<String>,
}

struct PlaybackState {
    algorithm: Algorithm,
    array_size: usize,
    array: Vec<u32>,
    highlights: Highlights,
    trace: Option<Arc<Trace>>,
    current_step: Option<usize>,
    is_playing: bool,
    is_loading: bool,
    speed: Speed,
    // Bumped by every reset; loops and trace requests started under an older
    // epoch drop their results.
    epoch: u64,
    loop_epoch: Option<u64>,
    // Bumped whenever the array is replaced or a regeneration starts, so an
    // older source response cannot overwrite a newer array.
    array_generation: u64,
}

impl PlaybackState {
    fn new(defaults: PlaybackDefaults) -> Self {
        Self {
            algorithm: defaults.algorithm,
            array_size: defaults.array_size,
            array: Vec::new(),
            highlights: Highlights::default(),
            trace: None,
            current_step: None,
            is_playing: false,
            is_loading: false,
            speed: defaults.speed,
            epoch: 0,
            loop_epoch: None,
            array_generation: 0,
        }
    }

    fn reset_highlights(&mut self) {
        self.highlights.clear();
    }

    fn reset_visualization(&mut self) {
        self.reset_highlights();
        self.trace = None;
        self.current_step = None;
        self.is_playing = false;
        self.is_loading = false;
        self.epoch += 1;
    }
}

pub struct PlaybackController {
    array_source: Arc<dyn ArraySource>,
    trace_provider: Arc<dyn SortTraceProvider>,
    inner: Mutex<PlaybackState>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackController {
    pub fn new(array_source: Arc<dyn ArraySource>) -> Arc<Self> {
        Self::new_with_dependencies(
            array_source,
            Arc::new(MissingSortTraceProvider),
            PlaybackDefaults::default(),
        )
    }

    pub fn new_with_dependencies(
        array_source: Arc<dyn ArraySource>,
        trace_provider: Arc<dyn SortTraceProvider>,
        defaults: PlaybackDefaults,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            array_source,
            trace_provider,
            inner: Mutex::new(PlaybackState::new(defaults)),
            events,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<Self>> {
        let http = Client::new();
        let array_source: Arc<dyn ArraySource> = match settings.array_source {
            ArraySourceKind::Remote => Arc::new(RemoteArraySource::with_client(
                http.clone(),
                settings.generate_url()?,
            )),
            ArraySourceKind::Local => Arc::new(LocalArraySource),
        };
        let trace_provider = Arc::new(HttpSortTraceProvider::with_client(
            http,
            settings.sort_url()?,
        ));
        Ok(Self::new_with_dependencies(
            array_source,
            trace_provider,
            PlaybackDefaults::from(settings),
        ))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: PlaybackEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let guard = self.inner.lock().await;
        PlaybackSnapshot {
            algorithm: guard.algorithm,
            array_size: guard.array_size,
            array: guard.array.clone(),
            highlights: guard.highlights.clone(),
            current_step: guard.current_step,
            trace_len: guard.trace.as_ref().map(|trace| trace.steps.len()),
            trace_name: guard.trace.as_ref().and_then(|trace| trace.name.clone()),
            is_playing: guard.is_playing,
            is_loading: guard.is_loading,
            speed: guard.speed,
        }
    }

    pub async fn algorithm_details(&self) -> &'static AlgorithmDetails {
        self.inner.lock().await.algorithm.details()
    }

    /// Selecting a different algorithm invalidates the trace and resets the
    /// visualization before returning.
    pub async fn set_algorithm(&self, algorithm: Algorithm) {
        let previous = {
            let mut guard = self.inner.lock().await;
            if guard.algorithm == algorithm {
                return;
            }
            let previous = guard.algorithm;
            guard.algorithm = algorithm;
            guard.reset_visualization();
            previous
        };
        info!(from = %previous, to = %algorithm, "playback: algorithm changed");
        self.publish(PlaybackEvent::AlgorithmChanged { algorithm });
    }

    pub async fn set_speed(&self, speed: u8) -> Speed {
        let speed = Speed::new(speed);
        self.inner.lock().await.speed = speed;
        debug!(speed = speed.get(), "playback: speed changed");
        speed
    }

    /// Takes effect when the running loop reaches its next step boundary.
    pub async fn pause(&self) {
        self.inner.lock().await.is_playing = false;
        debug!("playback: pause requested");
    }

    pub async fn reset_highlights(&self) {
        self.inner.lock().await.reset_highlights();
    }

    pub async fn reset_visualization(&self) {
        self.inner.lock().await.reset_visualization();
    }

    pub async fn initialize(&self) {
        let size = self.inner.lock().await.array_size;
        self.regenerate(size).await;
    }

    pub async fn regenerate(&self, size: usize) {
        if !is_valid_array_size(size) {
            {
                let mut guard = self.inner.lock().await;
                guard.array.clear();
                guard.array_generation += 1;
                guard.reset_visualization();
            }
            warn!(size, "playback: array size out of range, clearing array");
            self.publish(PlaybackEvent::ArrayCleared);
            self.publish(PlaybackEvent::OperationFailed {
                operation: Operation::Regenerate,
                error: PlaybackError::InvalidArraySize { size },
            });
            return;
        }

        let generation = {
            let mut guard = self.inner.lock().await;
            guard.array_size = size;
            guard.array_generation += 1;
            guard.array_generation
        };
        match self.array_source.generate(size).await {
            Ok(array) => {
                if !self.install_array(array, Some(generation)).await {
                    debug!(size, "playback: discarding array from a stale regeneration");
                }
            }
            Err(err) => {
                warn!(size, "source: array generation failed: {err:#}");
                self.publish(PlaybackEvent::OperationFailed {
                    operation: Operation::Regenerate,
                    error: PlaybackError::ArraySource(format!("{err:#}")),
                });
            }
        }
    }

    pub async fn load_array(&self, array: Vec<u32>) {
        self.install_array(array, None).await;
    }

    /// With `expected` set, installs only if no newer array request started.
    async fn install_array(&self, array: Vec<u32>, expected: Option<u64>) -> bool {
        let len = array.len();
        {
            let mut guard = self.inner.lock().await;
            match expected {
                Some(generation) if generation != guard.array_generation => return false,
                Some(_) => {}
                None => guard.array_generation += 1,
            }
            guard.array = array;
            guard.reset_visualization();
        }
        info!(len, "playback: array replaced");
        self.publish(PlaybackEvent::ArrayReplaced { len });
        true
    }

    /// Returns the step count of the stored trace.
    pub async fn request_trace(&self) -> Result<usize, PlaybackError> {
        let (array, algorithm, epoch) = {
            let mut guard = self.inner.lock().await;
            if guard.array.is_empty() {
                return Err(PlaybackError::EmptyArray);
            }
            guard.reset_visualization();
            guard.is_loading = true;
            (guard.array.clone(), guard.algorithm, guard.epoch)
        };

        let fetched = self.trace_provider.fetch_trace(&array, algorithm).await;

        let mut guard = self.inner.lock().await;
        if guard.epoch != epoch {
            debug!(%algorithm, "playback: discarding trace for a stale request");
            return Err(PlaybackError::Superseded);
        }
        guard.is_loading = false;

        let checked = fetched
            .map_err(|err| PlaybackError::TraceRequest(format!("{err:#}")))
            .and_then(|result| checked_trace(result, array.len()));
        match checked {
            Ok(trace) => {
                let steps = trace.steps.len();
                let name = trace.name.clone();
                guard.trace = Some(Arc::new(trace));
                guard.current_step = None;
                drop(guard);

                info!(%algorithm, steps, "playback: sort trace loaded");
                self.publish(PlaybackEvent::TraceLoaded {
                    algorithm,
                    steps,
                    name,
                });
                Ok(steps)
            }
            Err(error) => {
                drop(guard);
                warn!(%algorithm, "playback: sort trace unavailable: {error}");
                self.publish(PlaybackEvent::OperationFailed {
                    operation: Operation::RequestTrace,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Starts playback, fetching a trace first if none is loaded, and drives
    /// the animation until it pauses, finishes, or is reset.
    pub async fn start_or_resume(&self) -> PlaybackOutcome {
        let needs_trace = {
            let guard = self.inner.lock().await;
            if guard.array.is_empty() {
                debug!("playback: nothing to play, no array loaded");
                return PlaybackOutcome::NotStarted;
            }
            guard.trace.is_none()
        };

        if needs_trace {
            if let Err(error) = self.request_trace().await {
                if error != PlaybackError::Superseded {
                    self.publish(PlaybackEvent::OperationFailed {
                        operation: Operation::StartPlayback,
                        error: error.clone(),
                    });
                }
                return PlaybackOutcome::Aborted(error);
            }
        }

        let epoch = {
            let mut guard = self.inner.lock().await;
            if guard.trace.is_none() {
                return PlaybackOutcome::Aborted(PlaybackError::Superseded);
            }
            guard.is_playing = true;
            if guard.loop_epoch == Some(guard.epoch) {
                debug!("playback: resumed inside the running loop");
                return PlaybackOutcome::Resumed;
            }
            guard.loop_epoch = Some(guard.epoch);
            guard.epoch
        };

        info!("playback: started");
        self.run_loop(epoch).await
    }

    pub fn spawn_playback(self: &Arc<Self>) -> JoinHandle<PlaybackOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.start_or_resume().await })
    }

    async fn run_loop(&self, epoch: u64) -> PlaybackOutcome {
        let (trace, start) = {
            let mut guard = self.inner.lock().await;
            if guard.epoch != epoch {
                return PlaybackOutcome::Superseded;
            }
            let Some(trace) = guard.trace.clone() else {
                guard.loop_epoch = None;
                guard.is_playing = false;
                return PlaybackOutcome::Superseded;
            };
            let start = match guard.current_step {
                Some(step) => step,
                None => {
                    guard.reset_highlights();
                    0
                }
            };
            (trace, start)
        };

        for index in start..trace.steps.len() {
            let delay = {
                let mut guard = self.inner.lock().await;
                if guard.epoch != epoch {
                    debug!(step = index, "playback: loop superseded by reset");
                    return PlaybackOutcome::Superseded;
                }
                if !guard.is_playing {
                    guard.current_step = Some(index);
                    guard.loop_epoch = None;
                    drop(guard);
                    info!(at = index, "playback: paused");
                    self.publish(PlaybackEvent::Paused { at: index });
                    return PlaybackOutcome::Paused { at: index };
                }

                let step = &trace.steps[index];
                guard.current_step = Some(index);
                guard.array = step.array.clone();
                guard.highlights = Highlights {
                    comparing: step.comparing.clone(),
                    swapping: step.swapping.clone(),
                    sorted: step.sorted.clone(),
                };
                let frame = Frame {
                    step: index,
                    array: guard.array.clone(),
                    highlights: guard.highlights.clone(),
                };
                let delay = guard.speed.step_delay();
                drop(guard);

                debug!(step = index, "playback: frame applied");
                self.publish(PlaybackEvent::Frame(frame));
                delay
            };
            sleep(delay).await;
        }

        let mut guard = self.inner.lock().await;
        if guard.epoch != epoch {
            return PlaybackOutcome::Superseded;
        }
        guard.loop_epoch = None;

        if !guard.is_playing {
            // Paused during the last delay: the final frame stays on screen.
            let at = trace.steps.len() - 1;
            drop(guard);
            info!(at, "playback: paused");
            self.publish(PlaybackEvent::Paused { at });
            return PlaybackOutcome::Paused { at };
        }

        let sorted: Vec<usize> = (0..guard.array.len()).collect();
        guard.is_playing = false;
        guard.current_step = None;
        guard.highlights = Highlights {
            sorted: sorted.clone(),
            ..Highlights::default()
        };
        drop(guard);

        info!(steps = trace.steps.len(), "playback: finished");
        self.publish(PlaybackEvent::Finished { sorted });
        PlaybackOutcome::Finished
    }
}

fn checked_trace(result: SortResult, len: usize) -> Result<Trace, PlaybackError> {
    if result.steps.is_empty() {
        return Err(PlaybackError::EmptyTrace);
    }
    for (step, snapshot) in result.steps.iter().enumerate() {
        snapshot
            .check_bounds(len)
            .map_err(|source| PlaybackError::MalformedTrace { step, source })?;
    }
    Ok(Trace {
        steps: result.steps,
        name: result.name,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
