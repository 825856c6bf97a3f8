//! Length-by-length search coordinator
//!
//! For every length from `min_length` to `max_length` the space is split into
//! one partition per worker, each partition is scanned on its own thread, and
//! all threads are joined before the next length starts. The first collision
//! stops every worker and ends the search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::alphabet::Alphabet;
use crate::error::{Result, SearchError};
use crate::params::*;
use crate::selector::Target;
use crate::space::{self, partition};
use crate::worker::{scan, Collision, StopFlag, WorkerReport};

/// Upper bound on how long the progress loop sleeps between checks
const MONITOR_TICK: Duration = Duration::from_millis(20);

/// Everything a search needs, validated by [`Searcher::new`]
#[derive(Debug, Clone)]
pub struct SearchParams {
    alphabet: Alphabet,
    target: Target,
    prefix: String,
    suffix: String,
    min_length: usize,
    max_length: usize,
    workers: usize,
    progress_interval: Option<Duration>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            target: Target::from_signature(DEFAULT_TARGET),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            workers: num_cpus::get(),
            progress_interval: None,
        }
    }
}

impl SearchParams {
    pub fn new(alphabet: Alphabet, target: Target) -> Self {
        Self {
            alphabet,
            target,
            ..Self::default()
        }
    }

    /// Search body lengths `min..=max`
    pub fn with_lengths(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Report progress to the observer every `interval` (None disables)
    pub fn with_progress_interval(mut self, interval: Option<Duration>) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn progress_interval(&self) -> Option<Duration> {
        self.progress_interval
    }

    /// Reject settings that would make the search ill-defined
    ///
    /// The maximum length is checked against the alphabet so that every
    /// length's space size fits in a `u128`.
    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(SearchError::ZeroLength);
        }
        if self.min_length > self.max_length {
            return Err(SearchError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        space::space_size(self.alphabet.len(), self.max_length)?;
        Ok(())
    }
}

/// Periodic snapshot while a length is being scanned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub length: usize,
    pub total: u128,
    /// Candidates hashed so far at this length
    pub hashed: u64,
    /// Time spent on this length
    pub elapsed: Duration,
}

impl Progress {
    pub fn hashrate(&self) -> f64 {
        rate(self.hashed, self.elapsed)
    }
}

/// Result of scanning one length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthSummary {
    pub length: usize,
    pub total: u128,
    pub workers: usize,
    pub hashed: u64,
    pub elapsed: Duration,
    pub found: bool,
}

/// Totals across the whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Number of lengths started
    pub lengths_searched: usize,
    /// Last length started, if any
    pub last_length: Option<usize>,
    pub hashed: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn hashrate(&self) -> f64 {
        rate(self.hashed, self.elapsed)
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        collision: Collision,
        stats: SearchStats,
    },
    Exhausted {
        stats: SearchStats,
    },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn collision(&self) -> Option<&Collision> {
        match self {
            Self::Found { collision, .. } => Some(collision),
            Self::Exhausted { .. } => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            Self::Found { stats, .. } | Self::Exhausted { stats } => stats,
        }
    }
}

/// Hooks for watching a search; every method defaults to doing nothing
pub trait SearchObserver {
    fn on_start(&mut self, _params: &SearchParams) {}

    fn on_length_start(&mut self, _length: usize, _total: u128, _workers: usize) {}

    fn on_progress(&mut self, _progress: &Progress) {}

    fn on_length_finished(&mut self, _summary: &LengthSummary) {}
}

impl SearchObserver for () {}

/// Runs a validated search
#[derive(Debug, Clone)]
pub struct Searcher {
    params: Arc<SearchParams>,
}

impl Searcher {
    pub fn new(params: SearchParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params: Arc::new(params),
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Search every configured length until a collision turns up
    pub fn run<O: SearchObserver + ?Sized>(&self, observer: &mut O) -> Result<SearchOutcome> {
        let params = &self.params;
        let start = Instant::now();
        let stop = StopFlag::new();
        let mut stats = SearchStats::default();

        info!(
            "target selector {} ({}), lengths {}..={}, {} workers",
            params.target().selector(),
            params.target().signature().unwrap_or("<raw selector>"),
            params.min_length(),
            params.max_length(),
            params.workers()
        );
        observer.on_start(params);

        for length in params.min_length()..=params.max_length() {
            let total = params.alphabet().space_size(length)?;
            let partitions = partition(total, params.workers());
            if partitions.len() < params.workers() {
                warn!(
                    "length {}: only {} candidates, using {} of {} workers",
                    length,
                    total,
                    partitions.len(),
                    params.workers()
                );
            }

            let active = partitions.len();
            info!("searching length {} ({} candidates)", length, total);
            observer.on_length_start(length, total, active);
            stats.lengths_searched += 1;
            stats.last_length = Some(length);

            let length_start = Instant::now();
            let counter = Arc::new(AtomicU64::new(0));

            let mut handles = Vec::with_capacity(partitions.len());
            let mut spawn_error = None;
            for (worker_id, part) in partitions.into_iter().enumerate() {
                let worker_params = Arc::clone(&self.params);
                let worker_stop = stop.clone();
                let worker_counter = Arc::clone(&counter);

                let spawned = thread::Builder::new()
                    .name(format!("collider-{}", worker_id))
                    .spawn(move || {
                        scan(
                            worker_id,
                            &worker_params,
                            length,
                            part,
                            &worker_stop,
                            &worker_counter,
                        )
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        // Wind down whatever already started before failing
                        stop.try_set();
                        spawn_error = Some(SearchError::Spawn(e.to_string()));
                        break;
                    }
                }
            }

            if let Some(interval) = params.progress_interval() {
                let mut last_report = Instant::now();
                while !handles.iter().all(|h| h.is_finished()) {
                    thread::sleep(MONITOR_TICK.min(interval));
                    if last_report.elapsed() >= interval {
                        observer.on_progress(&Progress {
                            length,
                            total,
                            hashed: counter.load(Ordering::Relaxed),
                            elapsed: length_start.elapsed(),
                        });
                        last_report = Instant::now();
                    }
                }
            }

            let mut collision = None;
            let mut hashed = 0u64;
            let mut panicked = None;
            for (worker_id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(WorkerReport {
                        hashed: worker_hashed,
                        collision: found,
                    }) => {
                        hashed += worker_hashed;
                        if found.is_some() {
                            collision = found;
                        }
                    }
                    Err(_) => {
                        stop.try_set();
                        panicked.get_or_insert(worker_id);
                    }
                }
            }

            if let Some(err) = spawn_error {
                return Err(err);
            }
            if let Some(worker_id) = panicked {
                return Err(SearchError::WorkerPanicked(worker_id));
            }

            stats.hashed += hashed;
            let summary = LengthSummary {
                length,
                total,
                workers: active,
                hashed,
                elapsed: length_start.elapsed(),
                found: collision.is_some(),
            };
            debug!(
                "length {} done: {} hashed in {:.2}s",
                length,
                hashed,
                summary.elapsed.as_secs_f64()
            );
            observer.on_length_finished(&summary);

            if let Some(collision) = collision {
                stats.elapsed = start.elapsed();
                return Ok(SearchOutcome::Found { collision, stats });
            }
        }

        stats.elapsed = start.elapsed();
        info!("no collision found after {} candidates", stats.hashed);
        Ok(SearchOutcome::Exhausted { stats })
    }
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}
