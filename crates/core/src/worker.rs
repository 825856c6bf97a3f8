//! Range scanner run by each search thread

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::params::COUNTER_FLUSH_INTERVAL;
use crate::search::SearchParams;
use crate::selector::{selector, Selector};
use crate::space::Partition;

/// Shared "collision found" flag
///
/// Starts cleared and is set at most once. Cloning hands out another handle
/// to the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Set the flag; returns true only for the caller that flipped it
    pub fn try_set(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// A candidate whose selector matches the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// Full colliding signature (prefix + body + suffix)
    pub candidate: String,
    pub selector: Selector,
    pub target_signature: Option<String>,
    pub target_selector: Selector,
    /// Body length the candidate was found at
    pub length: usize,
    /// Body index within that length
    pub index: u128,
}

/// What a worker did with its partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Candidates hashed (self-matches excluded)
    pub hashed: u64,
    /// Set only for the worker that won the stop flag
    pub collision: Option<Collision>,
}

/// Scan `partition` of the length-`length` space
///
/// Checks `stop` before every candidate and bails out silently once another
/// worker has claimed it. Hashed counts are added to `counter` in batches.
pub fn scan(
    worker_id: usize,
    params: &SearchParams,
    length: usize,
    partition: Partition,
    stop: &StopFlag,
    counter: &AtomicU64,
) -> WorkerReport {
    let target = params.target();
    let target_selector = target.selector();
    let prefix = params.prefix().as_bytes();
    let suffix = params.suffix().as_bytes();

    // prefix || body || suffix, body rewritten in place per index
    let mut candidate = Vec::with_capacity(prefix.len() + length + suffix.len());
    candidate.extend_from_slice(prefix);
    candidate.resize(prefix.len() + length, 0);
    candidate.extend_from_slice(suffix);
    let body = prefix.len()..prefix.len() + length;

    debug!(
        "worker {}: length {} range [{}, {})",
        worker_id, length, partition.start, partition.end
    );

    let mut report = WorkerReport::default();
    let mut pending: u64 = 0;

    for index in partition.range() {
        if stop.is_set() {
            debug!("worker {}: stopped at index {}", worker_id, index);
            break;
        }

        params
            .alphabet()
            .encode_into(index, &mut candidate[body.clone()]);

        if target.is_self(&candidate) {
            continue;
        }

        let sel = selector(&candidate);
        report.hashed += 1;
        pending += 1;
        if pending == COUNTER_FLUSH_INTERVAL {
            counter.fetch_add(pending, Ordering::Relaxed);
            pending = 0;
        }

        if sel == target_selector {
            if stop.try_set() {
                let found = String::from_utf8_lossy(&candidate).into_owned();
                info!("worker {}: collision {} -> {}", worker_id, found, sel);
                report.collision = Some(Collision {
                    candidate: found,
                    selector: sel,
                    target_signature: target.signature().map(str::to_string),
                    target_selector,
                    length,
                    index,
                });
            }
            break;
        }
    }

    counter.fetch_add(pending, Ordering::Relaxed);
    report
}
