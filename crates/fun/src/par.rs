//! Ordered parallel map over a bounded worker pool.
//!
//! Output slots are allocated up front, one per input index. A producer
//! feeds indices through a bounded channel; each worker takes an index,
//! computes `f(xs[index])` and writes that slot only. The call returns once
//! every worker has exited, so the pool never outlives the borrow of `xs`.
//!
//! On failure the pool stops early: the producer stops enqueueing, workers
//! drain the remaining queued indices without calling `f`, and calls already
//! in flight run to completion. Of the errors observed, the one with the
//! lowest index is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;

use crate::seq::infallible;

/// Worker count used when none is given: the machine's logical CPUs.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Pool sizing for [`par_map_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParConfig {
    /// Maximum concurrent workers. Values below 1 are treated as 1.
    pub workers: usize,
    /// Capacity of the index queue between producer and workers.
    pub queue_depth: usize,
}

impl Default for ParConfig {
    fn default() -> Self {
        Self::with_workers(default_workers())
    }
}

impl ParConfig {
    /// `workers` workers (at least 1), queue depth to match.
    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            queue_depth: workers,
        }
    }
}

pub fn par_map<A, B>(xs: &[A], f: impl Fn(&A) -> B + Sync) -> Vec<B>
where
    A: Sync,
    B: Send,
{
    par_map_with(xs, &ParConfig::default(), f)
}

pub fn try_par_map<A, B, E>(xs: &[A], f: impl Fn(&A) -> Result<B, E> + Sync) -> Result<Vec<B>, E>
where
    A: Sync,
    B: Send,
    E: Send,
{
    try_par_map_with(xs, &ParConfig::default(), f)
}

/// [`par_map`] with an explicit worker count; 0 is raised to 1.
pub fn par_map_n<A, B>(xs: &[A], workers: usize, f: impl Fn(&A) -> B + Sync) -> Vec<B>
where
    A: Sync,
    B: Send,
{
    par_map_with(xs, &ParConfig::with_workers(workers), f)
}

pub fn try_par_map_n<A, B, E>(
    xs: &[A],
    workers: usize,
    f: impl Fn(&A) -> Result<B, E> + Sync,
) -> Result<Vec<B>, E>
where
    A: Sync,
    B: Send,
    E: Send,
{
    try_par_map_with(xs, &ParConfig::with_workers(workers), f)
}

pub fn par_map_with<A, B>(xs: &[A], config: &ParConfig, f: impl Fn(&A) -> B + Sync) -> Vec<B>
where
    A: Sync,
    B: Send,
{
    infallible(try_par_map_with(xs, config, |x| Ok(f(x))))
}

/// Same output as [`crate::seq::try_map`], computed on up to
/// `config.workers` scoped threads.
pub fn try_par_map_with<A, B, E>(
    xs: &[A],
    config: &ParConfig,
    f: impl Fn(&A) -> Result<B, E> + Sync,
) -> Result<Vec<B>, E>
where
    A: Sync,
    B: Send,
    E: Send,
{
    let len = xs.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    let workers = config.workers.clamp(1, len);
    let queue_depth = config.queue_depth.max(1);
    tracing::debug!(len, workers, queue_depth, "par_map start");

    let slots: Vec<Mutex<Option<B>>> = (0..len).map(|_| Mutex::new(None)).collect();
    let failed = AtomicBool::new(false);
    let first_error: Mutex<Option<(usize, E)>> = Mutex::new(None);
    let (sender, receiver) = mpsc::sync_channel::<usize>(queue_depth);
    let receiver = Mutex::new(receiver);

    let f = &f;
    let slots_ref = &slots;
    let failed_ref = &failed;
    let first_error_ref = &first_error;
    let receiver_ref = &receiver;

    thread::scope(|scope| {
        for worker in 0..workers {
            scope.spawn(move || {
                let mut completed = 0usize;
                loop {
                    // The guard is released at the end of this statement.
                    let next = lock(receiver_ref).recv();
                    let Ok(index) = next else { break };
                    if failed_ref.load(Ordering::Acquire) {
                        continue;
                    }
                    match f(&xs[index]) {
                        Ok(y) => {
                            *lock(&slots_ref[index]) = Some(y);
                            completed += 1;
                        }
                        Err(err) => {
                            failed_ref.store(true, Ordering::Release);
                            let mut first = lock(first_error_ref);
                            if first.as_ref().is_none_or(|(seen, _)| index < *seen) {
                                *first = Some((index, err));
                            }
                        }
                    }
                }
                tracing::trace!(worker, completed, "par_map worker done");
            });
        }

        for index in 0..len {
            if failed.load(Ordering::Acquire) || sender.send(index).is_err() {
                break;
            }
        }
        drop(sender);
    });

    let first_error = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some((index, err)) = first_error {
        tracing::debug!(index, "par_map failed");
        return Err(err);
    }

    Ok(slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .unwrap_or_else(|| unreachable!("par_map slot {index} was never written"))
        })
        .collect())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
