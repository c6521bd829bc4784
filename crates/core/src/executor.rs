// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel executor: a fixed pool of persistent worker threads, each with
//! its own arena and redactor, processing a batch of lines by contiguous
//! index range.
//!
//! Workers and the caller rendezvous twice per batch, both times over
//! `crossbeam-channel` rendezvous (zero-capacity) channels: a per-worker
//! `Receiver<Dispatch>` that blocks until the next batch (or shutdown) is
//! posted, and a shared `Sender<WorkerAck>` the caller drains once per
//! worker after dispatching. This is one of the synchronization strategies
//! spec.md §9 blesses explicitly ("a generation counter with per-worker
//! acknowledgement... Any of these satisfies the contract"), and it reuses
//! the same `crossbeam-channel` dependency the teacher's own `walker.rs`
//! pulls in for parallel file discovery rather than introducing a bespoke
//! `std::sync::{Mutex, Condvar}` barrier for a single call site.
//!
//! Carries a local `#[allow(unsafe_code)]`: a batch references caller-owned
//! input/output buffers whose lifetime is scoped to a single
//! [`Executor::process`] call, but worker threads are `'static` (spawned
//! once at [`Executor::new`], parked between batches). Bridging that gap
//! means sending raw pointers across the channel rather than borrowed
//! slices. Soundness rests entirely on the rendezvous protocol: `process`
//! never returns (and the slots/out_lengths/outcomes buffers it points at
//! are never dropped or reused) until every dispatched worker has sent its
//! `WorkerAck`, so no worker ever touches a pointer the caller has already
//! invalidated, and no two workers ever touch the same slot.

#![allow(unsafe_code)]

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::error;

use crate::arena::Arena;
use crate::config::{Limits, MAX_AUTO_WORKERS};
use crate::pattern_set::PatternSet;
use crate::redactor::{Redacted, Redactor, Stats};

/// Outcome of processing one line within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The line had no verified matches; `len` bytes of the *input* were
    /// copied verbatim into the caller's output slot.
    Unchanged(usize),
    /// The line was rewritten; `len` bytes of redacted output were written
    /// into the caller's output slot.
    Rewritten(usize),
    /// The line could not be processed (spec.md §7 `OversizedInput`, or the
    /// caller's output buffer was too small to hold even the unchanged
    /// input). No bytes were written to the caller's output slot.
    Rejected,
}

/// One line's worth of raw pointers into caller-owned buffers. Plain data,
/// not a reference, so it can be handed to a `'static` worker thread — see
/// the module doc for the invariant that makes dereferencing it sound.
#[derive(Clone, Copy)]
struct LineSlot {
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
    output_cap: usize,
}

/// Wraps a raw pointer so it can cross the `crossbeam-channel` send
/// boundary. The wrapped pointer is never dereferenced outside the
/// rendezvous window described in the module doc.
struct RawPtr<T>(*mut T);

// SAFETY: see module doc — a `RawPtr` is only ever dereferenced by the one
// worker it was dispatched to, and only while the issuing `process` call is
// still blocked at the done-barrier, so no two threads ever alias the
// pointee and the pointee is never freed out from under a worker.
unsafe impl<T> Send for RawPtr<T> {}

/// A contiguous range of a batch, dispatched to one worker.
struct BatchRange {
    slots: RawPtr<LineSlot>,
    outcomes: RawPtr<ItemOutcome>,
    start: usize,
    end: usize,
}

enum Dispatch {
    Batch(BatchRange),
    ResetStats,
    Shutdown,
}

/// Acknowledgement a worker sends back after finishing a [`Dispatch`].
struct WorkerAck;

/// Coarse-grained data-parallel executor over a pool of persistent worker
/// threads, each holding its own [`Arena`] and [`Redactor`] built against a
/// shared, read-only [`PatternSet`] (spec.md §4.7 / §5).
pub struct Executor {
    dispatch_txs: Vec<Sender<Dispatch>>,
    done_rx: Receiver<WorkerAck>,
    workers: Vec<JoinHandle<()>>,
    worker_stats: Arc<Mutex<Vec<Stats>>>,
    num_workers: usize,
}

impl Executor {
    /// Spin up `num_threads` persistent workers (or, if `0`, the smaller of
    /// the machine's available parallelism and [`MAX_AUTO_WORKERS`]), each
    /// with its own arena-backed [`Redactor`] over `patterns`.
    ///
    /// `patterns` is wrapped in an [`Arc`] and shared read-only across every
    /// worker; it must already be built (spec.md §4.5).
    pub fn new(num_threads: usize, patterns: Arc<PatternSet>, limits: Limits) -> Self {
        let num_workers = if num_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(MAX_AUTO_WORKERS)
        } else {
            num_threads.max(1)
        };

        let (done_tx, done_rx) = bounded::<WorkerAck>(0);
        let worker_stats = Arc::new(Mutex::new(vec![Stats::default(); num_workers]));

        let mut dispatch_txs = Vec::with_capacity(num_workers);
        let mut workers = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let (tx, rx) = bounded::<Dispatch>(0);
            dispatch_txs.push(tx);

            let patterns = Arc::clone(&patterns);
            let limits = limits.clone();
            let done_tx = done_tx.clone();
            let worker_stats = Arc::clone(&worker_stats);

            let handle = std::thread::spawn(move || {
                worker_loop(worker_id, rx, done_tx, patterns, limits, worker_stats);
            });
            workers.push(handle);
        }

        Self {
            dispatch_txs,
            done_rx,
            workers,
            worker_stats,
            num_workers,
        }
    }

    /// Number of persistent worker threads this executor owns.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Process a batch of lines in parallel. `inputs[i]` is redacted into
    /// `outputs[i]`; `outcomes[i]` reports what happened. All three slices
    /// must have equal length, matching spec.md §6's four parallel arrays
    /// (Rust slices carry their own length, so there is no separate
    /// `lengths[]`/`count` parameter).
    ///
    /// Indices are partitioned into contiguous ranges, one per worker
    /// (spec.md §4.7); outputs are written to `outputs[i]` for `inputs[i]`
    /// regardless of which worker handled it or the order workers finish in
    /// (spec.md §8 property 8, batch determinism).
    ///
    /// # Panics
    /// Panics if `inputs`, `outputs`, and `outcomes` have different lengths
    /// — a caller programming error, not a data-dependent failure.
    pub fn process(
        &self,
        inputs: &[&[u8]],
        outputs: &mut [&mut [u8]],
        outcomes: &mut [ItemOutcome],
    ) {
        debug_assert_eq!(inputs.len(), outputs.len(), "inputs/outputs length mismatch");
        debug_assert_eq!(inputs.len(), outcomes.len(), "inputs/outcomes length mismatch");

        let count = inputs.len();
        if count == 0 {
            return;
        }

        let mut slots: Vec<LineSlot> = inputs
            .iter()
            .zip(outputs.iter_mut())
            .map(|(input, output)| LineSlot {
                input_ptr: input.as_ptr(),
                input_len: input.len(),
                output_ptr: output.as_mut_ptr(),
                output_cap: output.len(),
            })
            .collect();

        let active_workers = self.num_workers.min(count);
        let chunk = count.div_ceil(active_workers);

        let mut dispatched = 0usize;
        for worker_id in 0..active_workers {
            let start = worker_id * chunk;
            let end = (start + chunk).min(count);
            if start >= end {
                break;
            }
            let range = BatchRange {
                slots: RawPtr(slots.as_mut_ptr()),
                outcomes: RawPtr(outcomes.as_mut_ptr()),
                start,
                end,
            };
            // A zero-capacity `crossbeam-channel` send blocks until the
            // worker's `recv` takes it — this is the batch start barrier.
            if self.dispatch_txs[worker_id].send(Dispatch::Batch(range)).is_ok() {
                dispatched += 1;
            }
        }

        for _ in 0..dispatched {
            // The done barrier: block until every dispatched worker has
            // finished its range and sent its acknowledgement.
            let _ = self.done_rx.recv();
        }
    }

    /// Snapshot of counters summed across every worker (spec.md §5: reads
    /// are "stop-the-world (between batches)" — call this only when no
    /// batch is in flight).
    pub fn stats(&self) -> Stats {
        let guard = self.worker_stats.lock().unwrap_or_else(|e| e.into_inner());
        let mut total = Stats::default();
        for s in guard.iter() {
            total.merge(s);
        }
        total
    }

    /// Reset every worker's counters to zero.
    pub fn reset_stats(&self) {
        let mut acked = 0usize;
        for tx in &self.dispatch_txs {
            if tx.send(Dispatch::ResetStats).is_ok() {
                acked += 1;
            }
        }
        for _ in 0..acked {
            let _ = self.done_rx.recv();
        }
    }
}

impl Drop for Executor {
    /// Trip the shutdown barrier and join every worker thread, replacing
    /// the spec's explicit `parallel_destroy` (spec.md §6).
    fn drop(&mut self) {
        for tx in &self.dispatch_txs {
            let _ = tx.send(Dispatch::Shutdown);
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Body of one persistent worker thread: build an arena-backed redactor
/// once, then loop on dispatch messages until shutdown.
fn worker_loop(
    worker_id: usize,
    rx: Receiver<Dispatch>,
    done_tx: Sender<WorkerAck>,
    patterns: Arc<PatternSet>,
    limits: Limits,
    worker_stats: Arc<Mutex<Vec<Stats>>>,
) {
    let arena = Arena::new(limits.output_capacity + 64);
    let mut redactor = match arena.alloc(limits.output_capacity) {
        Ok(buf) => Some(Redactor::new(&patterns, buf, limits.clone())),
        Err(err) => {
            error!(worker_id, %err, "worker failed to allocate its output buffer; every job this worker receives will be rejected");
            None
        }
    };

    for msg in rx.iter() {
        match msg {
            Dispatch::Batch(range) => {
                let len = range.end - range.start;
                // SAFETY: see the module doc. `range.slots`/`range.outcomes`
                // point into buffers owned by the in-flight `process` call,
                // which is blocked at the done barrier until this worker's
                // `WorkerAck` arrives. `[start, end)` is disjoint from every
                // other worker's range this batch, and offsetting each
                // pointer by `start` before slicing means no two workers
                // ever construct overlapping `&mut` slices over the same
                // memory, even though they share one underlying allocation.
                let slots = unsafe {
                    std::slice::from_raw_parts(range.slots.0.add(range.start), len)
                };
                let outcomes = unsafe {
                    std::slice::from_raw_parts_mut(range.outcomes.0.add(range.start), len)
                };

                for (slot, outcome) in slots.iter().zip(outcomes.iter_mut()) {
                    // SAFETY: `slot.input_ptr`/`slot.output_ptr` were taken
                    // from live caller slices by `Executor::process` and
                    // remain valid for the same reason as above.
                    let input = unsafe {
                        std::slice::from_raw_parts(slot.input_ptr, slot.input_len)
                    };
                    let output = unsafe {
                        std::slice::from_raw_parts_mut(slot.output_ptr, slot.output_cap)
                    };

                    *outcome = process_one(redactor.as_mut(), input, output);
                }

                let snapshot = redactor.as_ref().map(Redactor::stats).unwrap_or_default();
                if let Ok(mut guard) = worker_stats.lock() {
                    if let Some(slot) = guard.get_mut(worker_id) {
                        *slot = snapshot;
                    }
                }
                let _ = done_tx.send(WorkerAck);
            }
            Dispatch::ResetStats => {
                if let Some(r) = redactor.as_mut() {
                    r.reset_stats();
                }
                if let Ok(mut guard) = worker_stats.lock() {
                    if let Some(slot) = guard.get_mut(worker_id) {
                        *slot = Stats::default();
                    }
                }
                let _ = done_tx.send(WorkerAck);
            }
            Dispatch::Shutdown => break,
        }
    }
}

/// Process one line with `redactor` (if the worker has one — see
/// [`worker_loop`]'s allocation-failure fallback) and copy the result into
/// the caller's output slot, reporting what happened.
fn process_one(
    redactor: Option<&mut Redactor<'_, '_>>,
    input: &[u8],
    output: &mut [u8],
) -> ItemOutcome {
    let Some(redactor) = redactor else {
        return ItemOutcome::Rejected;
    };

    match redactor.process(input) {
        Ok(Redacted::Unchanged) => {
            if input.len() > output.len() {
                return ItemOutcome::Rejected;
            }
            output[..input.len()].copy_from_slice(input);
            ItemOutcome::Unchanged(input.len())
        }
        Ok(Redacted::Rewritten(bytes)) => {
            if bytes.len() > output.len() {
                return ItemOutcome::Rejected;
            }
            output[..bytes.len()].copy_from_slice(bytes);
            ItemOutcome::Rewritten(bytes.len())
        }
        Err(_) => ItemOutcome::Rejected,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
