//! Worker-pool execution of upsample jobs off the render thread.
#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use hashbrown::HashSet;
use orogen_geom::{Ellipsoid, Rectangle};
use orogen_tile::{QuantizedMesh, Quadrant};
use orogen_upsample::{UpsampleError, UpsampleRequest, UpsampledTile, upsample};
use rayon::ThreadPoolBuilder;

/// One self-contained, CPU-bound unit of work. The parent tile is shared
/// read-only; the four children of one parent need no coordination.
#[derive(Clone, Debug)]
pub struct UpsampleJob {
    pub job_id: u64,
    pub parent: Arc<QuantizedMesh>,
    pub child_rectangle: Rectangle,
    pub ellipsoid: Ellipsoid,
    pub quadrant: Quadrant,
}

/// Completed job: the full result record or the propagated error, never a
/// partial tile.
#[derive(Debug)]
pub struct JobOut {
    pub job_id: u64,
    pub quadrant: Quadrant,
    pub result: Result<UpsampledTile, UpsampleError>,
    pub t_total_ms: u32,
}

fn process_job(job: UpsampleJob, tx: &Sender<JobOut>) {
    let t_start = Instant::now();
    let request = UpsampleRequest {
        parent: job.parent.as_ref(),
        child_rectangle: job.child_rectangle,
        ellipsoid: job.ellipsoid,
        quadrant: job.quadrant,
    };
    let result = upsample(&request);
    let t_total_ms = t_start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    if let Err(e) = &result {
        log::warn!("upsample job {} failed: {}", job.job_id, e);
    }
    let _ = tx.send(JobOut {
        job_id: job.job_id,
        quadrant: job.quadrant,
        result,
        t_total_ms,
    });
}

/// Job ids waiting in the queue, plus the subset marked for discard. Both
/// sets shrink when a worker dequeues the job, so neither outlives the
/// queue contents.
#[derive(Default)]
struct CancelLedger {
    pending: HashSet<u64>,
    cancelled: HashSet<u64>,
}

/// Queues upsample jobs onto a fixed worker pool and hands results back over
/// a channel. Backpressure is the caller's job: bound submissions against
/// [`Runtime::queued`] + [`Runtime::inflight`].
pub struct Runtime {
    job_tx: Sender<UpsampleJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<rayon::ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    ledger: Arc<Mutex<CancelLedger>>,
    pub workers: usize,
}

impl Runtime {
    /// Spawns `workers` threads, defaulting to available parallelism minus
    /// one so the submitting (render) thread keeps a core.
    pub fn new(workers: Option<usize>) -> Self {
        let workers = workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        });

        let (job_tx, job_rx) = unbounded::<UpsampleJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        let ledger = Arc::new(Mutex::new(CancelLedger::default()));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("orogen-upsample-{i}"))
                .build()
                .expect("upsample pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            let ledger = ledger.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    let was_cancelled = ledger
                        .lock()
                        .map(|mut ledger| {
                            ledger.pending.remove(&job.job_id);
                            ledger.cancelled.remove(&job.job_id)
                        })
                        .unwrap_or(false);
                    if was_cancelled {
                        log::debug!("dropping cancelled upsample job {}", job.job_id);
                        continue;
                    }
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_job(job, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            ledger,
            workers,
        }
    }

    pub fn submit(&self, job: UpsampleJob) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.pending.insert(job.job_id);
        }
        self.queued.fetch_add(1, Ordering::Relaxed);
        let _ = self.job_tx.send(job);
    }

    /// Marks a job for discard. Only meaningful while the job is still
    /// queued; a running or finished job's id is ignored, so stale cancels
    /// never bleed into a later job reusing the id.
    pub fn cancel(&self, job_id: u64) {
        if let Ok(mut ledger) = self.ledger.lock() {
            if ledger.pending.contains(&job_id) {
                ledger.cancelled.insert(job_id);
            }
        }
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Relaxed)
    }

    pub fn try_recv(&self) -> Option<JobOut> {
        self.res_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<JobOut> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(out) => Some(out),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
