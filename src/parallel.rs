use std::panic::resume_unwind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use crossbeam_channel::unbounded;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use crate::queue::CompletionQueue;
use crate::types::Chunk;


// How often a waiting coordinator checks whether a worker died.
const FAILURE_POLL: Duration = Duration::from_millis(50);


pub fn num_chunks(len: usize, chunk_size: usize) -> usize {
    assert!(chunk_size > 0, "chunk size must be positive");
    (len + chunk_size - 1) / chunk_size
}

/// Splits `0..len` into contiguous ranges of at most `chunk_size` indices.
/// Only the last range may be short; `len == 0` gives no ranges.
pub fn partition(len: usize, chunk_size: usize) -> impl ExactSizeIterator<Item=Chunk> {
    let total = num_chunks(len, chunk_size);
    (0..total).map(move |idx| {
        let start = idx * chunk_size;
        (idx, start..usize::min(start + chunk_size, len))
    })
}


/// Raises the shared flag if the owning worker unwinds.
struct FailureGuard<'a>(&'a AtomicBool);

impl<'a> Drop for FailureGuard<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}


/// Pops exactly `total` messages, calling `on_done` for each. Returns early
/// with `false` only when `failed` was raised by a worker that will never
/// report.
///
/// Once the queue is empty this waits with `wait_and_pop_timeout` rather than
/// `wait_and_pop`: a worker that died mid-chunk never pushes, so an untimed
/// wait would block forever instead of noticing `failed`.
pub fn drain<T, F: FnMut(T)>(
    queue: &CompletionQueue<T>,
    total: usize,
    failed: &AtomicBool,
    mut on_done: F
) -> bool {
    let mut received = 0;
    while received < total {
        let msg = match queue.try_pop() {
            Some(msg) => msg,
            None => match queue.wait_and_pop_timeout(FAILURE_POLL) {
                Some(msg) => msg,
                None if failed.load(Ordering::SeqCst) => return false,
                None => continue,
            },
        };
        on_done(msg);
        received += 1;
    }
    true
}


/// Runs `work` over every chunk on a bounded pool of `threads` scoped
/// workers. Workers pull chunks from a shared work queue and push one
/// completion message per chunk; the calling thread hands each message to
/// `on_done` as it arrives, in completion order.
///
/// A panicking worker is re-raised on the calling thread once all workers
/// have been joined.
pub fn run_pool<M, W, F>(chunks: Vec<Chunk>, threads: usize, work: W, on_done: F)
    where M: Send,
          W: Fn(&Chunk) -> M + Sync,
          F: FnMut(M)
{
    let total = chunks.len();
    if total == 0 {
        return;
    }
    let (work_snd, work_rcv) = unbounded();
    for chunk in chunks {
        // Cannot fail, `work_rcv` is alive.
        let _ = work_snd.send(chunk);
    }
    drop(work_snd);

    let done = CompletionQueue::new();
    let failed = AtomicBool::new(false);
    let workers = usize::max(1, usize::min(threads, total));
    let res = crossbeam::scope(|scope| {
        for _ in 0..workers {
            let work_rcv = work_rcv.clone();
            let (work, done, failed) = (&work, &done, &failed);
            scope.spawn(move |_| {
                let _guard = FailureGuard(failed);
                for chunk in work_rcv.iter() {
                    done.push(work(&chunk));
                }
            });
        }
        drain(&done, total, &failed, on_done)
    });
    match res {
        Ok(true) => {},
        Ok(false) => panic!("worker failed without reporting"),
        Err(err) => resume_unwind(err),
    }
}


/// Runs `work` over every chunk with rayon on a dedicated pool of `threads`
/// threads. Results come back in chunk order.
pub fn run_rayon<M, W>(chunks: &[Chunk], threads: usize, work: W) -> Vec<M>
    where M: Send,
          W: Fn(&Chunk) -> M + Sync
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .unwrap_or_else(|e| panic!("could not start {} rayon threads: {}", threads, e));
    pool.install(|| chunks.par_iter().map(&work).collect())
}
