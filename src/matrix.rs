use std::ops::Range;
use indicatif::ProgressBar;
use log::debug;
use parking_lot::Mutex;
use crate::parallel::{partition, run_pool, run_rayon};
use crate::settings::{Settings, Strategy, WindowMode};
use crate::types::{Chunk, Row};


/// Shared co-occurrence counts with one lock per row. Rows are sized from the
/// vocabulary up front and never added afterwards.
pub struct CoocMatrix {
    rows: Vec<Mutex<Row>>,
}

impl CoocMatrix {
    pub fn new(vocab_len: usize) -> CoocMatrix {
        CoocMatrix {
            rows: (0..vocab_len).map(|_| Mutex::new(Row::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Counts the window around every position in `positions`, which are
    /// global indices into `seq`. Only the row of the centre word is locked,
    /// and only while that position's window is being added.
    ///
    /// Counts are `u64`; a single cell would need more than 2^64 window hits
    /// to overflow, which panics rather than wrapping.
    pub fn count_range(&self, seq: &[u32], positions: Range<usize>, radius: usize, window: WindowMode) {
        let last = match seq.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        };
        for i in positions {
            let word = seq[i];
            let lo = i.saturating_sub(radius);
            let hi = usize::min(last, i.saturating_add(radius));
            let mut row = self.rows[word as usize].lock();
            for j in lo..=hi {
                if j == i && window == WindowMode::Exclusive {
                    continue;
                }
                let cnt = row.entry(seq[j]).or_insert(0);
                *cnt = match cnt.checked_add(1) {
                    Some(next) => next,
                    None => panic!("count overflow at ({}, {})", word, seq[j]),
                };
            }
        }
    }

    /// Drops the locks once counting is over; the matrix is read-only from
    /// here on.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_iter().map(|row| row.into_inner()).collect()
    }
}


/// Builds the co-occurrence matrix of `seq` over a vocabulary of `vocab_len`
/// ids, splitting the positions into chunks of `settings.count_chunk_size`.
/// The result does not depend on chunk size, thread count or strategy.
pub fn accumulate(seq: &[u32], vocab_len: usize, settings: &Settings, pb: &ProgressBar) -> Vec<Row> {
    let matrix = CoocMatrix::new(vocab_len);
    let chunks: Vec<Chunk> = partition(seq.len(), settings.count_chunk_size).collect();
    debug!("Counting {} positions in {} chunks", seq.len(), chunks.len());
    pb.set_length(chunks.len() as u64);
    let count_chunk = |(_, positions): &Chunk| {
        matrix.count_range(seq, positions.clone(), settings.window_radius, settings.window);
    };
    match settings.strategy {
        Strategy::Pool => {
            run_pool(chunks, settings.threads, |chunk| {
                count_chunk(chunk);
                chunk.0
            }, |_idx| pb.inc(1));
        },
        Strategy::Rayon => {
            run_rayon(&chunks, settings.threads, |chunk| {
                count_chunk(chunk);
                pb.inc(1);
            });
        },
    }
    matrix.into_rows()
}
