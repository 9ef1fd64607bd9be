use indicatif::ProgressBar;
use itertools::Itertools;
use log::debug;
use crate::parallel::{partition, run_pool, run_rayon};
use crate::settings::{Settings, Strategy};
use crate::types::{Chunk, RenderedChunk, Row};


/// `<col>:<count>` pairs in ascending column order, space separated.
pub fn render_row(row: &Row) -> Vec<u8> {
    row.iter()
        .map(|(col, cnt)| format!("{}:{}", col, cnt))
        .join(" ")
        .into_bytes()
}

fn render_chunk(rows: &[Row], (idx, range): &Chunk) -> RenderedChunk {
    (*idx, rows[range.clone()].iter().map(render_row).collect_vec())
}


/// Puts rendered chunks back into partition order, whatever order they
/// arrive in.
pub struct Reassembler {
    slots: Vec<Option<Vec<Vec<u8>>>>,
}

impl Reassembler {
    pub fn new(total: usize) -> Reassembler {
        Reassembler { slots: vec![None; total] }
    }

    pub fn insert(&mut self, (idx, lines): RenderedChunk) {
        let slot = &mut self.slots[idx];
        assert!(slot.is_none(), "chunk {} reported twice", idx);
        *slot = Some(lines);
    }

    pub fn finish(self) -> Vec<Vec<u8>> {
        self.slots
            .into_iter()
            .enumerate()
            .flat_map(|(idx, slot)| match slot {
                Some(lines) => lines,
                None => panic!("chunk {} never reported", idx),
            })
            .collect()
    }
}


/// Renders every row of the finished matrix, one line per row in row id
/// order, using `settings.render_chunk_size` rows per chunk.
pub fn render(rows: &[Row], settings: &Settings, pb: &ProgressBar) -> Vec<Vec<u8>> {
    let chunks = partition(rows.len(), settings.render_chunk_size).collect_vec();
    debug!("Rendering {} rows in {} chunks", rows.len(), chunks.len());
    pb.set_length(chunks.len() as u64);
    match settings.strategy {
        Strategy::Pool => {
            let mut reassembler = Reassembler::new(chunks.len());
            run_pool(chunks, settings.threads, |chunk| render_chunk(rows, chunk), |rendered| {
                reassembler.insert(rendered);
                pb.inc(1);
            });
            reassembler.finish()
        },
        Strategy::Rayon => {
            run_rayon(&chunks, settings.threads, |chunk| {
                let (_, lines) = render_chunk(rows, chunk);
                pb.inc(1);
                lines
            }).into_iter().flatten().collect()
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::thread_rng;

    fn row(pairs: &[(u32, u64)]) -> Row {
        pairs.iter().copied().collect()
    }

    #[test]
    fn row_format() {
        assert_eq!(render_row(&row(&[(2, 1), (0, 4), (1, 2)])), b"0:4 1:2 2:1".to_vec());
        assert_eq!(render_row(&Row::new()), Vec::<u8>::new());
        assert_eq!(render_row(&row(&[(3, u32::MAX as u64 + 2)])), b"3:4294967297".to_vec());
    }

    #[test]
    fn reassembles_shuffled_completions() {
        let total = 50;
        let mut rendered: Vec<RenderedChunk> = (0..total)
            .map(|idx| (idx, vec![format!("{}a", idx).into_bytes(), format!("{}b", idx).into_bytes()]))
            .collect();
        rendered.shuffle(&mut thread_rng());
        let mut reassembler = Reassembler::new(total);
        for chunk in rendered {
            reassembler.insert(chunk);
        }
        let lines = reassembler.finish();
        assert_eq!(lines.len(), 2 * total);
        for idx in 0..total {
            assert_eq!(lines[2 * idx], format!("{}a", idx).into_bytes());
            assert_eq!(lines[2 * idx + 1], format!("{}b", idx).into_bytes());
        }
    }

    #[test]
    #[should_panic]
    fn missing_chunk_is_fatal() {
        let mut reassembler = Reassembler::new(2);
        reassembler.insert((1, vec![]));
        reassembler.finish();
    }

    #[test]
    #[should_panic]
    fn duplicate_chunk_is_fatal() {
        let mut reassembler = Reassembler::new(2);
        reassembler.insert((0, vec![]));
        reassembler.insert((0, vec![]));
    }

    #[test]
    fn rows_come_back_in_order() {
        let rows: Vec<Row> = (0..1000u32).map(|i| row(&[(i, i as u64 + 1)])).collect();
        for strategy in [Strategy::Pool, Strategy::Rayon] {
            let settings = Settings { render_chunk_size: 7, threads: 8, strategy, ..Settings::default() };
            let lines = render(&rows, &settings, &ProgressBar::hidden());
            assert_eq!(lines.len(), rows.len());
            for (i, line) in lines.iter().enumerate() {
                assert_eq!(line, &format!("{}:{}", i, i + 1).into_bytes());
            }
        }
    }

    #[test]
    fn empty_rows_still_render() {
        let rows = vec![Row::new(), row(&[(0, 1)]), Row::new()];
        let lines = render(&rows, &Settings::default(), &ProgressBar::hidden());
        assert_eq!(lines, vec![Vec::new(), b"0:1".to_vec(), Vec::new()]);
        assert!(render(&[], &Settings::default(), &ProgressBar::hidden()).is_empty());
    }
}
