use std::io::{self, BufRead};
use log::info;
use crate::corpus::read_tokens;
use crate::matrix::accumulate;
use crate::parallel::num_chunks;
use crate::progress::chunk_progress;
use crate::render::render;
use crate::settings::Settings;
use crate::vocab::VocabBuilder;
use crate::writer::{Finish, MatrixWriter};


#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub num_tokens: u64,
    pub rejected: u64,
    pub vocab_len: u64,
    pub num_rows: u64,
    pub num_values: u64,
    pub count_chunks: u64,
    pub render_chunks: u64,
}


/// Reads a one-token-per-line corpus, counts co-occurrences and writes the
/// sparse dump. Nothing is written until both parallel phases are done.
pub fn run<R: BufRead, W: Finish>(input: R, mut writer: MatrixWriter<W>, settings: &Settings) -> io::Result<Summary> {
    let timer = howlong::ProcessCPUTimer::new();
    let mut vocab_builder = VocabBuilder::new();
    let rejected = read_tokens(input, &mut vocab_builder)?;
    let (vocab, seq) = vocab_builder.build();
    info!("Read {} tokens ({} distinct, {} lines rejected) {}", seq.len(), vocab.len(), rejected, timer.elapsed());

    let count_chunks = num_chunks(seq.len(), settings.count_chunk_size) as u64;
    let timer = howlong::ProcessCPUTimer::new();
    let pb = chunk_progress("Counting");
    let rows = accumulate(&seq, vocab.len(), settings, &pb);
    pb.finish_and_clear();
    info!("Built co-occurrence matrix in {} chunks {}", count_chunks, timer.elapsed());

    let render_chunks = num_chunks(rows.len(), settings.render_chunk_size) as u64;
    let timer = howlong::ProcessCPUTimer::new();
    let pb = chunk_progress("Rendering");
    let lines = render(&rows, settings, &pb);
    pb.finish_and_clear();
    info!("Rendered {} rows in {} chunks {}", lines.len(), render_chunks, timer.elapsed());

    let timer = howlong::ProcessCPUTimer::new();
    writer.write_vocab(&vocab)?;
    for line in lines.iter() {
        writer.write_row(line)?;
    }
    let (num_rows, num_values) = writer.close()?;
    info!("Wrote matrix {}", timer.elapsed());

    Ok(Summary {
        num_tokens: seq.len() as u64,
        rejected,
        vocab_len: vocab.len() as u64,
        num_rows,
        num_values,
        count_chunks,
        render_chunks,
    })
}
