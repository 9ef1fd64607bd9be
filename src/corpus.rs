use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use flate2::read::MultiGzDecoder;
use crate::vocab::VocabBuilder;


const READ_CHUNK_SIZE: usize = 64 * 1024;


pub fn is_gz(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str) == Some("gz")
}

/// Opens a one-token-per-line corpus, decompressing `.gz` files on the fly.
pub fn open_corpus(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gz(path) {
        Ok(Box::new(BufReader::with_capacity(READ_CHUNK_SIZE, MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_CHUNK_SIZE, file)))
    }
}


/// Strips the line terminator and lower-cases the line in place. Returns
/// `false` for lines that are empty or contain anything but ASCII letters.
pub fn normalize(line: &mut Vec<u8>) -> bool {
    while let Some(b'\n') | Some(b'\r') = line.last() {
        line.pop();
    }
    if line.is_empty() || !line.iter().all(u8::is_ascii_alphabetic) {
        return false;
    }
    line.make_ascii_lowercase();
    true
}


pub struct TokenReader<R: BufRead> {
    buf_read: R,
    line_buf: Vec<u8>,
    pub rejected: u64,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(buf_read: R) -> TokenReader<R> {
        TokenReader {
            buf_read,
            line_buf: Vec::with_capacity(64),
            rejected: 0,
        }
    }

    /// Hands the next accepted token to `proc_token`, skipping rejected
    /// lines. `Ok(None)` at end of input.
    pub fn next_token<T, F: FnOnce(&[u8]) -> T>(&mut self, proc_token: F) -> io::Result<Option<T>> {
        loop {
            self.line_buf.clear();
            let read = self.buf_read.read_until(b'\n', &mut self.line_buf)?;
            if read == 0 {
                return Ok(None);
            } else if normalize(&mut self.line_buf) {
                return Ok(Some(proc_token(self.line_buf.as_slice())));
            }
            self.rejected += 1;
        }
    }
}


/// Feeds every accepted token of `reader` into `vocab`. Returns the number of
/// rejected lines.
pub fn read_tokens<R: BufRead>(reader: R, vocab: &mut VocabBuilder) -> io::Result<u64> {
    let mut tokens = TokenReader::new(reader);
    while tokens.next_token(|tok| vocab.add(tok))?.is_some() {}
    Ok(tokens.rejected)
}
