use std::fs::{create_dir_all, File};
use std::io::prelude::*;
use std::io::{self, BufWriter};
use std::path::Path;
use flate2::write::GzEncoder;
use flate2::Compression;
use crate::corpus::is_gz;
use crate::vocab::Vocab;


/// A sink that needs an explicit final step before it is complete.
pub trait Finish: Write {
    fn finish(self) -> io::Result<()>;
}

impl Finish for Vec<u8> {
    fn finish(self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> Finish for &'a mut W {
    fn finish(self) -> io::Result<()> {
        self.flush()
    }
}


pub enum OutputFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Plain(out) => out.write(buf),
            OutputFile::Gzip(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Plain(out) => out.flush(),
            OutputFile::Gzip(out) => out.flush(),
        }
    }
}

impl Finish for OutputFile {
    fn finish(self) -> io::Result<()> {
        match self {
            OutputFile::Plain(mut out) => out.flush(),
            OutputFile::Gzip(out) => out.finish()?.flush(),
        }
    }
}


/// Flat sparse text dump: a vocabulary line of `<id>:<token>` entries, then
/// one line of `<col>:<count>` entries per row.
pub struct MatrixWriter<W: Finish> {
    out: W,
    num_rows: u64,
    num_values: u64,
}

impl MatrixWriter<OutputFile> {
    /// Creates `out_path` (and its parent directories), gzip compressed when
    /// the name ends in `.gz`.
    pub fn create(out_path: &Path) -> io::Result<MatrixWriter<OutputFile>> {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let file = BufWriter::new(File::create(out_path)?);
        let out = if is_gz(out_path) {
            OutputFile::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            OutputFile::Plain(file)
        };
        Ok(MatrixWriter::new(out))
    }
}

impl<W: Finish> MatrixWriter<W> {
    pub fn new(out: W) -> MatrixWriter<W> {
        MatrixWriter {
            out,
            num_rows: 0,
            num_values: 0,
        }
    }

    pub fn write_vocab(&mut self, vocab: &Vocab) -> io::Result<()> {
        for (idx, word) in vocab.words().enumerate() {
            if idx > 0 {
                self.out.write_all(b" ")?;
            }
            write!(self.out, "{}:", idx)?;
            self.out.write_all(word)?;
        }
        self.out.write_all(b"\n")
    }

    /// Writes one already rendered row.
    pub fn write_row(&mut self, line: &[u8]) -> io::Result<()> {
        self.out.write_all(line)?;
        self.out.write_all(b"\n")?;
        if !line.is_empty() {
            self.num_values += line.iter().filter(|&&b| b == b' ').count() as u64 + 1;
        }
        self.num_rows += 1;
        Ok(())
    }

    /// Flushes and returns the number of rows and non-zero entries written.
    pub fn close(self) -> io::Result<(u64, u64)> {
        self.out.finish()?;
        Ok((self.num_rows, self.num_values))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use flate2::read::GzDecoder;
    use tempfile::tempdir;
    use crate::vocab::VocabBuilder;

    fn vocab(words: &[&str]) -> Vocab {
        let mut builder = VocabBuilder::new();
        for word in words {
            builder.add(word.as_bytes());
        }
        builder.build().0
    }

    #[test]
    fn writes_vocab_and_rows() {
        let mut writer = MatrixWriter::new(Vec::new());
        writer.write_vocab(&vocab(&["a", "b"])).unwrap();
        writer.write_row(b"0:2 1:1").unwrap();
        writer.write_row(b"").unwrap();
        assert_eq!(writer.num_rows, 2);
        assert_eq!(writer.num_values, 2);
        assert_eq!(writer.into_inner(), b"0:a 1:b\n0:2 1:1\n\n".to_vec());
    }

    #[test]
    fn empty_vocab_is_a_blank_line() {
        let mut writer = MatrixWriter::new(Vec::new());
        writer.write_vocab(&vocab(&[])).unwrap();
        assert_eq!(writer.into_inner(), b"\n".to_vec());
    }

    #[test]
    fn gzipped_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("matrix.txt.gz");
        let mut writer = MatrixWriter::create(&path).unwrap();
        writer.write_vocab(&vocab(&["x"])).unwrap();
        writer.write_row(b"0:1").unwrap();
        assert_eq!(writer.close().unwrap(), (1, 1));

        let mut contents = String::new();
        GzDecoder::new(File::open(&path).unwrap()).read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "0:x\n0:1\n");
    }
}
