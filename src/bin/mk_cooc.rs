use std::error::Error;
use std::path::Path;
use std::process::exit;
use argh::FromArgs;
use env_logger::Env;
use log::{error, info};
use cooccur::corpus::open_corpus;
use cooccur::pipeline;
use cooccur::settings::{Settings, Strategy, WindowMode, COUNT_CHUNK_SIZE, RENDER_CHUNK_SIZE, WINDOW_RADIUS};
use cooccur::writer::MatrixWriter;


#[derive(FromArgs)]
/// build a sparse word co-occurrence matrix from a one-word-per-line corpus
struct MkCooc {
    /// positions on each side of a word counted as its neighbours
    #[argh(option, default = "WINDOW_RADIUS")]
    window_radius: usize,

    /// token positions per counting chunk
    #[argh(option, default = "COUNT_CHUNK_SIZE")]
    count_chunk_size: usize,

    /// matrix rows per rendering chunk
    #[argh(option, default = "RENDER_CHUNK_SIZE")]
    render_chunk_size: usize,

    /// worker threads (defaults to the available parallelism)
    #[argh(option)]
    threads: Option<usize>,

    /// scheduling: pool or rayon
    #[argh(option, default = "Strategy::Pool")]
    strategy: Strategy,

    /// window: inclusive (a word neighbours itself) or exclusive
    #[argh(option, default = "WindowMode::Inclusive")]
    window: WindowMode,

    /// corpus path, one token per line (.gz is decompressed)
    #[argh(positional)]
    input: String,

    /// matrix path (.gz is compressed)
    #[argh(positional)]
    output: String,
}

impl MkCooc {
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            window_radius: self.window_radius,
            count_chunk_size: self.count_chunk_size,
            render_chunk_size: self.render_chunk_size,
            threads: self.threads.unwrap_or(defaults.threads),
            strategy: self.strategy,
            window: self.window,
        }
    }
}


fn run(args: MkCooc) -> Result<(), Box<dyn Error>> {
    let settings = args.settings();
    settings.validate()?;
    info!("Corpus file: {}", args.input);
    info!("Matrix file: {}", args.output);
    info!("Using {}", settings);
    if settings.window == WindowMode::Inclusive {
        info!("Every word is counted as a neighbour of itself (--window exclusive to disable)");
    }

    let input = open_corpus(Path::new(&args.input))
        .map_err(|e| format!("Could not open {}: {}", args.input, e))?;
    let writer = MatrixWriter::create(Path::new(&args.output))
        .map_err(|e| format!("Could not create {}: {}", args.output, e))?;

    let summary = pipeline::run(input, writer, &settings)?;
    info!("Tokens: {}", summary.num_tokens);
    info!("Rejected lines: {}", summary.rejected);
    info!("Vocab size: {}", summary.vocab_len);
    info!("Rows: {}", summary.num_rows);
    info!("Num values: {}", summary.num_values);
    info!("Counting chunks: {}", summary.count_chunks);
    info!("Rendering chunks: {}", summary.render_chunks);
    Ok(())
}


fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: MkCooc = argh::from_env();
    if let Err(e) = run(args) {
        error!("{}", e);
        exit(1);
    }
}
