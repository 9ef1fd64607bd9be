use std::io::IsTerminal;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};


/// Progress bar over chunks of a parallel phase. Hidden unless stderr is a
/// terminal so redirected runs keep clean logs.
pub fn chunk_progress(message: &str) -> ProgressBar {
    let draw_target = if std::io::stderr().is_terminal() {
        ProgressDrawTarget::stderr_with_hz(10)
    } else {
        ProgressDrawTarget::hidden()
    };
    let pb = ProgressBar::with_draw_target(Some(0), draw_target);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {msg} [{bar:40}] {percent}% ({pos}/{len} chunks)") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message.to_string());
    pb
}
