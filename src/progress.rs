//! Progress bars and a log writer that prints above them.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        mp
    })
}

/// Bar for inserting `len` records
pub fn add_progress_bar(len: u64) -> ProgressBar {
    let bar = multi_progress().add(ProgressBar::new(len));
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("Saving records");
    bar
}

/// Print a line without tearing active bars; falls back to plain stderr
/// when bars are not drawn (e.g. stderr is not a terminal)
fn emit_line(line: &str) {
    let mp = multi_progress();
    if mp.is_hidden() {
        eprintln!("{}", line);
    } else {
        let _ = mp.println(line);
    }
}

#[derive(Default, Clone)]
pub struct LogWriterFactory;

/// Line-buffered writer handed to the tracing fmt layer
#[derive(Default)]
pub struct LogWriter {
    pending: Vec<u8>,
}

impl LogWriter {
    fn drain_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            emit_line(text.trim_end_matches(['\n', '\r']));
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_lines();
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            emit_line(String::from_utf8_lossy(&rest).trim_end_matches('\r'));
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter::default()
    }
}
