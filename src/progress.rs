//! Loading indicators and a log writer that keeps them pinned.
//!
//! Spinners and log lines share one [`MultiProgress`], so `tracing` output
//! is printed above any spinner instead of tearing through it.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::borrow::Cow;
use std::future::Future;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        mp
    })
}

fn emit_line(line: &str) {
    let line = line.trim_end_matches('\r');
    let _ = multi_progress().println(line.to_string());
}

/// Start a spinner with `message`. Hidden when stderr is not a terminal.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let bar = multi_progress().add(ProgressBar::new_spinner());
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Await `future` while a spinner shows `message`; the spinner is cleared
/// whatever the outcome.
pub async fn with_spinner<F, T>(message: impl Into<Cow<'static, str>>, future: F) -> T
where
    F: Future<Output = T>,
{
    let bar = spinner(message);
    let output = future.await;
    bar.finish_and_clear();
    output
}

#[derive(Default, Clone)]
pub struct LogWriterFactory;

/// Line-buffers log output and hands complete lines to the progress display
pub struct LogWriter {
    buffer: String,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_str(&String::from_utf8_lossy(buf));

        while let Some(idx) = self.buffer.find('\n') {
            emit_line(&self.buffer[..idx]);
            self.buffer.drain(..=idx);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            emit_line(&self.buffer);
            self.buffer.clear();
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
        LogWriter {
            buffer: String::new(),
        }
    }
}
