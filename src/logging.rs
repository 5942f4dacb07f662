use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Local-time prefix of every log line, `DD.MM.YYYY HH:MM:SS: `.
struct DottedLocalTime;

impl FormatTime for DottedLocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%d.%m.%Y %H:%M:%S:"))
    }
}

/// A `MakeWriter` mirroring every log line to stdout and to the append-only
/// collection log.
pub struct TeeMakeWriter {
    file: Arc<Mutex<File>>,
}

pub struct TeeWriter {
    file: Arc<Mutex<File>>,
}

impl io::Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Ok(mut file) = self.file.lock() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Ok(mut file) = self.file.lock() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for TeeMakeWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TeeWriter {
            file: self.file.clone(),
        }
    }
}

/// Initializes logging: line-oriented text with a local timestamp prefix,
/// mirrored to stdout and appended to `log_file`.
pub fn init(log_file: &Path) -> crate::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::fmt()
        .with_timer(DottedLocalTime)
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .with_writer(TeeMakeWriter {
            file: Arc::new(Mutex::new(file)),
        })
        .init();

    Ok(())
}
