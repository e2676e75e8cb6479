//! Writes formatted events into the log file, rolling it over by size.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::LogFile;
use crate::logger::error::LoggerError;
use crate::logger::rotation::RotationManager;

/// Shared handle to the open log file.
///
/// Each event arrives as a single `write_all`, so the file is written
/// unbuffered and a rollover never splits an event. Once the file cannot be
/// written, events go to stderr for the rest of the run.
#[derive(Clone)]
pub struct RotatingFileWriter {
    sink: Arc<Mutex<LogSink>>,
}

struct LogSink {
    path: PathBuf,
    file: File,
    written: u64,
    rotation: RotationManager,
    on_stderr: bool,
}

impl RotatingFileWriter {
    pub fn new(log_file: &LogFile) -> Result<Self, LoggerError> {
        if let Some(dir) = log_file.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let file = open(&log_file.path, log_file.append)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            sink: Arc::new(Mutex::new(LogSink {
                path: log_file.path.clone(),
                file,
                written,
                rotation: RotationManager::new(log_file.rotation),
                on_stderr: false,
            })),
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, LogSink>> {
        self.sink
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl LogSink {
    fn roll_over(&mut self) -> io::Result<()> {
        self.rotation
            .rotate(&self.path)
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.file = open(&self.path, false)?;
        self.written = 0;
        Ok(())
    }

    fn write_event(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.on_stderr {
            return io::stderr().write(buf);
        }

        let result = if self.rotation.should_rotate(self.written) {
            self.roll_over().and_then(|()| self.file.write(buf))
        } else {
            self.file.write(buf)
        };

        match result {
            Ok(n) => {
                self.written += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.on_stderr = true;
                eprintln!(
                    "notify-relay: cannot write {}, logging to stderr: {}",
                    self.path.display(),
                    e
                );
                io::stderr().write(buf)
            }
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write_event(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self.lock()?;
        if sink.on_stderr {
            io::stderr().flush()
        } else {
            sink.file.flush()
        }
    }
}

fn open(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
}
