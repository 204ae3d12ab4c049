//! Console logging mirrored to files
//!
//! [`Logger`] tees everything written to it into the console and an optional
//! file. [`LogSink`] appends individual lines to files inside a run directory.
//! Both are plain values owned by the caller; nothing here touches global
//! stdout/stderr state.
//!
//! # Example
//!
//! ```no_run
//! use metatrain::train::{FileMode, Logger};
//! use std::io::Write;
//!
//! let mut logger = Logger::new(true).with_file("save/run/stdout.txt", FileMode::Append)?;
//! writeln!(logger, "epoch 1, loss 0.6931")?;
//! logger.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Result;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How an existing log file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Truncate on open
    #[default]
    Truncate,
    /// Append to existing content
    Append,
}

/// Writes text to the console and, optionally, a file
pub struct Logger {
    console: Box<dyn Write + Send>,
    file: Option<File>,
    should_flush: bool,
}

impl Logger {
    /// Console-only logger writing to stdout
    pub fn new(should_flush: bool) -> Self {
        Self {
            console: Box::new(io::stdout()),
            file: None,
            should_flush,
        }
    }

    /// Also write everything to `path`
    pub fn with_file<P: AsRef<Path>>(mut self, path: P, mode: FileMode) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Truncate => options.write(true).truncate(true),
            FileMode::Append => options.append(true),
        };
        self.file = Some(options.open(path)?);
        Ok(self)
    }

    /// Replace the console writer (stdout by default)
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Write one line
    pub fn log_line<T: Display>(&mut self, line: T) -> Result<()> {
        writeln!(self, "{line}")?;
        Ok(())
    }

    /// Flush, then close the file
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        self.file.take();
        Ok(())
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        self.console.write_all(buf)?;

        if self.should_flush {
            self.flush()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        self.console.flush()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Prints lines and appends them to files in a log directory
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    dir: Option<PathBuf>,
    quiet: bool,
}

impl LogSink {
    /// Default file inside the log directory
    pub const DEFAULT_FILE: &'static str = "log.txt";

    /// Sink that only prints
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that prints and appends to files under `dir`
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
            quiet: false,
        }
    }

    /// Keep writing files but stop printing
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn set_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        self.dir = Some(dir.into());
    }

    /// Print `obj` and append it to `log.txt`
    pub fn log<T: Display>(&self, obj: T) -> Result<()> {
        self.log_to(obj, Self::DEFAULT_FILE)
    }

    /// Print `obj` and append it to `filename` in the log directory
    pub fn log_to<T: Display>(&self, obj: T, filename: &str) -> Result<()> {
        if !self.quiet {
            println!("{obj}");
        }
        if let Some(dir) = &self.dir {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(filename))?;
            writeln!(file, "{obj}")?;
        }
        Ok(())
    }
}
