use once_cell::sync::Lazy;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Error as IoError, ErrorKind, Write};
use std::sync::Mutex;

// Global static logger instance
static LOGGER: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));

/// Initializes the global logger to write to the specified file path.
/// The file is created if missing and truncated if it exists, so each run
/// starts with a fresh log.
pub fn init_global_logger(log_file_path: &str) -> Result<(), IoError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_file_path)?;
    let writer = BufWriter::new(file);
    let mut logger_guard = LOGGER
        .lock()
        .map_err(|_| IoError::new(ErrorKind::Other, "logger mutex poisoned"))?;
    *logger_guard = Some(writer);
    Ok(())
}

/// Writes a verbose message to the global logger.
pub fn log_verbose_message_args(message: fmt::Arguments) {
    if let Ok(mut logger_guard) = LOGGER.lock() {
        if let Some(writer) = logger_guard.as_mut() {
            if writeln!(writer, "{}", message).is_err() {
                // Fallback to stderr if log writing fails
                eprintln!("Fallback (log write failed): {}", message);
            }
        }
        // If logger is None (not initialized), verbose messages are suppressed.
    } else {
        eprintln!("Fallback (logger mutex error): {}", message);
    }
}

/// Writes a verbose error message to the global logger.
pub fn log_verbose_error_args(message: fmt::Arguments) {
    if let Ok(mut logger_guard) = LOGGER.lock() {
        if let Some(writer) = logger_guard.as_mut() {
            if writeln!(writer, "ERROR: {}", message).is_err() {
                eprintln!("Fallback (log write failed) ERROR: {}", message);
            }
        }
    } else {
        eprintln!("Fallback (logger mutex error) ERROR: {}", message);
    }
}

/// Flushes the global logger if it has been initialized.
pub fn flush_global_logger() -> Result<(), IoError> {
    let mut logger_guard = LOGGER
        .lock()
        .map_err(|_| IoError::new(ErrorKind::Other, "logger mutex poisoned"))?;
    if let Some(writer) = logger_guard.as_mut() {
        writer.flush()?;
    }
    Ok(())
}
