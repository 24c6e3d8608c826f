//! Terminal I/O for mgit commands.
//!
//! Commands write through [`IOStreams`] rather than `println!` so their output
//! can be captured in tests.

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Writer behind a stream: real stdout/stderr or a shared test buffer.
struct Sink(Box<dyn Write + Send>);

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Writer appending into a buffer shared with [`TestOutput`].
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Handle to output captured by [`IOStreams::test_with_output`].
#[derive(Debug, Clone)]
pub struct TestOutput {
    out_buf: Arc<Mutex<Vec<u8>>>,
    err_buf: Arc<Mutex<Vec<u8>>>,
}

impl TestOutput {
    /// Captured stdout.
    pub fn stdout(&self) -> String {
        read_buffer(&self.out_buf)
    }

    /// Captured stderr.
    pub fn stderr(&self) -> String {
        read_buffer(&self.err_buf)
    }
}

fn read_buffer(buf: &Arc<Mutex<Vec<u8>>>) -> String {
    let guard = buf.lock().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&guard).to_string()
}

/// Stdout/stderr pair with TTY and color state.
pub struct IOStreams {
    stdout_is_tty: bool,
    color_forced: Option<bool>,
    out: Mutex<Sink>,
    err: Mutex<Sink>,
}

impl std::fmt::Debug for IOStreams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IOStreams")
            .field("stdout_is_tty", &self.stdout_is_tty)
            .field("color_forced", &self.color_forced)
            .finish_non_exhaustive()
    }
}

impl IOStreams {
    /// Streams bound to the real terminal. `NO_COLOR` disables color.
    pub fn system() -> Self {
        Self {
            stdout_is_tty: io::stdout().is_terminal(),
            color_forced: std::env::var_os("NO_COLOR").map(|_| false),
            out: Mutex::new(Sink(Box::new(io::stdout()))),
            err: Mutex::new(Sink(Box::new(io::stderr()))),
        }
    }

    /// Streams with output captured into buffers, no TTY, and no color.
    pub fn test_with_output() -> (Self, TestOutput) {
        let out_buf = Arc::new(Mutex::new(Vec::new()));
        let err_buf = Arc::new(Mutex::new(Vec::new()));
        let ios = Self {
            stdout_is_tty: false,
            color_forced: Some(false),
            out: Mutex::new(Sink(Box::new(SharedBuffer(Arc::clone(&out_buf))))),
            err: Mutex::new(Sink(Box::new(SharedBuffer(Arc::clone(&err_buf))))),
        };
        (ios, TestOutput { out_buf, err_buf })
    }

    /// Override the stdout TTY state.
    pub fn set_stdout_tty(&mut self, is_tty: bool) {
        self.stdout_is_tty = is_tty;
    }

    /// Whether stdout is a terminal.
    pub fn is_stdout_tty(&self) -> bool {
        self.stdout_is_tty
    }

    /// Whether styled output should be emitted.
    pub fn color_enabled(&self) -> bool {
        self.color_forced.unwrap_or(self.stdout_is_tty)
    }

    /// Color scheme matching the current color state.
    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme {
            enabled: self.color_enabled(),
        }
    }

    /// Write a line to stdout.
    pub fn println_out(&self, s: &str) {
        self.writeln_out(format_args!("{s}"));
    }

    /// Write a line to stderr.
    pub fn println_err(&self, s: &str) {
        self.writeln_err(format_args!("{s}"));
    }

    /// Write formatted text and a newline to stdout.
    pub fn writeln_out(&self, args: std::fmt::Arguments<'_>) {
        write_line(&self.out, args);
    }

    /// Write formatted text and a newline to stderr.
    pub fn writeln_err(&self, args: std::fmt::Arguments<'_>) {
        write_line(&self.err, args);
    }
}

// Broken pipes on stdout are not worth failing a command over.
fn write_line(sink: &Mutex<Sink>, args: std::fmt::Arguments<'_>) {
    let mut w = sink.lock().unwrap_or_else(PoisonError::into_inner);
    let _ = w.write_fmt(args);
    let _ = w.write_all(b"\n");
}

/// Styling helpers that degrade to plain text when color is off.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    fn paint(self, text: &str, style: &console::Style) -> String {
        if self.enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Bold.
    pub fn bold(self, text: &str) -> String {
        self.paint(text, &console::Style::new().bold())
    }

    /// Green.
    pub fn success(self, text: &str) -> String {
        self.paint(text, &console::Style::new().green())
    }

    /// Red.
    pub fn error(self, text: &str) -> String {
        self.paint(text, &console::Style::new().red())
    }

    /// Dimmed.
    pub fn gray(self, text: &str) -> String {
        self.paint(text, &console::Style::new().dim())
    }

    /// Cyan, used for URLs and paths.
    pub fn cyan(self, text: &str) -> String {
        self.paint(text, &console::Style::new().cyan())
    }

    /// Check mark.
    pub fn success_icon(self) -> String {
        self.success("✓")
    }

    /// Failure mark.
    pub fn error_icon(self) -> String {
        self.error("X")
    }
}

/// Write to IOStreams stdout with newline, similar to `println!()`.
#[macro_export]
macro_rules! ios_println {
    ($ios:expr) => {
        $ios.println_out("")
    };
    ($ios:expr, $($arg:tt)*) => {
        $ios.writeln_out(format_args!($($arg)*))
    };
}

/// Write to IOStreams stderr with newline, similar to `eprintln!()`.
#[macro_export]
macro_rules! ios_eprintln {
    ($ios:expr) => {
        $ios.println_err("")
    };
    ($ios:expr, $($arg:tt)*) => {
        $ios.writeln_err(format_args!($($arg)*))
    };
}
