//! Destinations for rendered lines.

use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

/// Receives every rendered line instead of a writer.
///
/// The callback runs while the bar holds its render lock. It may read the counter
/// through [`ProgressBar::get`](crate::ProgressBar::get) or
/// [`ProgressBar::goal`](crate::ProgressBar::goal), but must not call back into
/// anything that renders or reads the line (`update`, `finish`, `finish_print`,
/// `is_finished`, `to_string`), or it deadlocks.
pub type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Where a bar writes. Chosen once at construction.
pub(crate) enum Output {
    Writer(Box<dyn Write + Send>),
    Callback(Callback),
    Stdout,
    Discard,
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Writer(_) => "Writer",
            Self::Callback(_) => "Callback",
            Self::Stdout => "Stdout",
            Self::Discard => "Discard",
        })
    }
}

impl Output {
    /// An explicit writer wins over a callback, which wins over stdout.
    pub(crate) fn select(
        writer: Option<Box<dyn Write + Send>>,
        callback: Option<Callback>,
        not_print: bool,
    ) -> Self {
        match (writer, callback) {
            (Some(writer), _) => Self::Writer(writer),
            (None, Some(callback)) => Self::Callback(callback),
            (None, None) if not_print => Self::Discard,
            (None, None) => Self::Stdout,
        }
    }

    /// Redraws `line` over the current terminal line.
    pub(crate) fn redraw(&mut self, line: &str) {
        match self {
            Self::Callback(callback) => callback(line),
            _ => self.emit(&["\r", line]),
        }
    }

    /// Writes `text` followed by a line terminator.
    pub(crate) fn write_line(&mut self, text: &str) {
        match self {
            Self::Callback(callback) => callback(&format!("{text}\n")),
            _ => self.emit(&[text, "\n"]),
        }
    }

    fn emit(&mut self, parts: &[&str]) {
        let result = match self {
            Self::Writer(writer) => write_parts(writer, parts),
            Self::Stdout => write_parts(&mut io::stdout().lock(), parts),
            Self::Callback(_) | Self::Discard => Ok(()),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, sink = ?self, "failed to write progress output");
        }
    }
}

fn write_parts(writer: &mut impl Write, parts: &[&str]) -> io::Result<()> {
    for part in parts {
        writer.write_all(part.as_bytes())?;
    }
    writer.flush()
}
