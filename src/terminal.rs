//! Terminal size lookup.

/// Returns the width of the attached terminal in columns, if there is one.
#[cfg(feature = "terminal")]
#[must_use]
pub fn terminal_width() -> Option<usize> {
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => Some(usize::from(columns)),
        Ok(_) => None,
        Err(err) => {
            tracing::trace!(error = %err, "terminal width unavailable");
            None
        }
    }
}

/// Returns the width of the attached terminal in columns, if there is one.
///
/// Always `None` without the `terminal` feature.
#[cfg(not(feature = "terminal"))]
#[must_use]
pub fn terminal_width() -> Option<usize> {
    None
}
