//! Fluent interface for constructing [`ProgressBar`] instances.
//!
//! [`ProgressBar::new`] covers the common case. The [`ProgressBarBuilder`] handles the
//! rest: custom output, glyphs, units and widths.
//!
//! Options apply in call order, so a later call overrides an earlier one touching the
//! same setting. [`config`](ProgressBarBuilder::config) replaces the whole display
//! record and is best called first.
//!
//! # Shared State
//!
//! An existing `Arc<AtomicI64>` can be injected as the counter. Several parts of an
//! application (or a foreign system) can then bump the very same value the bar displays.

use std::{
    io::Write,
    sync::{Arc, atomic::AtomicI64},
    time::Duration,
};

use compact_str::CompactString;

use crate::{
    config::{Config, DEFAULT_REFRESH_RATE},
    glyphs::Glyphs,
    output::{Callback, Output},
    progress::ProgressBar,
    units::Units,
};

/// A builder for [`ProgressBar`] instances.
#[derive(Default)]
pub struct ProgressBarBuilder {
    goal: i64,
    config: Config,
    writer: Option<Box<dyn Write + Send>>,
    callback: Option<Callback>,
    atomic_current: Option<Arc<AtomicI64>>,
}

impl ProgressBarBuilder {
    /// Starts building a bar towards `goal`. Zero or less builds an indeterminate bar.
    #[must_use]
    pub fn new(goal: i64) -> Self {
        Self {
            goal,
            ..Default::default()
        }
    }

    /// Replaces the whole display configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the goal.
    #[must_use]
    pub const fn goal(mut self, goal: i64) -> Self {
        self.goal = goal;
        self
    }

    /// Writes lines to `writer`. Takes precedence over a callback and stdout.
    #[must_use]
    pub fn output(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Hands every rendered line to `callback` instead of printing it.
    ///
    /// `callback` is invoked under the bar's render lock, so it must not call
    /// `update`, `finish`, `finish_print`, `is_finished` or `to_string` on the same
    /// bar. Reading the counter with `get` or `goal` is fine. See [`Callback`].
    #[must_use]
    pub fn callback(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Sets the glyphs from a format such as `"[=>-]"`.
    ///
    /// A malformed format is ignored and the previous glyphs stay in place.
    #[must_use]
    pub fn format(mut self, format: &str) -> Self {
        match Glyphs::parse(format) {
            Ok(glyphs) => self.config.glyphs = glyphs,
            Err(err) => tracing::debug!(error = %err, format, "ignoring bar format"),
        }
        self
    }

    /// Sets the glyphs.
    #[must_use]
    pub fn glyphs(mut self, glyphs: Glyphs) -> Self {
        self.config.glyphs = glyphs;
        self
    }

    /// Text placed before the line.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<CompactString>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Text placed after the line.
    #[must_use]
    pub fn postfix(mut self, postfix: impl Into<CompactString>) -> Self {
        self.config.postfix = postfix.into();
        self
    }

    /// Interval of the background refresh loop. Zero restores the default.
    #[must_use]
    pub fn refresh_rate(mut self, rate: Duration) -> Self {
        self.config.refresh_rate = if rate.is_zero() {
            DEFAULT_REFRESH_RATE
        } else {
            rate
        };
        self
    }

    /// Presentation of counter values.
    #[must_use]
    pub const fn units(mut self, units: Units) -> Self {
        self.config.units = units;
        self
    }

    /// Minimum width of plain counter values.
    #[must_use]
    pub const fn units_width(mut self, width: usize) -> Self {
        self.config.units_width = width;
        self
    }

    /// Minimum width of the time box.
    #[must_use]
    pub const fn time_box_width(mut self, width: usize) -> Self {
        self.config.time_box_width = width;
        self
    }

    /// Renders exactly `width` columns, even on a narrower terminal.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self.config.force_width = true;
        self
    }

    /// Renders at most `width` columns; a narrower terminal shrinks the line.
    #[must_use]
    pub const fn max_width(mut self, width: usize) -> Self {
        self.config.width = width;
        self.config.force_width = false;
        self
    }

    /// Disables the background refresh loop; the caller drives
    /// [`update`](ProgressBar::update).
    #[must_use]
    pub const fn manual_update(mut self, manual: bool) -> Self {
        self.config.manual_update = manual;
        self
    }

    /// Finishes automatically at the goal and re-anchors timing when the counter hits zero.
    #[must_use]
    pub const fn auto_stat(mut self, auto_stat: bool) -> Self {
        self.config.auto_stat = auto_stat;
        self
    }

    /// Redraws on every update even when the counter has not moved.
    #[must_use]
    pub const fn always_update(mut self, always: bool) -> Self {
        self.config.always_update = always;
        self
    }

    /// Drops output instead of falling back to stdout.
    #[must_use]
    pub const fn not_print(mut self, not_print: bool) -> Self {
        self.config.not_print = not_print;
        self
    }

    /// Toggles the percent box.
    #[must_use]
    pub const fn show_percent(mut self, show: bool) -> Self {
        self.config.show_percent = show;
        self
    }

    /// Toggles the counters box.
    #[must_use]
    pub const fn show_counters(mut self, show: bool) -> Self {
        self.config.show_counters = show;
        self
    }

    /// Toggles the speed box.
    #[must_use]
    pub const fn show_speed(mut self, show: bool) -> Self {
        self.config.show_speed = show;
        self
    }

    /// Toggles the time-left estimate.
    #[must_use]
    pub const fn show_time_left(mut self, show: bool) -> Self {
        self.config.show_time_left = show;
        self
    }

    /// Toggles the elapsed time on the final line.
    #[must_use]
    pub const fn show_final_time(mut self, show: bool) -> Self {
        self.config.show_final_time = show;
        self
    }

    /// Toggles the bar itself.
    #[must_use]
    pub const fn show_bar(mut self, show: bool) -> Self {
        self.config.show_bar = show;
        self
    }

    /// Uses a pre-existing atomic as the counter.
    ///
    /// Every holder of the atomic updates what the bar shows.
    #[must_use]
    pub fn with_atomic_current(mut self, current: Arc<AtomicI64>) -> Self {
        self.atomic_current = Some(current);
        self
    }

    /// Consumes the builder and returns the bar. The bar is not started.
    #[must_use]
    pub fn build(self) -> ProgressBar {
        let output = Output::select(self.writer, self.callback, self.config.not_print);
        ProgressBar::from_parts(
            self.config,
            output,
            self.atomic_current
                .unwrap_or_else(|| Arc::new(AtomicI64::new(0))),
            self.goal,
        )
    }
}
