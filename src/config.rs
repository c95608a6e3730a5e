//! Display configuration for a [`ProgressBar`](crate::ProgressBar).
//!
//! A [`Config`] is plain data: which boxes to show, how to format counters, how wide the
//! line is and how often it refreshes. It is fixed once the bar is built. Where the
//! output goes (writer, callback, stdout) is not part of it, see
//! [`ProgressBarBuilder`](crate::ProgressBarBuilder).

use std::time::Duration;

use compact_str::CompactString;

use crate::{glyphs::Glyphs, units::Units};

/// Interval between background redraws when none is configured.
pub const DEFAULT_REFRESH_RATE: Duration = Duration::from_millis(200);

/// Toggles and formatting parameters for rendering a bar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Show the completion percentage.
    pub show_percent: bool,
    /// Show `current / goal`.
    pub show_counters: bool,
    /// Show the average throughput.
    pub show_speed: bool,
    /// Show the estimated time remaining while running.
    pub show_time_left: bool,
    /// Show the total elapsed time in the final line.
    pub show_final_time: bool,
    /// Draw the bar itself.
    pub show_bar: bool,

    /// Presentation of counter values.
    pub units: Units,
    /// Minimum width of plain counter values.
    pub units_width: usize,
    /// Minimum width of the time box; shorter text is left-padded.
    pub time_box_width: usize,

    /// Line width. `0` means "use the terminal width".
    pub width: usize,
    /// Use `width` even when the terminal is narrower.
    pub force_width: bool,

    /// Interval of the background refresh loop.
    pub refresh_rate: Duration,
    /// Never spawn the refresh loop; the caller drives [`update`](crate::ProgressBar::update).
    pub manual_update: bool,
    /// Re-anchor timing when the counter returns to zero and finish once the goal is reached.
    pub auto_stat: bool,
    /// Redraw on every update even when the counter has not moved.
    pub always_update: bool,
    /// Suppress the stdout fallback when no writer or callback is set.
    pub not_print: bool,

    /// Text placed before everything else on the line.
    pub prefix: CompactString,
    /// Text placed after everything else on the line.
    pub postfix: CompactString,
    /// Glyphs used to draw the bar.
    pub glyphs: Glyphs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_percent: true,
            show_counters: true,
            show_speed: false,
            show_time_left: true,
            show_final_time: true,
            show_bar: true,
            units: Units::Plain,
            units_width: 0,
            time_box_width: 0,
            width: 0,
            force_width: false,
            refresh_rate: DEFAULT_REFRESH_RATE,
            manual_update: false,
            auto_stat: false,
            always_update: false,
            not_print: false,
            prefix: CompactString::default(),
            postfix: CompactString::default(),
            glyphs: Glyphs::default(),
        }
    }
}

impl Config {
    /// A config with every box hidden, to be switched on selectively.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            show_percent: false,
            show_counters: false,
            show_time_left: false,
            show_final_time: false,
            show_bar: false,
            ..Self::default()
        }
    }

    /// Resolves the line width given the terminal's width, if known.
    ///
    /// A forced width always wins. Otherwise the terminal width is used when no width is
    /// configured or the terminal is narrower; without a terminal the configured width
    /// stands, even if that is zero.
    #[must_use]
    pub fn resolve_width(&self, terminal: Option<usize>) -> usize {
        if self.force_width {
            return self.width;
        }
        match terminal {
            Some(columns) if self.width == 0 || columns <= self.width => columns,
            _ => self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.show_percent && config.show_counters && config.show_bar);
        assert!(config.show_time_left && config.show_final_time);
        assert!(!config.show_speed);
        assert!(!config.manual_update && !config.auto_stat);
        assert_eq!(config.refresh_rate.as_millis(), 200);
    }

    /// Width Resolution
    #[test]
    fn test_resolve_width() {
        let mut config = Config::default();
        assert_eq!(config.resolve_width(Some(120)), 120);
        assert_eq!(config.resolve_width(None), 0);

        config.width = 60;
        assert_eq!(config.resolve_width(Some(120)), 60, "configured width is a maximum");
        assert_eq!(config.resolve_width(Some(40)), 40, "narrow terminal wins");
        assert_eq!(config.resolve_width(None), 60);

        config.force_width = true;
        assert_eq!(config.resolve_width(Some(40)), 60);
    }
}
