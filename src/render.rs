//! Turns a [`ProgressSnapshot`] into the text of one line.
//!
//! The line is assembled from optional boxes:
//!
//! ```text
//! prefix | counters | bar | percent | speed | time | postfix | padding
//! ```
//!
//! Every box except the bar has a natural width. The bar takes whatever the others
//! leave of the available width, and disappears when nothing is left. Widths are
//! measured with [`display_width`] so colour codes in prefixes or glyphs do not
//! shrink the bar.

use std::time::Duration;

use crate::{
    config::Config,
    glyphs::Glyphs,
    progress::ProgressSnapshot,
    units::{UnitFormat, Units, format_duration},
    width::display_width,
};

/// Renders the full line for `snapshot`, padded with spaces to `width` columns.
///
/// Content wider than `width` is never truncated.
#[must_use]
pub fn render_line(snapshot: &ProgressSnapshot, config: &Config, width: usize) -> String {
    let count = |value: i64| {
        UnitFormat::new(value)
            .to(config.units)
            .width(config.units_width)
    };

    let percent_box = if config.show_percent {
        format!(" {:6.2}%", snapshot.percent())
    } else {
        String::new()
    };

    let counters_box = if !config.show_counters {
        String::new()
    } else if snapshot.goal() > 0 {
        format!(" {} / {} ", count(snapshot.current()), count(snapshot.goal()))
    } else {
        format!(" {} / ? ", count(snapshot.current()))
    };

    let time_box = pad_left(time_box(snapshot, config), config.time_box_width);

    let speed_box = match snapshot.throughput() {
        Some(rate) if config.show_speed => {
            #[allow(clippy::cast_possible_truncation)]
            let rate = rate as i64;
            format!(" {}", count(rate).per_sec())
        }
        _ => String::new(),
    };

    let glyphs = &config.glyphs;
    let fixed = display_width(&counters_box)
        + display_width(&glyphs.start)
        + display_width(&glyphs.end)
        + display_width(&percent_box)
        + display_width(&time_box)
        + display_width(&speed_box)
        + display_width(&config.prefix)
        + display_width(&config.postfix);

    let bar_box = if config.show_bar && width > fixed {
        draw_bar(snapshot, glyphs, width - fixed)
    } else {
        String::new()
    };

    let mut line = String::with_capacity(width);
    for part in [
        config.prefix.as_str(),
        counters_box.as_str(),
        bar_box.as_str(),
        percent_box.as_str(),
        speed_box.as_str(),
        time_box.as_str(),
        config.postfix.as_str(),
    ] {
        line.push_str(part);
    }
    let used = display_width(&line);
    if used < width {
        line.extend(std::iter::repeat_n(' ', width - used));
    }
    line
}

fn time_box(snapshot: &ProgressSnapshot, config: &Config) -> String {
    if snapshot.is_finished() {
        if !config.show_final_time {
            return String::new();
        }
        let elapsed = Duration::from_secs(snapshot.elapsed().as_secs());
        let nanos = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
        return format!(" {}", format_duration(nanos));
    }

    match snapshot.time_left() {
        Some(left) if config.show_time_left => {
            format!(" {}", UnitFormat::new(left).to(Units::Duration))
        }
        _ => String::new(),
    }
}

fn pad_left(text: String, width: usize) -> String {
    let used = display_width(&text);
    if used >= width {
        return text;
    }
    let mut padded = " ".repeat(width - used);
    padded.push_str(&text);
    padded
}

/// Draws the bar into exactly `size` cells plus the edge glyphs.
fn draw_bar(snapshot: &ProgressSnapshot, glyphs: &Glyphs, size: usize) -> String {
    let mut bar = String::from(glyphs.start.as_str());
    let goal = snapshot.goal();

    if goal > 0 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = snapshot.current() as f64 / goal as f64;
        #[allow(clippy::cast_precision_loss)]
        let cells = (ratio * size as f64).ceil();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let filled = if cells.is_nan() {
            0
        } else {
            cells.clamp(0.0, size as f64) as usize
        };
        let empty = size - filled;

        if empty == 0 {
            bar.push_str(&glyphs.fill.repeat(filled));
        } else if filled > 0 {
            bar.push_str(&glyphs.fill.repeat(filled - 1));
            bar.push_str(&glyphs.cursor);
        }
        bar.push_str(&glyphs.empty.repeat(empty));
    } else {
        // The marker walks from the right edge towards the left as the counter grows.
        let span = i64::try_from(size).unwrap_or(i64::MAX);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = snapshot.current().rem_euclid(span) as usize;
        let pos = size - offset;
        bar.push_str(&glyphs.empty.repeat(pos - 1));
        bar.push_str(&glyphs.cursor);
        bar.push_str(&glyphs.empty.repeat(size - pos));
    }

    bar.push_str(&glyphs.end);
    bar
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::render_line;
    use crate::{
        config::Config,
        glyphs::Glyphs,
        progress::ProgressSnapshot,
        units::{MIB, Units},
        width::display_width,
    };

    fn snap(current: i64, goal: i64, elapsed_secs: u64) -> ProgressSnapshot {
        ProgressSnapshot {
            current,
            goal,
            start_value: 0,
            elapsed: Duration::from_secs(elapsed_secs),
            finished: false,
        }
    }

    fn bar_only() -> Config {
        Config {
            show_bar: true,
            ..Config::bare()
        }
    }

    /// Full Line
    /// Default boxes laid out in order, with the bar absorbing the spare width.
    #[test]
    fn test_default_layout() {
        let line = render_line(&snap(5, 10, 10), &Config::default(), 40);
        assert_eq!(line, " 5 / 10 [========>---------]  50.00% 10s");
        assert_eq!(display_width(&line), 40);
    }

    /// Standalone Rendering
    /// A snapshot built through the public constructor renders like a live one.
    #[allow(clippy::float_cmp)]
    #[test]
    fn test_render_public_snapshot() {
        let snapshot = ProgressSnapshot::new(5, 10, 0, Duration::from_secs(10), false);
        assert_eq!(snapshot, snap(5, 10, 10));
        assert_eq!(
            render_line(&snapshot, &Config::default(), 40),
            " 5 / 10 [========>---------]  50.00% 10s"
        );

        let done = ProgressSnapshot::new(100, 100, 0, Duration::from_secs(4), true);
        assert!(done.is_finished());
        assert_eq!(done.percent(), 100.0);
    }

    #[test]
    fn test_bar_fill() {
        let config = bar_only();
        assert_eq!(render_line(&snap(0, 10, 0), &config, 12), "[----------]");
        assert_eq!(render_line(&snap(1, 10, 0), &config, 12), "[>---------]");
        assert_eq!(render_line(&snap(5, 10, 0), &config, 12), "[====>-----]");
        // Partial cells round up.
        assert_eq!(render_line(&snap(1, 30, 0), &config, 12), "[>---------]");
        assert_eq!(render_line(&snap(10, 10, 0), &config, 12), "[==========]");
        assert_eq!(render_line(&snap(25, 10, 0), &config, 12), "[==========]", "overshoot clamps");
        assert_eq!(render_line(&snap(-3, 10, 0), &config, 12), "[----------]", "negative clamps");
    }

    /// Indeterminate Bar
    /// Without a goal the cursor moves across the bar instead of filling it.
    #[test]
    fn test_bar_marquee() {
        let config = bar_only();
        assert_eq!(render_line(&snap(0, 0, 0), &config, 12), "[--------->]");
        assert_eq!(render_line(&snap(3, 0, 0), &config, 12), "[------>---]");
        assert_eq!(render_line(&snap(9, 0, 0), &config, 12), "[>---------]");
        assert_eq!(render_line(&snap(10, 0, 0), &config, 12), "[--------->]");
        assert_eq!(render_line(&snap(-1, -5, 0), &config, 12), "[>---------]");
    }

    /// Narrow Lines
    /// The bar is dropped when the other boxes leave no space; nothing is truncated.
    #[test]
    fn test_no_room_for_bar() {
        let config = Config::default();
        let line = render_line(&snap(5, 10, 10), &config, 10);
        assert_eq!(line, " 5 / 10   50.00% 10s");

        let line = render_line(&snap(5, 10, 10), &bar_only(), 2);
        assert_eq!(line, "  ");
        assert_eq!(render_line(&snap(5, 10, 10), &bar_only(), 0), "");
    }

    /// Percent
    /// Goal mode shows a true percentage; without a goal the raw value is scaled by 1/100.
    #[test]
    fn test_percent() {
        let config = Config {
            show_percent: true,
            ..Config::bare()
        };
        assert_eq!(render_line(&snap(200, 200, 0), &config, 0), " 100.00%");
        assert_eq!(render_line(&snap(1, 3, 0), &config, 0), "  33.33%");
        assert_eq!(render_line(&snap(250, 0, 0), &config, 0), "   2.50%");
        assert_eq!(render_line(&snap(250, -1, 0), &config, 0), "   2.50%");
    }

    #[test]
    fn test_counters() {
        let mut config = Config {
            show_counters: true,
            ..Config::bare()
        };
        assert_eq!(render_line(&snap(5, 10, 0), &config, 0), " 5 / 10 ");
        assert_eq!(render_line(&snap(5, 0, 0), &config, 0), " 5 / ? ");

        config.units_width = 3;
        assert_eq!(render_line(&snap(5, 10, 0), &config, 0), "   5 /  10 ");

        config.units = Units::DataSize;
        assert_eq!(
            render_line(&snap(MIB, 2 * MIB, 0), &config, 0),
            " 1.00 MiB / 2.00 MiB "
        );
    }

    /// Time Left
    /// Goal mode estimates the remainder; without a goal it echoes elapsed-equivalent time.
    #[test]
    fn test_time_left() {
        let mut config = Config {
            show_time_left: true,
            ..Config::bare()
        };
        // 25 units in 10s is 400ms each; 75 more take 30s.
        assert_eq!(render_line(&snap(25, 100, 10), &config, 0), " 30s");
        assert_eq!(render_line(&snap(25, 0, 10), &config, 0), " 10s");
        assert_eq!(render_line(&snap(0, 100, 10), &config, 0), "", "no progress, no estimate");

        config.time_box_width = 8;
        assert_eq!(render_line(&snap(25, 100, 10), &config, 0), "     30s");

        let resumed = ProgressSnapshot {
            start_value: 20,
            ..snap(25, 100, 10)
        };
        // 5 units in 10s; 95 remain at 2s each.
        assert_eq!(render_line(&resumed, &config, 0), "   3m10s");
    }

    /// Final Time
    /// A finished snapshot reports elapsed time truncated to whole seconds.
    #[test]
    fn test_final_time() {
        let config = Config::default();
        let finished = ProgressSnapshot {
            elapsed: Duration::from_millis(65_700),
            finished: true,
            ..snap(10, 10, 0)
        };
        let line = render_line(&finished, &Config::bare(), 0);
        assert_eq!(line, "");

        let line = render_line(
            &finished,
            &Config {
                show_final_time: true,
                ..Config::bare()
            },
            0,
        );
        assert_eq!(line, " 1m5s");

        assert!(render_line(&finished, &config, 40).ends_with(" 1m5s"));
    }

    #[test]
    fn test_speed() {
        let mut config = Config {
            show_speed: true,
            ..Config::bare()
        };
        assert_eq!(render_line(&snap(50, 100, 10), &config, 0), " 5/s");
        assert_eq!(render_line(&snap(50, 100, 0), &config, 0), "", "zero elapsed has no rate");
        assert_eq!(render_line(&snap(0, 100, 10), &config, 0), "");

        config.units = Units::DataSize;
        assert_eq!(render_line(&snap(20 * MIB, 0, 10), &config, 0), " 2.00 MiB/s");
    }

    /// Prefix, Postfix & Escapes
    /// Colour codes in any part of the line do not steal columns from the bar.
    #[test]
    fn test_prefix_postfix_escapes() {
        let config = Config {
            prefix: "\x1b[1mjob\x1b[0m ".into(),
            postfix: " ok".into(),
            glyphs: Glyphs::parse("\x1b[32m[\x1b[0m\0#\0>\0.\0\x1b[32m]\x1b[0m").unwrap(),
            ..bar_only()
        };
        let line = render_line(&snap(5, 10, 0), &config, 15);
        assert_eq!(line, "\x1b[1mjob\x1b[0m \x1b[32m[\x1b[0m##>...\x1b[32m]\x1b[0m ok");
        assert_eq!(display_width(&line), 15);
    }

    proptest! {
        #[test]
        fn render_never_panics_and_fills_width(
            current in any::<i64>(),
            goal in -1000i64..1_000_000,
            start_value in -1000i64..1000,
            elapsed_ms in 0u64..10_000_000,
            width in 0usize..200,
            finished in any::<bool>(),
        ) {
            let snapshot = ProgressSnapshot {
                current,
                goal,
                start_value,
                elapsed: Duration::from_millis(elapsed_ms),
                finished,
            };
            let config = Config { show_speed: true, ..Config::default() };
            let line = render_line(&snapshot, &config, width);
            prop_assert!(display_width(&line) >= width);
        }
    }
}
