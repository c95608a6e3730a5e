//! Human-readable formatting of raw counter values.
//!
//! A bar counts plain integers, but what those integers *mean* depends on the job:
//! items, bytes, or nanoseconds. [`UnitFormat`] turns a raw `i64` into display text
//! according to a [`Units`] mode, optionally suffixed with `/s` for rates.
//!
//! ```
//! use progress_line::units::{UnitFormat, Units};
//!
//! assert_eq!(UnitFormat::new(1024).to(Units::DataSize).to_string(), "1.00 KiB");
//! assert_eq!(UnitFormat::new(10).width(7).to_string(), "     10");
//! ```

use std::fmt::{self, Write as _};

/// One kibibyte.
pub const KIB: i64 = 1 << 10;
/// One mebibyte.
pub const MIB: i64 = 1 << 20;
/// One gibibyte.
pub const GIB: i64 = 1 << 30;
/// One tebibyte.
pub const TIB: i64 = 1 << 40;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 24 * 60 * 60 * 1_000_000_000;

/// How counter values are presented.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "rkyv", rkyv(derive(Debug, Eq, PartialEq)))]
pub enum Units {
    /// Plain integers, right-justified to the configured units width.
    #[default]
    Plain,
    /// Binary data sizes (`B`, `KiB`, `MiB`, `GiB`, `TiB`).
    DataSize,
    /// Values are nanoseconds, rendered like `3h14m15s`.
    Duration,
}

/// A value paired with its presentation rules. Formats through [`fmt::Display`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnitFormat {
    value: i64,
    units: Units,
    width: usize,
    per_sec: bool,
}

impl UnitFormat {
    /// Wraps `value` with plain units and no padding.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            units: Units::Plain,
            width: 0,
            per_sec: false,
        }
    }

    /// Selects the unit mode.
    #[must_use]
    pub const fn to(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Sets the field width for [`Units::Plain`]. Ignored by the other modes.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Appends `/s` to the output.
    #[must_use]
    pub const fn per_sec(mut self) -> Self {
        self.per_sec = true;
        self
    }
}

impl fmt::Display for UnitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.units {
            Units::Plain => write!(f, "{:>width$}", self.value, width = self.width)?,
            Units::DataSize => f.write_str(&format_bytes(self.value))?,
            Units::Duration => f.write_str(&format_duration(self.value))?,
        }
        if self.per_sec {
            f.write_str("/s")?;
        }
        Ok(())
    }
}

/// Formats a byte count with the largest binary unit it reaches, e.g. `64.20 KiB` or `52 B`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: i64) -> String {
    let scaled = |unit: i64| bytes as f64 / unit as f64;
    match bytes {
        b if b >= TIB => format!("{:.2} TiB", scaled(TIB)),
        b if b >= GIB => format!("{:.2} GiB", scaled(GIB)),
        b if b >= MIB => format!("{:.2} MiB", scaled(MIB)),
        b if b >= KIB => format!("{:.2} KiB", scaled(KIB)),
        b => format!("{b} B"),
    }
}

/// Formats a nanosecond count as a duration, prefixing whole days when it exceeds 24 hours.
///
/// The remainder uses the compact `1h2m3.5s` notation: sub-second values switch to
/// `ms`, `µs` or `ns`, and zero renders as `0s`.
#[must_use]
pub fn format_duration(nanos: i64) -> String {
    if nanos > NANOS_PER_DAY {
        let days = nanos / NANOS_PER_DAY;
        format!("{days}d{}", compact_duration(nanos - days * NANOS_PER_DAY))
    } else {
        compact_duration(nanos)
    }
}

fn compact_duration(nanos: i64) -> String {
    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }
    let n = nanos.unsigned_abs();

    if n < NANOS_PER_SEC {
        // Writing to a String cannot fail.
        let _ = match n {
            0 => return "0s".to_owned(),
            n if n < NANOS_PER_MICRO => write!(out, "{n}ns"),
            n if n < NANOS_PER_MILLI => write!(out, "{}µs", fraction(n, 3)),
            n => write!(out, "{}ms", fraction(n, 6)),
        };
        return out;
    }

    let secs = n / NANOS_PER_SEC;
    let mins = secs / 60;
    let hours = mins / 60;
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if mins > 0 {
        let _ = write!(out, "{}m", mins % 60);
    }
    let _ = write!(out, "{}s", fraction(n % (60 * NANOS_PER_SEC), 9));
    out
}

/// Renders `value / 10^digits` with the fractional part trimmed of trailing zeros.
fn fraction(value: u64, digits: u32) -> String {
    let scale = 10u64.pow(digits);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = digits as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
