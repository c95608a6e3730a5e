//! # `progress_line`
//!
//! A thread-safe, single-line terminal progress bar.
//!
//! `progress_line` tracks a counter against an optional goal and keeps one terminal line
//! up to date with a bar, percentage, counters, time remaining and throughput. It is
//! designed to be:
//!
//! * **Concurrent**: [`ProgressBar`] handles are cheap to clone ([`Arc`]-based) and safe to share across threads.
//! * **Low Overhead**: The counter is a plain atomic. Rendering happens on a background thread (or on demand), never on the hot path.
//! * **Tidy**: Redraws and the final line are serialized behind a single lock, so output never interleaves, and a bar finishes exactly once.
//!
//! ```no_run
//! use progress_line::ProgressBar;
//!
//! let bar = ProgressBar::new(5000);
//! bar.start();
//! for _ in 0..5000 {
//!     bar.increment();
//! }
//! bar.finish_print("The End!");
//! ```
//!
//! ## Modules
//!
//! * [`builder`]: Fluent interface for configuring [`ProgressBar`] instances.
//! * [`config`]: The display configuration record.
//! * [`glyphs`]: The five glyphs a bar is drawn with.
//! * [`io`]: Wrappers for [`std::io::Read`] and [`std::io::Write`] that count bytes automatically.
//! * [`iter`]: Extension traits for tracking progress on Iterators.
//! * [`progress`]: The [`ProgressBar`] state machine, refresh loop and snapshots.
//! * [`render`]: Pure rendering of a snapshot into a line.
//! * [`terminal`]: Terminal width lookup.
//! * [`units`]: Plain, data-size and duration formatting of counter values.
//! * [`width`]: Escape-aware display width.
//!
//! [`Arc`]: std::sync::Arc

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod config;
pub mod glyphs;
pub mod io;
pub mod iter;
mod output;
pub mod progress;
pub mod render;
mod signal;
pub mod terminal;
pub mod units;
pub mod width;

pub use builder::ProgressBarBuilder;
pub use config::Config;
pub use glyphs::{GlyphError, Glyphs};
pub use io::{ProgressReader, ProgressWriter};
pub use iter::{ProgressIter, ProgressIteratorExt};
pub use output::Callback;
pub use progress::{ProgressBar, ProgressSnapshot};
pub use units::{UnitFormat, Units};
