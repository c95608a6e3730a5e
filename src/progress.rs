//! The progress bar handle, its refresh loop and the finish protocol.
//!
//! A [`ProgressBar`] splits its state the same way any contended counter should:
//!
//! * **Hot data:** the counter and goal live in atomics. Worker threads call
//!   [`add`](ProgressBar::add) in tight loops without ever taking a lock.
//! * **Cold data:** timing and the display [`Config`] sit behind an
//!   [`RwLock`](parking_lot::RwLock). They change at most a few times per bar.
//! * **Screen:** the output sink and the last rendered line share one
//!   [`Mutex`](parking_lot::Mutex), so lines are never interleaved on the terminal.
//!
//! # Lifecycle
//!
//! [`start`](ProgressBar::start) records the start time and, unless manual updates were
//! requested, spawns a background thread that redraws every `refresh_rate`. Rendering
//! never happens on the counter hot path. [`finish`](ProgressBar::finish) stops the
//! loop, draws one final line and terminates it with a newline. It runs exactly once no
//! matter how many threads call it; nothing is drawn afterwards.

use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
    thread,
    time::Duration,
};

use parking_lot::{Mutex, RwLock};
use web_time::Instant;

use crate::{
    builder::ProgressBarBuilder,
    config::Config,
    output::Output,
    render::render_line,
    signal::FinishSignal,
    terminal::terminal_width,
};

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A thread-safe, cloneable handle to a single-line progress bar.
///
/// Cloning is cheap (Arc bump) and every clone drives the same bar.
#[derive(Clone)]
pub struct ProgressBar {
    inner: Arc<Inner>,
}

struct Inner {
    current: Arc<AtomicI64>,
    goal: AtomicI64,
    started: AtomicBool,

    cold: RwLock<Cold>,
    screen: Mutex<Screen>,
    signal: Arc<FinishSignal>,
}

/// State touched only when the bar starts or re-anchors its timing.
struct Cold {
    config: Config,
    start: Option<Instant>,
    start_value: i64,
}

/// Everything guarded by the render lock.
struct Screen {
    output: Output,
    last_line: String,
    last_value: Option<i64>,
    finished: bool,
}

impl fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("current", &self.get())
            .field("goal", &self.goal())
            .field("finished", &self.inner.signal.is_fired())
            .finish_non_exhaustive()
    }
}

impl ProgressBar {
    /// Creates a bar with the default [`Config`] that prints to stdout.
    ///
    /// A `goal` of zero or less makes the bar indeterminate.
    #[must_use]
    pub fn new(goal: i64) -> Self {
        ProgressBarBuilder::new(goal).build()
    }

    /// Starts building a bar with a custom configuration or output.
    #[must_use]
    pub fn builder(goal: i64) -> ProgressBarBuilder {
        ProgressBarBuilder::new(goal)
    }

    pub(crate) fn from_parts(
        config: Config,
        output: Output,
        current: Arc<AtomicI64>,
        goal: i64,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                current,
                goal: AtomicI64::new(goal),
                started: AtomicBool::new(false),
                cold: RwLock::new(Cold {
                    config,
                    start: None,
                    start_value: 0,
                }),
                screen: Mutex::new(Screen {
                    output,
                    last_line: String::new(),
                    last_value: None,
                    finished: false,
                }),
                signal: Arc::new(FinishSignal::default()),
            }),
        }
    }

    // ========================================================================
    // Counter (Hot Path)
    // ========================================================================

    /// Adds one to the counter.
    pub fn increment(&self) -> i64 {
        self.add(1)
    }

    /// Adds `delta` (which may be negative) and returns the new value.
    ///
    /// The counter wraps on overflow.
    pub fn add(&self, delta: i64) -> i64 {
        self.inner
            .current
            .fetch_add(delta, Ordering::Relaxed)
            .wrapping_add(delta)
    }

    /// Overwrites the counter.
    pub fn set(&self, value: i64) {
        self.inner.current.store(value, Ordering::Relaxed);
    }

    /// Reads the counter.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.inner.current.load(Ordering::Relaxed)
    }

    /// Returns the goal. Zero or less means the bar is indeterminate.
    #[must_use]
    pub fn goal(&self) -> i64 {
        self.inner.goal.load(Ordering::Relaxed)
    }

    /// Changes the goal.
    ///
    /// A bar that started without a goal keeps percent and time-left hidden.
    pub fn set_goal(&self, goal: i64) {
        self.inner.goal.store(goal, Ordering::Relaxed);
    }

    /// Returns a shared reference to the atomic counter.
    #[must_use]
    pub fn atomic_current(&self) -> Arc<AtomicI64> {
        Arc::clone(&self.inner.current)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Records the start time and begins refreshing in the background.
    ///
    /// When the goal is not positive, percent, time-left and auto-stat are turned off for
    /// the rest of the bar's life. Calling `start` again re-anchors the timing but never
    /// spawns a second refresh loop.
    pub fn start(&self) -> &Self {
        let goal = self.goal();
        let manual = {
            let mut cold = self.inner.cold.write();
            cold.start = Some(Instant::now());
            cold.start_value = self.get();
            if goal <= 0 {
                cold.config.show_percent = false;
                cold.config.show_time_left = false;
                cold.config.auto_stat = false;
            }
            cold.config.manual_update
        };
        tracing::debug!(goal, current = self.get(), manual, "progress bar started");

        if !manual && !self.inner.started.swap(true, Ordering::AcqRel) {
            self.update();
            self.spawn_refresher();
        }
        self
    }

    /// Redraws the line if the counter moved since the last draw.
    ///
    /// With `always_update` every call redraws. Once the bar is finished this does nothing.
    /// In auto-stat mode a counter at zero re-anchors the timing and a counter at or past
    /// the goal finishes the bar.
    pub fn update(&self) {
        if self.inner.signal.is_fired() {
            return;
        }
        let current = self.get();
        let auto_stat = {
            let cold = self.inner.cold.read();
            let mut screen = self.inner.screen.lock();
            if screen.finished {
                return;
            }
            if cold.config.always_update || screen.last_value != Some(current) {
                let snapshot = Self::snapshot_of(&cold, current, self.goal(), false);
                let line = render_line(&snapshot, &cold.config, Self::width_of(&cold.config));
                screen.output.redraw(&line);
                screen.last_line = line;
                screen.last_value = Some(current);
            }
            cold.config.auto_stat
        };

        if auto_stat {
            if current == 0 {
                let mut cold = self.inner.cold.write();
                cold.start = Some(Instant::now());
                cold.start_value = 0;
            } else if current >= self.goal() {
                self.finish();
            }
        }
    }

    /// Stops refreshing, draws the final line and ends it with a newline.
    ///
    /// Only the first call has any effect; concurrent callers wait for it to complete.
    pub fn finish(&self) {
        let cold = self.inner.cold.read();
        let mut screen = self.inner.screen.lock();
        if screen.finished {
            return;
        }
        self.inner.signal.fire();

        let current = self.get();
        let snapshot = Self::snapshot_of(&cold, current, self.goal(), true);
        let line = render_line(&snapshot, &cold.config, Self::width_of(&cold.config));
        screen.output.redraw(&line);
        screen.output.write_line("");
        screen.last_line = line;
        screen.last_value = Some(current);
        screen.finished = true;

        tracing::debug!(
            current,
            elapsed = ?snapshot.elapsed(),
            "progress bar finished"
        );
    }

    /// Finishes the bar and writes `message` on its own line.
    pub fn finish_print(&self, message: &str) {
        self.finish();
        self.inner.screen.lock().output.write_line(message);
    }

    /// Checks whether [`finish`](Self::finish) has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.screen.lock().finished
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Returns the width the line is rendered to.
    #[must_use]
    pub fn width(&self) -> usize {
        Self::width_of(&self.inner.cold.read().config)
    }

    /// Returns a copy of the display configuration in effect.
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.cold.read().config.clone()
    }

    /// Captures the current counter, goal and timing.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let cold = self.inner.cold.read();
        Self::snapshot_of(
            &cold,
            self.get(),
            self.goal(),
            self.inner.signal.is_fired(),
        )
    }

    fn snapshot_of(cold: &Cold, current: i64, goal: i64, finished: bool) -> ProgressSnapshot {
        ProgressSnapshot {
            current,
            goal,
            start_value: cold.start_value,
            elapsed: cold.start.map(|start| start.elapsed()).unwrap_or_default(),
            finished,
        }
    }

    fn width_of(config: &Config) -> usize {
        if config.force_width {
            config.width
        } else {
            config.resolve_width(terminal_width())
        }
    }

    // ========================================================================
    // Refresh Loop
    // ========================================================================

    fn spawn_refresher(&self) {
        let bar = Arc::downgrade(&self.inner);
        let signal = Arc::clone(&self.inner.signal);
        let rate = self.inner.cold.read().config.refresh_rate;

        let spawned = thread::Builder::new()
            .name("progress-refresh".into())
            .spawn(move || refresh_loop(&bar, &signal, rate));
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn progress refresh thread, updates are manual");
        }
    }
}

/// Redraws every `rate` until the finish signal fires or every handle is dropped.
fn refresh_loop(bar: &Weak<Inner>, signal: &FinishSignal, rate: Duration) {
    tracing::trace!(rate = ?rate, "progress refresh loop running");
    while !signal.wait_timeout(rate) {
        let Some(inner) = bar.upgrade() else {
            break;
        };
        ProgressBar { inner }.update();
    }
    tracing::trace!("progress refresh loop stopped");
}

impl fmt::Display for ProgressBar {
    /// Writes the most recently rendered line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.screen.lock().last_line)
    }
}

/// A plain-data view of a bar at one instant: the input to
/// [`render_line`](crate::render::render_line).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "rkyv", rkyv(derive(Debug, Eq, PartialEq)))]
pub struct ProgressSnapshot {
    pub(crate) current: i64,
    pub(crate) goal: i64,
    pub(crate) start_value: i64,
    pub(crate) elapsed: Duration,
    pub(crate) finished: bool,
}

impl ProgressSnapshot {
    /// Assembles a snapshot by hand, for rendering with
    /// [`render_line`](crate::render::render_line) without a live bar.
    ///
    /// `start_value` is the counter value timing is measured from, and `elapsed` the
    /// time since [`ProgressBar::start`].
    #[must_use]
    pub const fn new(
        current: i64,
        goal: i64,
        start_value: i64,
        elapsed: Duration,
        finished: bool,
    ) -> Self {
        Self {
            current,
            goal,
            start_value,
            elapsed,
            finished,
        }
    }

    /// Returns the counter value.
    #[must_use]
    pub const fn current(&self) -> i64 {
        self.current
    }

    /// Returns the goal.
    #[must_use]
    pub const fn goal(&self) -> i64 {
        self.goal
    }

    /// Returns the counter value timing is measured from.
    #[must_use]
    pub const fn start_value(&self) -> i64 {
        self.start_value
    }

    /// Returns the time since the bar started, or zero if it never did.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns whether the bar was finishing when captured.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns whether there is no goal to measure against.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        self.goal <= 0
    }

    /// Units completed since timing started.
    #[must_use]
    pub const fn progressed(&self) -> i64 {
        self.current.saturating_sub(self.start_value)
    }

    /// Percentage towards the goal.
    ///
    /// Without a goal this is the raw counter divided by 100, not a fraction of anything.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percent(&self) -> f64 {
        let current = self.current as f64;
        if self.goal > 0 {
            current / (self.goal as f64 / 100.0)
        } else {
            current / 100.0
        }
    }

    /// Estimated time remaining in nanoseconds, truncated to whole seconds.
    ///
    /// Extrapolates the average pace since start over the units still missing. Without a
    /// goal the same pace is applied to the units already done, which echoes the elapsed
    /// time. Negative once the counter overshoots the goal. `None` until some progress is made.
    #[must_use]
    pub fn time_left(&self) -> Option<i64> {
        let progressed = self.progressed();
        if progressed <= 0 {
            return None;
        }
        let elapsed = i128::try_from(self.elapsed.as_nanos()).unwrap_or(i128::MAX);
        let pace = elapsed / i128::from(progressed);
        let remaining_units = if self.goal > 0 {
            i128::from(self.goal) - i128::from(progressed)
        } else {
            i128::from(progressed)
        };
        let left = remaining_units.saturating_mul(pace) / NANOS_PER_SEC * NANOS_PER_SEC;
        Some(i64::try_from(left).unwrap_or(if left < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Average units per second since timing started.
    ///
    /// `None` until some progress is made or while no time has passed.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn throughput(&self) -> Option<f64> {
        let progressed = self.progressed();
        let secs = self.elapsed.as_secs_f64();
        (progressed > 0 && secs > 0.0).then(|| progressed as f64 / secs)
    }
}
