//! Iterator adapters that drive a [`ProgressBar`].
//!
//! [`ProgressIteratorExt`] adds `.progress()` to every [`Iterator`]. Each yielded item
//! increments the bar; exhausting the iterator finishes it.
//!
//! The goal comes from [`Iterator::size_hint`]: an exact hint gives a goal, anything
//! else gives an indeterminate bar.
//!
//! ```no_run
//! use progress_line::ProgressIteratorExt;
//!
//! for line in std::fs::read_to_string("input.txt").unwrap().lines().progress() {
//!     // ...
//! }
//! ```

use crate::{ProgressBar, builder::ProgressBarBuilder};

/// An iterator that counts every item it yields into a [`ProgressBar`].
pub struct ProgressIter<I> {
    iter: I,
    bar: ProgressBar,
}

impl<I> ProgressIter<I> {
    /// Wraps `iter`. Usually built via [`ProgressIteratorExt`].
    pub const fn new(iter: I, bar: ProgressBar) -> Self {
        Self { iter, bar }
    }

    /// Returns the bar being driven.
    pub const fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl<I: Iterator> Iterator for ProgressIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();
        if item.is_some() {
            self.bar.increment();
        } else {
            self.bar.finish();
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach a [`ProgressBar`] to any iterator.
pub trait ProgressIteratorExt: Iterator + Sized {
    /// Wraps the iterator in a started bar with the default configuration.
    fn progress(self) -> ProgressIter<Self> {
        self.progress_with(ProgressBarBuilder::default())
    }

    /// Wraps the iterator in a started bar built from `builder`.
    ///
    /// The builder's goal is replaced by the iterator's exact length, if it has one.
    fn progress_with(self, builder: ProgressBarBuilder) -> ProgressIter<Self> {
        let builder = match exact_len(&self) {
            0 => builder,
            len => builder.goal(len),
        };
        let bar = builder.build();
        bar.start();
        ProgressIter::new(self, bar)
    }

    /// Wraps the iterator using an existing bar, left as it is.
    fn progress_in(self, bar: ProgressBar) -> ProgressIter<Self> {
        ProgressIter::new(self, bar)
    }
}

impl<I: Iterator> ProgressIteratorExt for I {}

fn exact_len<I: Iterator>(iter: &I) -> i64 {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => i64::try_from(upper).unwrap_or(i64::MAX),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressIteratorExt as _;
    use crate::ProgressBar;

    /// Iterator Integration
    /// The adapter counts items, infers the goal and finishes on exhaustion.
    #[test]
    fn test_iterator_adapter() {
        let data = [1, 2, 3, 4, 5];
        let builder = ProgressBar::builder(0).not_print(true).manual_update(true);

        let iter = data.iter().progress_with(builder);
        let bar = iter.bar().clone();
        assert_eq!(bar.goal(), 5, "goal should be inferred from the slice length");

        assert_eq!(iter.count(), 5);
        assert_eq!(bar.get(), 5);
        assert!(bar.is_finished(), "exhaustion should finish the bar");
    }

    /// Unknown Length
    #[test]
    fn test_unsized_iterator() {
        let builder = ProgressBar::builder(0).not_print(true).manual_update(true);
        let iter = (0..).take_while(|n| *n < 3).progress_with(builder);
        let bar = iter.bar().clone();

        assert_eq!(iter.sum::<i32>(), 3);
        assert_eq!(bar.goal(), 0);
        assert_eq!(bar.get(), 3);
    }

    #[test]
    fn test_existing_bar() {
        let bar = ProgressBar::builder(10).not_print(true).manual_update(true).build();
        bar.add(7);
        let collected: Vec<_> = "abc".chars().progress_in(bar.clone()).collect();
        assert_eq!(collected, ['a', 'b', 'c']);
        assert_eq!(bar.get(), 10);
        assert!(bar.is_finished());
    }
}
