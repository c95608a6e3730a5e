//! Display width measurement that ignores terminal escape sequences.
//!
//! Prefixes, postfixes and glyphs may carry ANSI colour codes. Those bytes occupy no
//! columns on screen, so layout math must skip them or the bar would come out short.

use unicode_width::UnicodeWidthChar;

const ESC: char = '\x1b';

/// Returns the number of terminal columns `s` occupies.
///
/// CSI sequences (`ESC [` parameters, terminated by a byte in `@`..=`~`) and two-character
/// `ESC x` sequences count as zero. Control characters count as zero as well.
#[must_use]
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != ESC {
            width += c.width().unwrap_or(0);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(_) | None => {}
        }
    }
    width
}
