//! Formatting helpers shared by dump and trace output.

/// Minimum width needed to display indices up to `count - 1`.
///
/// # Examples
/// ```
/// use blank_core::utils::width_for_count;
/// assert_eq!(width_for_count(0), 1);
/// assert_eq!(width_for_count(10), 1);
/// assert_eq!(width_for_count(11), 2);
/// ```
pub fn width_for_count(count: usize) -> usize {
    let mut last = count.saturating_sub(1);
    let mut width = 1;
    while last >= 10 {
        last /= 10;
        width += 1;
    }
    width
}

/// Display width of a string, ignoring ANSI escape sequences.
///
/// ANSI sequences have the form `\x1b[...m` and render as zero-width.
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;

    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Pad `base` with spaces up to `width` display columns, keeping at least
/// two spaces before whatever the caller appends next.
pub fn pad_to(base: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(base)).max(2);
    format!("{base}{:padding$}", "")
}
