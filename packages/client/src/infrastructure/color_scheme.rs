//! Color-scheme probes.

use crate::domain::ColorSchemeProbe;

/// Reads the terminal's background from `COLORFGBG` (`"<fg>;<bg>"`, as set
/// by rxvt, Konsole and others). Unknown or absent values mean light.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalColorScheme;

impl ColorSchemeProbe for TerminalColorScheme {
    fn prefers_dark(&self) -> bool {
        std::env::var("COLORFGBG")
            .map(|value| colorfgbg_is_dark(&value))
            .unwrap_or(false)
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme {
    pub dark: bool,
}

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// Background indices 0-6 and 8 are the dark ANSI colors
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}
