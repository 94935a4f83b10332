use std::sync::atomic::{AtomicBool, Ordering};

/// Dark/light flag. Starts light.
#[derive(Debug, Default)]
pub struct ThemeService {
    dark: AtomicBool,
}

impl ThemeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    /// Flip the theme and return the new value of `is_dark`.
    pub fn toggle(&self) -> bool {
        !self.dark.fetch_xor(true, Ordering::Relaxed)
    }
}
