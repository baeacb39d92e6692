use super::OPTION_COUNT;

/// Which of the four options of the current question are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Visibility {
    shown: [bool; OPTION_COUNT],
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            shown: [true; OPTION_COUNT],
        }
    }
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.shown = [true; OPTION_COUNT];
    }

    /// Out-of-range indices are never shown.
    pub fn is_shown(&self, index: usize) -> bool {
        self.shown.get(index).copied().unwrap_or(false)
    }

    pub fn hide(&mut self, index: usize) {
        if let Some(shown) = self.shown.get_mut(index) {
            *shown = false;
        }
    }

    pub fn shown_count(&self) -> usize {
        self.shown.iter().filter(|s| **s).count()
    }

    pub fn shown_indices(&self) -> Vec<usize> {
        (0..OPTION_COUNT).filter(|i| self.shown[*i]).collect()
    }
}
