use std::collections::VecDeque;

/// Detects a run of strictly increasing costs along one search axis.
///
/// [`push`](Self::push) returns `true` once the last `window` values are
/// strictly increasing; the caller then abandons the axis.
#[derive(Clone, Debug)]
pub struct PlateauDetector {
    window: usize,
    recent: VecDeque<f64>,
}

impl Default for PlateauDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

impl PlateauDetector {
    pub const DEFAULT_WINDOW: usize = 5;

    /// A window below 2 is raised to 2.
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self { window, recent: VecDeque::with_capacity(window) }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn push(&mut self, cost: f64) -> bool {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(cost);
        self.recent.len() == self.window
            && self.recent.iter().zip(self.recent.iter().skip(1)).all(|(a, b)| b > a)
    }

    pub fn reset(&mut self) {
        self.recent.clear();
    }
}
