use serde::{Deserialize, Serialize};

/// Result of a step movement. `Entered` is the transition hook: callers match
/// on it to run whatever the newly entered step depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    Entered(usize),
    Unchanged,
}

impl StepChange {
    pub fn entered(self, step: usize) -> bool {
        self == StepChange::Entered(step)
    }
}

/// Bounded 1-based step counter for a linear wizard.
///
/// Invariant: `1 <= current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTracker {
    current: usize,
    max: usize,
}

impl StepTracker {
    pub fn new(max: usize) -> Self {
        Self {
            current: 1,
            max: max.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.max
    }

    pub fn advance(&mut self) -> StepChange {
        if self.current < self.max {
            self.current += 1;
            StepChange::Entered(self.current)
        } else {
            StepChange::Unchanged
        }
    }

    pub fn retreat(&mut self) -> StepChange {
        if self.current > 1 {
            self.current -= 1;
            StepChange::Entered(self.current)
        } else {
            StepChange::Unchanged
        }
    }

    /// Move straight to `step`, clamped into range. Used when a successful
    /// remote call completes several steps at once.
    pub fn jump_to(&mut self, step: usize) -> StepChange {
        let target = step.clamp(1, self.max);
        if target == self.current {
            return StepChange::Unchanged;
        }
        self.current = target;
        StepChange::Entered(target)
    }

    pub fn progress_fraction(&self) -> f64 {
        self.current as f64 / self.max as f64
    }

    pub fn progress_percent(&self) -> u8 {
        (self.progress_fraction() * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub steps: StepTracker,
    pub consent_given: bool,
}

impl WizardState {
    pub fn new(max_step: usize) -> Self {
        Self {
            steps: StepTracker::new(max_step),
            consent_given: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.steps.current()
    }

    pub fn max_step(&self) -> usize {
        self.steps.max()
    }

    pub fn advance(&mut self) -> StepChange {
        self.steps.advance()
    }

    pub fn retreat(&mut self) -> StepChange {
        self.steps.retreat()
    }

    pub fn jump_to(&mut self, step: usize) -> StepChange {
        self.steps.jump_to(step)
    }

    pub fn progress_fraction(&self) -> f64 {
        self.steps.progress_fraction()
    }

    pub fn progress_percent(&self) -> u8 {
        self.steps.progress_percent()
    }
}
