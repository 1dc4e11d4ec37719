//! # Search Budgets
//!
//! Exhaustive enumeration has no built-in bound: a grammar with deep
//! coordination can blow up combinatorially. A `SearchBudget` caps a search by
//! step count and/or wall-clock time; a `BudgetMeter` charges one unit per
//! step and reports exhaustion as `CoreError::BudgetExceeded`.
//!
//! ```rust
//! use montague_core::budget::SearchBudget;
//!
//! let budget = SearchBudget::unlimited().with_max_steps(2);
//! let mut meter = budget.start();
//! assert!(meter.charge().is_ok());
//! assert!(meter.charge().is_ok());
//! assert!(meter.charge().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::CoreError;

/// Limits for a single search.
///
/// Both limits are optional; `SearchBudget::default()` is unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Maximum number of search steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
    /// Maximum wall-clock time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_millis: Option<u64>,
}

impl SearchBudget {
    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Cap the number of steps.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Cap the wall-clock time.
    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_millis = Some(duration.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    /// True when neither limit is set.
    pub fn is_unlimited(&self) -> bool {
        self.max_steps.is_none() && self.max_millis.is_none()
    }

    /// The time limit, if any.
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_millis.map(Duration::from_millis)
    }

    /// Start metering a search against this budget.
    pub fn start(&self) -> BudgetMeter {
        BudgetMeter {
            budget: *self,
            steps: 0,
            started: Instant::now(),
        }
    }
}

/// Running account of one search against its budget.
#[derive(Debug, Clone)]
pub struct BudgetMeter {
    budget: SearchBudget,
    steps: u64,
    started: Instant,
}

impl BudgetMeter {
    /// Charge one step.
    ///
    /// Fails once the step count would exceed `max_steps` or the elapsed time
    /// exceeds `max_millis`.
    pub fn charge(&mut self) -> Result<(), CoreError> {
        if let Some(max) = self.budget.max_steps {
            if self.steps >= max {
                return Err(self.exceeded());
            }
        }
        if let Some(limit) = self.budget.max_duration() {
            if self.started.elapsed() > limit {
                return Err(self.exceeded());
            }
        }
        self.steps += 1;
        Ok(())
    }

    /// Steps charged so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time since the meter started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn exceeded(&self) -> CoreError {
        CoreError::BudgetExceeded {
            steps: self.steps,
            elapsed: self.started.elapsed(),
        }
    }
}
