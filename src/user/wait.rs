use std::time::Duration;

use rand::Rng;

use crate::error::ValidationError;

/// Pause between two tasks of the same user, drawn uniformly from
/// `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    /// # Errors
    ///
    /// Returns an error when `min` is greater than `max`.
    pub fn between(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::WaitRangeInverted { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn constant(wait: Duration) -> Self {
        Self {
            min: wait,
            max: wait,
        }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R>(&self, rng: &mut R) -> Duration
    where
        R: Rng + ?Sized,
    {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(2),
        }
    }
}
