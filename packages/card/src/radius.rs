//! Search radius planning from reported GPS accuracy.
//!
//! A poor fix (indoors, urban canyon) has to search wider to find any
//! street at all, so the snap radius grows with the reported accuracy
//! between a floor and a cap. The POI radius is fixed.

use serde::Deserialize;

use crate::ConfigError;

/// Factor applied to the reported accuracy before clamping.
pub const ACCURACY_MULTIPLIER: f64 = 2.0;

/// Default snap radius floor in meters.
pub const DEFAULT_SNAP_FLOOR_M: u32 = 25;

/// Default snap radius cap in meters.
pub const DEFAULT_SNAP_CAP_M: u32 = 250;

/// Default fixed POI search radius in meters.
pub const DEFAULT_POI_RADIUS_M: u32 = 600;

/// Bounds for an accuracy-derived radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RadiusPolicy {
    /// Smallest radius ever returned.
    pub floor_m: u32,
    /// Largest radius ever returned.
    pub cap_m: u32,
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            floor_m: DEFAULT_SNAP_FLOOR_M,
            cap_m: DEFAULT_SNAP_CAP_M,
        }
    }
}

impl RadiusPolicy {
    /// Creates a policy with the given bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `floor_m` exceeds `cap_m`.
    pub fn new(floor_m: u32, cap_m: u32) -> Result<Self, ConfigError> {
        let policy = Self { floor_m, cap_m };
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that the floor does not exceed the cap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `floor_m` exceeds `cap_m`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floor_m > self.cap_m {
            return Err(ConfigError::Invalid {
                message: format!(
                    "snap radius floor {} m exceeds cap {} m",
                    self.floor_m, self.cap_m
                ),
            });
        }
        Ok(())
    }

    /// Plans the radius for a fix with the given accuracy.
    ///
    /// Returns `accuracy_m * 2` clamped to `[floor_m, cap_m]` and rounded
    /// to whole meters. Never fails: zero, negative, and `NaN` accuracy all
    /// yield the floor.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn plan(&self, accuracy_m: f64) -> u32 {
        // `f64::max` returns the non-NaN operand.
        let radius = (accuracy_m * ACCURACY_MULTIPLIER)
            .max(f64::from(self.floor_m))
            .min(f64::from(self.cap_m))
            .round();
        radius as u32
    }
}
