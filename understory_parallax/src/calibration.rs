// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation calibration.
//!
//! The first orientation sample after a stage starts becomes the zero
//! reference; every later sample is reported relative to it.
//!
//! ```
//! use kurbo::Vec2;
//! use understory_parallax::{Calibration, Orientation};
//!
//! let mut calibration = Calibration::default();
//! assert_eq!(calibration.sample(Orientation::new(10.04, -3.0)), None);
//! assert_eq!(
//!     calibration.sample(Orientation::new(16.0, -3.0)),
//!     Some(Vec2::new(6.0, 0.0))
//! );
//! ```

use kurbo::{Point, Vec2};

use crate::environment::Orientation;

/// Rounds a tilt angle to one decimal place.
#[must_use]
pub fn normalize_angle(degrees: f64) -> f64 {
    libm::round(degrees * 10.0) / 10.0
}

/// Zero reference for orientation samples.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Calibration {
    reference: Option<Point>,
}

impl Calibration {
    /// The captured reference, `x` being left/right tilt and `y` front/back.
    #[must_use]
    pub fn reference(&self) -> Option<Point> {
        self.reference
    }

    /// Returns `true` once a reference has been captured.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.reference.is_some()
    }

    /// Feeds one sample.
    ///
    /// The first sample is stored as the reference and yields `None`. Later
    /// samples yield their normalized offset from the reference, in degrees.
    pub fn sample(&mut self, orientation: Orientation) -> Option<Vec2> {
        let current = Point::new(
            normalize_angle(orientation.gamma),
            normalize_angle(orientation.beta),
        );
        match self.reference {
            None => {
                self.reference = Some(current);
                None
            }
            Some(reference) => Some(current - reference),
        }
    }

    /// Forgets the reference.
    pub fn reset(&mut self) {
        self.reference = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_round_to_one_decimal() {
        assert_eq!(normalize_angle(12.34), 12.3);
        assert_eq!(normalize_angle(12.36), 12.4);
        assert_eq!(normalize_angle(-7.06), -7.1);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn first_sample_only_calibrates() {
        let mut calibration = Calibration::default();
        assert!(!calibration.is_calibrated());
        assert_eq!(calibration.sample(Orientation::new(5.0, 45.0)), None);
        assert_eq!(calibration.reference(), Some(Point::new(5.0, 45.0)));
    }

    #[test]
    fn reference_is_captured_once() {
        let mut calibration = Calibration::default();
        calibration.sample(Orientation::new(5.0, 45.0));
        calibration.sample(Orientation::new(20.0, 10.0));
        assert_eq!(calibration.reference(), Some(Point::new(5.0, 45.0)));
    }

    #[test]
    fn equal_axes_still_calibrate() {
        // Identical readings on both axes must not be mistaken for "uncalibrated".
        let mut calibration = Calibration::default();
        assert_eq!(calibration.sample(Orientation::new(0.0, 0.0)), None);
        assert_eq!(
            calibration.sample(Orientation::new(3.0, 3.0)),
            Some(Vec2::new(3.0, 3.0))
        );
    }

    #[test]
    fn reset_forgets_reference() {
        let mut calibration = Calibration::default();
        calibration.sample(Orientation::new(1.0, 1.0));
        calibration.reset();
        assert_eq!(calibration.reference(), None);
        assert_eq!(calibration.sample(Orientation::new(2.0, 2.0)), None);
    }
}
