// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage configuration.

use core::fmt;

use kurbo::Vec2;

/// One of the two screen axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// How the element center is derived from its bounding box and origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ElementCenter {
    /// `left + width * origin`: the origin is a fraction of the element's own box.
    #[default]
    Offset,
    /// `(left + width) * origin`.
    ///
    /// This is the formula the widget used in its first releases, and every
    /// stage measured with it until [`ElementCenter::Offset`] became the
    /// default. Select it to reproduce that behavior exactly. It only agrees
    /// with [`ElementCenter::Offset`] when `left == 0` or `origin == 1`.
    Legacy,
}

impl ElementCenter {
    /// Computes the center coordinate along one axis.
    #[must_use]
    pub fn center(self, start: f64, extent: f64, origin: f64) -> f64 {
        match self {
            Self::Offset => start + extent * origin,
            Self::Legacy => (start + extent) * origin,
        }
    }
}

/// Configuration for [`Stage`](crate::Stage).
///
/// Every field has a default, so partial configurations are the norm:
///
/// ```
/// use understory_parallax::StageOptions;
///
/// let options = StageOptions::default()
///     .with_scalar(0.2, 0.2)
///     .clip_to_element(true);
/// assert!(options.validate().is_ok());
/// assert_eq!(options.max_viewing_angle, 30.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StageOptions {
    /// Multiplier applied to the horizontal displacement.
    pub scalar_x: f64,
    /// Multiplier applied to the vertical displacement.
    pub scalar_y: f64,
    /// Horizontal zero-displacement anchor as a fraction of width, in `[0, 1]`.
    pub origin_x: f64,
    /// Vertical zero-displacement anchor as a fraction of height, in `[0, 1]`.
    pub origin_y: f64,
    /// Tilt, in degrees, that maps to a full-range displacement.
    pub max_viewing_angle: f64,
    /// Normalize pointer positions against the element box instead of the viewport.
    pub relative_to_element: bool,
    /// Ignore pointer positions outside the element box.
    pub clip_to_element: bool,
    /// Element center formula.
    pub element_center: ElementCenter,
    /// Lower bound applied to every radius before it is used as a divisor.
    pub min_radius: f64,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            scalar_x: 0.1,
            scalar_y: 0.1,
            origin_x: 0.5,
            origin_y: 0.5,
            max_viewing_angle: 30.0,
            relative_to_element: false,
            clip_to_element: false,
            element_center: ElementCenter::default(),
            min_radius: 1.0,
        }
    }
}

impl StageOptions {
    /// Sets both displacement multipliers.
    #[must_use]
    pub fn with_scalar(mut self, x: f64, y: f64) -> Self {
        self.scalar_x = x;
        self.scalar_y = y;
        self
    }

    /// Sets the fractional origin.
    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Sets the viewing angle, in degrees.
    #[must_use]
    pub fn with_max_viewing_angle(mut self, degrees: f64) -> Self {
        self.max_viewing_angle = degrees;
        self
    }

    /// Normalize pointer positions against the element box.
    #[must_use]
    pub fn relative_to_element(mut self, enabled: bool) -> Self {
        self.relative_to_element = enabled;
        self
    }

    /// Drop pointer positions outside the element box.
    #[must_use]
    pub fn clip_to_element(mut self, enabled: bool) -> Self {
        self.clip_to_element = enabled;
        self
    }

    /// Selects the element center formula.
    #[must_use]
    pub fn with_element_center(mut self, center: ElementCenter) -> Self {
        self.element_center = center;
        self
    }

    /// Sets the radius floor.
    #[must_use]
    pub fn with_min_radius(mut self, min_radius: f64) -> Self {
        self.min_radius = min_radius;
        self
    }

    /// Both multipliers as a vector.
    #[must_use]
    pub fn scalar(&self) -> Vec2 {
        Vec2::new(self.scalar_x, self.scalar_y)
    }

    /// Checks that every field is usable for displacement math.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (axis, value) in [(Axis::X, self.origin_x), (Axis::Y, self.origin_y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OptionsError::OriginOutOfRange { axis, value });
            }
        }
        for (axis, value) in [(Axis::X, self.scalar_x), (Axis::Y, self.scalar_y)] {
            if !value.is_finite() {
                return Err(OptionsError::NonFiniteScalar { axis, value });
            }
        }
        if !(self.max_viewing_angle.is_finite() && self.max_viewing_angle > 0.0) {
            return Err(OptionsError::InvalidViewingAngle(self.max_viewing_angle));
        }
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return Err(OptionsError::InvalidMinRadius(self.min_radius));
        }
        Ok(())
    }
}

/// Error returned by [`StageOptions::validate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OptionsError {
    /// An origin fraction lies outside `[0, 1]` (or is NaN).
    OriginOutOfRange {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: f64,
    },
    /// A displacement multiplier is NaN or infinite.
    NonFiniteScalar {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: f64,
    },
    /// The viewing angle is not a positive finite number of degrees.
    InvalidViewingAngle(f64),
    /// The radius floor is not a positive finite number.
    InvalidMinRadius(f64),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginOutOfRange { axis, value } => {
                write!(f, "origin {axis} must be within [0, 1], got {value}")
            }
            Self::NonFiniteScalar { axis, value } => {
                write!(f, "scalar {axis} must be finite, got {value}")
            }
            Self::InvalidViewingAngle(value) => {
                write!(f, "max viewing angle must be positive, got {value}")
            }
            Self::InvalidMinRadius(value) => {
                write!(f, "minimum radius must be positive, got {value}")
            }
        }
    }
}

impl core::error::Error for OptionsError {}
