// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Size, Vec2};

/// Motion handed from a stage to its children.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Displacement {
    /// Horizontal movement.
    pub movement_x: f64,
    /// Vertical movement.
    pub movement_y: f64,
}

impl Displacement {
    /// No movement.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a displacement.
    #[must_use]
    pub const fn new(movement_x: f64, movement_y: f64) -> Self {
        Self {
            movement_x,
            movement_y,
        }
    }

    /// Scales a normalized percentage by the element size and the stage scalars.
    ///
    /// ```
    /// use kurbo::{Size, Vec2};
    /// use understory_parallax::Displacement;
    ///
    /// let d = Displacement::from_percentage(
    ///     Size::new(200.0, 100.0),
    ///     Vec2::new(0.5, -1.0),
    ///     Vec2::new(0.1, 0.1),
    /// );
    /// assert_eq!(d, Displacement::new(10.0, -10.0));
    /// ```
    #[must_use]
    pub fn from_percentage(element: Size, percentage: Vec2, scalar: Vec2) -> Self {
        Self::new(
            element.width * percentage.x * scalar.x,
            element.height * percentage.y * scalar.y,
        )
    }

    /// Both components as a vector.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.movement_x, self.movement_y)
    }
}

impl From<Displacement> for Vec2 {
    fn from(d: Displacement) -> Self {
        d.to_vec2()
    }
}
