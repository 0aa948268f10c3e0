// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window and element measurements.
//!
//! A measurement pass turns a viewport [`Size`] and a container bounding
//! [`Rect`] into the centers and radii used to normalize input. Both halves are
//! always produced together by [`Metrics::measure`].
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_parallax::{Metrics, StageOptions};
//!
//! let options = StageOptions::default();
//! let metrics = Metrics::measure(
//!     Size::new(1000.0, 800.0),
//!     Rect::new(100.0, 100.0, 300.0, 200.0),
//!     &options,
//! );
//! assert_eq!(metrics.window.center_x, 500.0);
//! assert_eq!(metrics.window.radius_x, 500.0);
//! assert_eq!(metrics.element.width, 200.0);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::options::{ElementCenter, StageOptions};

/// Viewport measurements relative to the configured origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WindowMetrics {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
    /// Horizontal anchor, `width * origin_x`.
    pub center_x: f64,
    /// Vertical anchor, `height * origin_y`.
    pub center_y: f64,
    /// Larger horizontal distance from the anchor to an edge.
    pub radius_x: f64,
    /// Larger vertical distance from the anchor to an edge.
    pub radius_y: f64,
}

impl WindowMetrics {
    /// Measures a viewport of `size` around the fractional origin.
    #[must_use]
    pub fn measure(size: Size, origin_x: f64, origin_y: f64) -> Self {
        let center_x = size.width * origin_x;
        let center_y = size.height * origin_y;
        Self {
            width: size.width,
            height: size.height,
            center_x,
            center_y,
            radius_x: center_x.max(size.width - center_x),
            radius_y: center_y.max(size.height - center_y),
        }
    }

    /// Anchor point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Radii as a vector.
    #[must_use]
    pub fn radius(&self) -> Vec2 {
        Vec2::new(self.radius_x, self.radius_y)
    }
}

/// Container measurements relative to the configured origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ElementMetrics {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Top edge in viewport coordinates.
    pub top: f64,
    /// Left edge in viewport coordinates.
    pub left: f64,
    /// Bottom edge in viewport coordinates.
    pub bottom: f64,
    /// Right edge in viewport coordinates.
    pub right: f64,
    /// Horizontal anchor; see [`ElementCenter`].
    pub center_x: f64,
    /// Vertical anchor; see [`ElementCenter`].
    pub center_y: f64,
    /// Larger horizontal distance from the anchor to an edge of the box.
    pub radius_x: f64,
    /// Larger vertical distance from the anchor to an edge of the box.
    pub radius_y: f64,
}

impl ElementMetrics {
    /// Measures a bounding box around the fractional origin.
    ///
    /// The box is normalized first, so rectangles with swapped corners measure
    /// the same as their canonical form.
    #[must_use]
    pub fn measure(bounds: Rect, origin_x: f64, origin_y: f64, center: ElementCenter) -> Self {
        let bounds = bounds.abs();
        let width = bounds.width();
        let height = bounds.height();
        Self {
            width,
            height,
            top: bounds.y0,
            left: bounds.x0,
            bottom: bounds.y1,
            right: bounds.x1,
            center_x: center.center(bounds.x0, width, origin_x),
            center_y: center.center(bounds.y0, height, origin_y),
            radius_x: (width * origin_x).max(width * (1.0 - origin_x)),
            radius_y: (height * origin_y).max(height * (1.0 - origin_y)),
        }
    }

    /// Bounding box in viewport coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// Returns `true` if `point` lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Anchor point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Radii as a vector.
    #[must_use]
    pub fn radius(&self) -> Vec2 {
        Vec2::new(self.radius_x, self.radius_y)
    }

    /// Box size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One complete measurement pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Metrics {
    /// Viewport half.
    pub window: WindowMetrics,
    /// Container half.
    pub element: ElementMetrics,
}

impl Metrics {
    /// Measures viewport and container with the origin and center formula from `options`.
    #[must_use]
    pub fn measure(viewport: Size, element: Rect, options: &StageOptions) -> Self {
        Self {
            window: WindowMetrics::measure(viewport, options.origin_x, options.origin_y),
            element: ElementMetrics::measure(
                element,
                options.origin_x,
                options.origin_y,
                options.element_center,
            ),
        }
    }

    /// Normalized offset of `point` from the anchor, per axis.
    ///
    /// With `relative_to_element` the element anchor and radii are used,
    /// otherwise the window's. Radii are floored at `min_radius`, so the result
    /// is finite for any finite `point`.
    #[must_use]
    pub fn pointer_percentage(&self, point: Point, options: &StageOptions) -> Vec2 {
        let (center, radius) = if options.relative_to_element {
            (self.element.center(), self.element.radius())
        } else {
            (self.window.center(), self.window.radius())
        };
        let offset = point - center;
        Vec2::new(
            offset.x / radius.x.max(options.min_radius),
            offset.y / radius.y.max(options.min_radius),
        )
    }
}
