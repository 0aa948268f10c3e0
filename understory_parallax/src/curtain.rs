// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curtain: a layer that follows the stage at its own rate.
//!
//! A curtain multiplies the received movement by a per-axis rate and exposes
//! the result as a `translate3d` transform rounded to one decimal place.
//!
//! ```
//! use understory_parallax::CurtainProps;
//!
//! let props = CurtainProps::new(10.0, 20.0).with_rate(0.5);
//! assert_eq!(props.transform().to_string(), "translate3d(5.0px, 10.0px, 0)");
//!
//! // Per-axis rates win over the shared one.
//! let props = CurtainProps::new(10.0, 20.0).with_rate(0.5).with_rate_x(0.2);
//! assert_eq!(props.transform().x, 2.0);
//! assert_eq!(props.transform().y, 10.0);
//! ```

use alloc::string::ToString;
use core::fmt;

use kurbo::Vec2;

use crate::children::{AcceptMovement, AttrValue, Attributes};
use crate::displacement::Displacement;

/// Style key the curtain writes its transform to.
pub const TRANSFORM: &str = "transform";

fn round_tenth(value: f64) -> f64 {
    let rounded = libm::round(value * 10.0) / 10.0;
    // Avoid printing "-0.0" for offsets that round to zero from below.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// A 3D translation with the z component fixed at zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Translate3d {
    /// Horizontal offset in pixels, rounded to one decimal place.
    pub x: f64,
    /// Vertical offset in pixels, rounded to one decimal place.
    pub y: f64,
}

impl Translate3d {
    /// Rounds `offset` to one decimal place per axis.
    #[must_use]
    pub fn from_offset(offset: Vec2) -> Self {
        Self {
            x: round_tenth(offset.x),
            y: round_tenth(offset.y),
        }
    }

    /// Offset as a vector.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl fmt::Display for Translate3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate3d({:.1}px, {:.1}px, 0)", self.x, self.y)
    }
}

/// Inputs of a curtain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurtainProps {
    /// Horizontal movement received from the stage.
    pub movement_x: f64,
    /// Vertical movement received from the stage.
    pub movement_y: f64,
    /// Rate applied to both axes unless overridden.
    pub relative_rate: f64,
    /// Horizontal rate override.
    pub relative_rate_x: Option<f64>,
    /// Vertical rate override.
    pub relative_rate_y: Option<f64>,
    /// Caller style; the transform is merged into it.
    pub style: Attributes,
    /// Other attributes, passed through untouched.
    pub attributes: Attributes,
}

impl CurtainProps {
    /// Creates props for the given movement with a zero rate.
    #[must_use]
    pub fn new(movement_x: f64, movement_y: f64) -> Self {
        Self {
            movement_x,
            movement_y,
            ..Self::default()
        }
    }

    /// Sets the shared rate.
    #[must_use]
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.relative_rate = rate;
        self
    }

    /// Overrides the horizontal rate.
    #[must_use]
    pub fn with_rate_x(mut self, rate: f64) -> Self {
        self.relative_rate_x = Some(rate);
        self
    }

    /// Overrides the vertical rate.
    #[must_use]
    pub fn with_rate_y(mut self, rate: f64) -> Self {
        self.relative_rate_y = Some(rate);
        self
    }

    /// Adds a style entry.
    #[must_use]
    pub fn with_style(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Adds a passthrough attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Effective per-axis rates.
    #[must_use]
    pub fn rates(&self) -> Vec2 {
        Vec2::new(
            self.relative_rate_x.unwrap_or(self.relative_rate),
            self.relative_rate_y.unwrap_or(self.relative_rate),
        )
    }

    /// Unrounded pixel offset.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        let rates = self.rates();
        Vec2::new(self.movement_x * rates.x, self.movement_y * rates.y)
    }

    /// Rounded translation.
    #[must_use]
    pub fn transform(&self) -> Translate3d {
        Translate3d::from_offset(self.offset())
    }

    /// Computes the curtain's presentation.
    #[must_use]
    pub fn render(&self) -> CurtainOutput {
        let transform = self.transform();
        let mut style = self.style.clone();
        style.insert(TRANSFORM.into(), AttrValue::Text(transform.to_string()));
        CurtainOutput {
            transform,
            style,
            attributes: self.attributes.clone(),
        }
    }
}

impl AcceptMovement for CurtainProps {
    fn accept_movement(&mut self, displacement: Displacement) {
        self.movement_x = displacement.movement_x;
        self.movement_y = displacement.movement_y;
    }
}

/// What a curtain presents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurtainOutput {
    /// The translation.
    pub transform: Translate3d,
    /// Caller style with [`TRANSFORM`] set.
    pub style: Attributes,
    /// Passthrough attributes.
    pub attributes: Attributes,
}

/// Memoizing curtain.
///
/// [`Curtain::render`] recomputes only when the props differ from the
/// previous call.
#[derive(Clone, Debug, Default)]
pub struct Curtain {
    last: Option<(CurtainProps, CurtainOutput)>,
    renders: u64,
}

impl Curtain {
    /// Creates a curtain that has not rendered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the output for `props`, reusing the previous one when equal.
    pub fn render(&mut self, props: &CurtainProps) -> &CurtainOutput {
        let stale = self.last.as_ref().is_none_or(|(prev, _)| prev != props);
        if stale {
            self.renders += 1;
            self.last = None;
        }
        let (_, output) = self
            .last
            .get_or_insert_with(|| (props.clone(), props.render()));
        output
    }

    /// Number of times the output was recomputed.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }
}
