// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivering a displacement to children.
//!
//! Children come in two shapes, mirroring how stage content is usually
//! written:
//!
//! - [`Children::Render`]: a callback invoked with `(movement_x, movement_y)`
//!   on every delivery.
//! - [`Children::Nodes`]: opaque child descriptors. Each one is cloned and the
//!   movement is injected through [`AcceptMovement`], leaving everything else
//!   on the child untouched.
//!
//! ```
//! use understory_parallax::{AttrValue, Attributes, Children, Displacement, MOVEMENT_X};
//!
//! let mut label = Attributes::new();
//! label.insert("class".into(), AttrValue::from("label"));
//!
//! let mut children: Children<Attributes> = Children::Nodes(vec![label]);
//! let delivered = children.deliver(Displacement::new(4.0, -2.0));
//! assert_eq!(delivered[0].get(MOVEMENT_X), Some(&AttrValue::Number(4.0)));
//! assert_eq!(delivered[0].get("class"), Some(&AttrValue::from("label")));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::displacement::Displacement;

/// Attribute key carrying the horizontal movement.
pub const MOVEMENT_X: &str = "movementX";
/// Attribute key carrying the vertical movement.
pub const MOVEMENT_Y: &str = "movementY";

/// A single attribute value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    /// Numeric value.
    Number(f64),
    /// Boolean flag.
    Flag(bool),
    /// Text value.
    Text(String),
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered attribute map attached to a child or container.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A child that can receive a stage displacement.
pub trait AcceptMovement {
    /// Stores `displacement` on the child, replacing any previous movement.
    fn accept_movement(&mut self, displacement: Displacement);
}

impl AcceptMovement for Attributes {
    fn accept_movement(&mut self, displacement: Displacement) {
        self.insert(MOVEMENT_X.into(), AttrValue::Number(displacement.movement_x));
        self.insert(MOVEMENT_Y.into(), AttrValue::Number(displacement.movement_y));
    }
}

/// Stage content.
pub enum Children<N, F = fn(f64, f64) -> N> {
    /// Render callback, invoked as `f(movement_x, movement_y)`.
    Render(F),
    /// Direct children; all of them receive the movement.
    Nodes(Vec<N>),
}

impl<N, F> fmt::Debug for Children<N, F>
where
    N: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(_) => f.write_str("Render(..)"),
            Self::Nodes(nodes) => f.debug_tuple("Nodes").field(nodes).finish(),
        }
    }
}

impl<N, F> Children<N, F>
where
    N: AcceptMovement + Clone,
    F: FnMut(f64, f64) -> N,
{
    /// Produces the children for `displacement`.
    ///
    /// A render callback yields exactly one child. Node lists yield one clone
    /// per child, in order, each carrying the movement.
    pub fn deliver(&mut self, displacement: Displacement) -> Vec<N> {
        match self {
            Self::Render(render) => vec![render(displacement.movement_x, displacement.movement_y)],
            Self::Nodes(nodes) => nodes
                .iter()
                .map(|node| {
                    let mut node = node.clone();
                    node.accept_movement(displacement);
                    node
                })
                .collect(),
        }
    }
}

/// Output of [`Stage::render`](crate::Stage::render): the container
/// attributes plus the delivered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<N> {
    /// Attributes forwarded unchanged to the container.
    pub attributes: Attributes,
    /// Children carrying the current displacement.
    pub children: Vec<N>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn render_callback_receives_movement_positionally() {
        let mut calls = Vec::new();
        {
            let mut children: Children<Attributes, _> = Children::Render(|x: f64, y: f64| {
                calls.push((x, y));
                Attributes::new()
            });
            children.deliver(Displacement::new(1.5, -2.5));
            children.deliver(Displacement::new(3.0, 0.0));
        }
        assert_eq!(calls, vec![(1.5, -2.5), (3.0, 0.0)]);
    }

    #[test]
    fn every_node_receives_movement() {
        let mut a = Attributes::new();
        a.insert("id".into(), "a".into());
        let mut b = Attributes::new();
        b.insert("id".into(), "b".into());

        let mut children: Children<Attributes> = Children::Nodes(vec![a, b]);
        let out = children.deliver(Displacement::new(7.0, 8.0));

        assert_eq!(out.len(), 2);
        for (node, id) in out.iter().zip(["a", "b"]) {
            assert_eq!(node.get("id"), Some(&AttrValue::from(id)));
            assert_eq!(node.get(MOVEMENT_X), Some(&AttrValue::Number(7.0)));
            assert_eq!(node.get(MOVEMENT_Y), Some(&AttrValue::Number(8.0)));
        }
    }

    #[test]
    fn delivery_does_not_mutate_originals() {
        let mut children: Children<Attributes> = Children::Nodes(vec![Attributes::new()]);
        children.deliver(Displacement::new(1.0, 1.0));
        let Children::Nodes(nodes) = &children else {
            panic!("expected nodes");
        };
        assert!(nodes[0].is_empty());
    }

    #[test]
    fn injected_movement_replaces_stale_values() {
        let mut stale = Attributes::new();
        stale.insert(MOVEMENT_X.into(), AttrValue::Number(99.0));
        stale.accept_movement(Displacement::new(1.0, 2.0));
        assert_eq!(stale.get(MOVEMENT_X), Some(&AttrValue::Number(1.0)));
        assert_eq!(stale.len(), 2);
    }

    #[test]
    fn attribute_values_display_plainly() {
        assert_eq!(format!("{}", AttrValue::from(2.5)), "2.5");
        assert_eq!(format!("{}", AttrValue::from(true)), "true");
        assert_eq!(format!("{}", AttrValue::from("x")), "x");
    }
}
