// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host environment seam.
//!
//! A [`Stage`](crate::Stage) never reaches for global window or device state.
//! Hosts implement [`Environment`] to report the viewport, the container box
//! and their [`Capabilities`], and to register listeners for the
//! [`EventKind`]s a stage asks for. Delivered events are fed back into
//! [`Stage::handle_event`](crate::Stage::handle_event) as [`InputEvent`]s.
//!
//! [`HeadlessEnvironment`] is an in-memory host for tests, demos and benches.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::mode::Capabilities;

/// Kinds of host events a stage can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer moved over the page.
    PointerMove,
    /// Device orientation sample.
    DeviceOrientation,
    /// Viewport resized.
    Resize,
}

/// Handle for a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Device orientation sample, in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    /// Left/right tilt.
    pub gamma: f64,
    /// Front/back tilt.
    pub beta: f64,
}

impl Orientation {
    /// Creates a sample from left/right and front/back tilt.
    #[must_use]
    pub const fn new(gamma: f64, beta: f64) -> Self {
        Self { gamma, beta }
    }

    /// Returns `true` if both angles are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.gamma.is_finite() && self.beta.is_finite()
    }
}

/// An event delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer position in viewport coordinates.
    PointerMove(Point),
    /// Device orientation sample.
    Orientation(Orientation),
    /// The viewport (and possibly the container) changed size.
    Resize,
}

impl InputEvent {
    /// The subscription this event arrives through.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::Orientation(_) => EventKind::DeviceOrientation,
            Self::Resize => EventKind::Resize,
        }
    }
}

/// Capabilities a host provides to a stage.
pub trait Environment {
    /// Current viewport size.
    fn viewport_size(&self) -> Size;

    /// Container bounding box in viewport coordinates, or `None` when the
    /// container is not attached yet.
    fn element_bounds(&self) -> Option<Rect>;

    /// What this host can deliver; drives [`detect_mode`](crate::detect_mode).
    fn capabilities(&self) -> Capabilities;

    /// Registers a listener for `kind`.
    fn subscribe(&mut self, kind: EventKind) -> ListenerId;

    /// Removes a listener. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: ListenerId);
}

/// In-memory [`Environment`].
///
/// ```
/// use kurbo::{Rect, Size};
/// use understory_parallax::{Capabilities, Environment, EventKind, HeadlessEnvironment};
///
/// let mut env = HeadlessEnvironment::new(Size::new(800.0, 600.0))
///     .with_element(Rect::new(0.0, 0.0, 200.0, 100.0))
///     .with_capabilities(Capabilities::POINTER_ONLY);
/// let id = env.subscribe(EventKind::Resize);
/// assert!(env.is_listening(EventKind::Resize));
/// env.unsubscribe(id);
/// assert_eq!(env.listener_count(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeadlessEnvironment {
    viewport: Size,
    element: Option<Rect>,
    capabilities: Capabilities,
    listeners: Vec<(ListenerId, EventKind)>,
    next_id: u64,
}

impl HeadlessEnvironment {
    /// Creates a pointer-only host with a detached container.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Attaches the container at `bounds`.
    #[must_use]
    pub fn with_element(mut self, bounds: Rect) -> Self {
        self.element = Some(bounds);
        self
    }

    /// Replaces the reported capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Changes the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Moves, resizes or detaches the container.
    pub fn set_element(&mut self, bounds: Option<Rect>) {
        self.element = bounds;
    }

    /// Number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if any listener for `kind` is active.
    #[must_use]
    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    /// Active listeners in registration order.
    #[must_use]
    pub fn listeners(&self) -> &[(ListenerId, EventKind)] {
        &self.listeners
    }
}

impl Environment for HeadlessEnvironment {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn element_bounds(&self) -> Option<Rect> {
        self.element
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }
}
