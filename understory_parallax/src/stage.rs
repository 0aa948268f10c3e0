// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage state machine.
//!
//! ## Lifecycle
//!
//! 1) [`Stage::start`] measures the viewport and container, detects the
//!    [`Mode`], and subscribes the mode's input listener plus a resize listener.
//! 2) The host forwards every delivered event to [`Stage::handle_event`].
//! 3) [`Stage::render`] hands the current [`Displacement`] to children.
//! 4) [`Stage::stop`] removes every listener registered by `start`.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_parallax::{
//!     Displacement, HeadlessEnvironment, InputEvent, Mode, Stage, StageOptions, StageUpdate,
//! };
//!
//! let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0))
//!     .with_element(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let mut stage = Stage::new(StageOptions::default()).unwrap();
//!
//! assert_eq!(stage.start(&mut env), Ok(Mode::Pointer));
//! let update = stage.handle_event(&env, InputEvent::PointerMove(Point::new(750.0, 800.0)));
//! assert_eq!(update, StageUpdate::Moved(Displacement::new(10.0, 10.0)));
//!
//! stage.stop(&mut env);
//! assert_eq!(env.listener_count(), 0);
//! ```

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::calibration::Calibration;
use crate::children::{AcceptMovement, Attributes, Children, Frame};
use crate::displacement::Displacement;
use crate::environment::{Environment, EventKind, InputEvent, ListenerId};
use crate::metrics::{ElementMetrics, Metrics, WindowMetrics};
use crate::mode::{Mode, detect_mode};
use crate::options::{OptionsError, StageOptions};

/// Error returned by [`Stage::start`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StageError {
    /// The host reported no container box, so nothing can be measured.
    ElementNotAttached,
    /// The stage is already running.
    AlreadyMounted,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementNotAttached => f.write_str("stage container is not attached"),
            Self::AlreadyMounted => f.write_str("stage is already started"),
        }
    }
}

impl core::error::Error for StageError {}

/// Result of feeding one event to a stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StageUpdate {
    /// The stage is stopped or not subscribed to this kind of event.
    Ignored,
    /// A pointer event fell outside the container while clipping.
    Clipped,
    /// The first orientation sample was stored as the reference.
    Calibrated,
    /// Metrics were refreshed after a resize.
    Remeasured,
    /// A new displacement was computed.
    Moved(Displacement),
}

impl StageUpdate {
    /// Returns `true` if the stage state changed.
    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Ignored | Self::Clipped)
    }
}

/// The last accepted input, replayed after a resize.
#[derive(Copy, Clone, Debug, PartialEq)]
enum LastInput {
    Pointer(Point),
    Tilt(Vec2),
}

#[derive(Debug)]
enum Phase {
    Stopped,
    Running {
        mode: Mode,
        listeners: Vec<(ListenerId, EventKind)>,
    },
}

/// Tracks input and computes the displacement delivered to children.
#[derive(Debug)]
pub struct Stage {
    options: StageOptions,
    phase: Phase,
    metrics: Metrics,
    displacement: Displacement,
    calibration: Calibration,
    last_input: Option<LastInput>,
    revision: u64,
}

impl Stage {
    /// Creates a stopped stage after validating `options`.
    pub fn new(options: StageOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            options,
            phase: Phase::Stopped,
            metrics: Metrics::default(),
            displacement: Displacement::ZERO,
            calibration: Calibration::default(),
            last_input: None,
            revision: 0,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn options(&self) -> &StageOptions {
        &self.options
    }

    /// Selected mode while running.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        match &self.phase {
            Phase::Stopped => None,
            Phase::Running { mode, .. } => Some(*mode),
        }
    }

    /// Returns `true` between [`Stage::start`] and [`Stage::stop`].
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Current displacement.
    #[must_use]
    pub fn displacement(&self) -> Displacement {
        self.displacement
    }

    /// Latest measurement pass.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Latest viewport measurement.
    #[must_use]
    pub fn window_metrics(&self) -> &WindowMetrics {
        &self.metrics.window
    }

    /// Latest container measurement.
    #[must_use]
    pub fn element_metrics(&self) -> &ElementMetrics {
        &self.metrics.element
    }

    /// Orientation calibration state.
    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Incremented once per state-changing update.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Listeners registered by [`Stage::start`] that are still active.
    #[must_use]
    pub fn listeners(&self) -> &[(ListenerId, EventKind)] {
        match &self.phase {
            Phase::Stopped => &[],
            Phase::Running { listeners, .. } => listeners,
        }
    }

    /// Measures, detects the mode and subscribes listeners.
    ///
    /// Measurement happens before any subscription, so a failed start leaves
    /// the environment untouched.
    pub fn start<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<Mode, StageError> {
        if self.is_mounted() {
            return Err(StageError::AlreadyMounted);
        }
        let Some(metrics) = self.measure(env) else {
            pwarn!("start refused: container not attached");
            return Err(StageError::ElementNotAttached);
        };
        self.metrics = metrics;
        self.displacement = Displacement::ZERO;
        self.calibration.reset();
        self.last_input = None;

        let mode = detect_mode(env.capabilities());
        let input = match mode {
            Mode::Pointer => EventKind::PointerMove,
            Mode::Orientation => EventKind::DeviceOrientation,
        };
        let listeners = [input, EventKind::Resize]
            .into_iter()
            .map(|kind| (env.subscribe(kind), kind))
            .collect();
        pdebug!(?mode, "stage started");
        self.phase = Phase::Running { mode, listeners };
        self.revision += 1;
        Ok(mode)
    }

    /// Unsubscribes everything registered by [`Stage::start`].
    ///
    /// Stopping a stopped stage does nothing.
    pub fn stop<E: Environment + ?Sized>(&mut self, env: &mut E) {
        if let Phase::Running { listeners, .. } =
            core::mem::replace(&mut self.phase, Phase::Stopped)
        {
            for (id, _) in listeners {
                env.unsubscribe(id);
            }
            pdebug!("stage stopped");
        }
    }

    /// Applies one host event.
    pub fn handle_event<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        event: InputEvent,
    ) -> StageUpdate {
        if !self.listens_to(event.kind()) {
            ptrace!(kind = ?event.kind(), "event ignored");
            return StageUpdate::Ignored;
        }
        let update = match event {
            InputEvent::Resize => self.on_resize(env),
            InputEvent::PointerMove(point) if !point.is_finite() => {
                pwarn!(?point, "non-finite pointer position ignored");
                StageUpdate::Ignored
            }
            InputEvent::PointerMove(point) => self.on_pointer(point),
            // A bad sample must never become the calibration reference.
            InputEvent::Orientation(orientation) if !orientation.is_finite() => {
                pwarn!(?orientation, "non-finite orientation sample ignored");
                StageUpdate::Ignored
            }
            InputEvent::Orientation(orientation) => match self.calibration.sample(orientation) {
                None => {
                    pdebug!(?orientation, "orientation calibrated");
                    StageUpdate::Calibrated
                }
                Some(delta) => self.on_tilt(delta / self.options.max_viewing_angle),
            },
        };
        if update.is_change() {
            self.revision += 1;
        }
        update
    }

    /// Forwards `attributes` to the container and delivers the displacement
    /// to `children`.
    pub fn render<N, F>(&self, attributes: &Attributes, children: &mut Children<N, F>) -> Frame<N>
    where
        N: AcceptMovement + Clone,
        F: FnMut(f64, f64) -> N,
    {
        Frame {
            attributes: attributes.clone(),
            children: children.deliver(self.displacement),
        }
    }

    fn listens_to(&self, kind: EventKind) -> bool {
        self.listeners().iter().any(|(_, k)| *k == kind)
    }

    fn measure<E: Environment + ?Sized>(&self, env: &E) -> Option<Metrics> {
        let element = env.element_bounds()?;
        Some(Metrics::measure(env.viewport_size(), element, &self.options))
    }

    fn on_resize<E: Environment + ?Sized>(&mut self, env: &E) -> StageUpdate {
        let Some(metrics) = self.measure(env) else {
            pwarn!("resize ignored: container detached");
            return StageUpdate::Ignored;
        };
        self.metrics = metrics;
        match self.last_input {
            Some(LastInput::Pointer(point)) => {
                self.displacement = self.pointer_displacement(point);
            }
            Some(LastInput::Tilt(percentage)) => {
                self.displacement = self.displacement_for(percentage);
            }
            None => {}
        }
        ptrace!(?metrics, "remeasured");
        StageUpdate::Remeasured
    }

    fn on_pointer(&mut self, point: Point) -> StageUpdate {
        if self.options.clip_to_element && !self.metrics.element.contains(point) {
            ptrace!(?point, "pointer clipped");
            return StageUpdate::Clipped;
        }
        self.last_input = Some(LastInput::Pointer(point));
        self.displacement = self.pointer_displacement(point);
        StageUpdate::Moved(self.displacement)
    }

    fn on_tilt(&mut self, percentage: Vec2) -> StageUpdate {
        self.last_input = Some(LastInput::Tilt(percentage));
        self.displacement = self.displacement_for(percentage);
        StageUpdate::Moved(self.displacement)
    }

    fn pointer_displacement(&self, point: Point) -> Displacement {
        self.displacement_for(self.metrics.pointer_percentage(point, &self.options))
    }

    fn displacement_for(&self, percentage: Vec2) -> Displacement {
        Displacement::from_percentage(
            self.metrics.element.size(),
            percentage,
            self.options.scalar(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{HeadlessEnvironment, Orientation};
    use crate::mode::Capabilities;
    use kurbo::{Rect, Size};

    fn desktop() -> HeadlessEnvironment {
        HeadlessEnvironment::new(Size::new(1000.0, 800.0))
            .with_element(Rect::new(0.0, 0.0, 200.0, 100.0))
    }

    fn handheld() -> HeadlessEnvironment {
        desktop().with_capabilities(Capabilities::HANDHELD)
    }

    fn started(options: StageOptions, env: &mut HeadlessEnvironment) -> Stage {
        let mut stage = Stage::new(options).unwrap();
        stage.start(env).unwrap();
        stage
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = Stage::new(StageOptions::default().with_origin(2.0, 0.5)).unwrap_err();
        assert!(matches!(err, OptionsError::OriginOutOfRange { .. }));
    }

    #[test]
    fn start_subscribes_pointer_and_resize() {
        let mut env = desktop();
        let mut stage = Stage::new(StageOptions::default()).unwrap();
        assert_eq!(stage.start(&mut env), Ok(Mode::Pointer));
        assert!(env.is_listening(EventKind::PointerMove));
        assert!(env.is_listening(EventKind::Resize));
        assert!(!env.is_listening(EventKind::DeviceOrientation));
        assert_eq!(stage.listeners().len(), 2);
    }

    #[test]
    fn handheld_start_subscribes_orientation() {
        let mut env = handheld();
        let stage = started(StageOptions::default(), &mut env);
        assert_eq!(stage.mode(), Some(Mode::Orientation));
        assert!(env.is_listening(EventKind::DeviceOrientation));
        assert!(!env.is_listening(EventKind::PointerMove));
    }

    #[test]
    fn start_twice_is_an_error() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        assert_eq!(stage.start(&mut env), Err(StageError::AlreadyMounted));
        assert_eq!(env.listener_count(), 2);
    }

    #[test]
    fn detached_element_fails_without_subscribing() {
        let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0));
        let mut stage = Stage::new(StageOptions::default()).unwrap();
        assert_eq!(stage.start(&mut env), Err(StageError::ElementNotAttached));
        assert_eq!(env.listener_count(), 0);
        assert!(!stage.is_mounted());
        stage.stop(&mut env);
        assert_eq!(env.listener_count(), 0);
    }

    #[test]
    fn stop_removes_every_listener() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        stage.stop(&mut env);
        assert_eq!(env.listener_count(), 0);
        assert_eq!(stage.mode(), None);
        assert!(stage.listeners().is_empty());
    }

    #[test]
    fn stop_leaves_other_stages_alone() {
        let mut env = desktop();
        let mut a = started(StageOptions::default(), &mut env);
        let _b = started(StageOptions::default(), &mut env);
        a.stop(&mut env);
        assert_eq!(env.listener_count(), 2);
    }

    #[test]
    fn events_before_start_are_ignored() {
        let env = desktop();
        let mut stage = Stage::new(StageOptions::default()).unwrap();
        let update = stage.handle_event(&env, InputEvent::PointerMove(Point::new(1.0, 1.0)));
        assert_eq!(update, StageUpdate::Ignored);
        assert_eq!(stage.revision(), 0);
    }

    #[test]
    fn window_relative_pointer_scenario() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        assert_eq!(stage.window_metrics().center_x, 500.0);
        assert_eq!(stage.window_metrics().radius_x, 500.0);

        let update = stage.handle_event(&env, InputEvent::PointerMove(Point::new(750.0, 800.0)));
        assert_eq!(update, StageUpdate::Moved(Displacement::new(10.0, 10.0)));
    }

    #[test]
    fn pointer_at_center_is_still() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(500.0, 400.0)));
        assert_eq!(stage.displacement(), Displacement::ZERO);
    }

    #[test]
    fn element_relative_edge_is_full_range() {
        let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0))
            .with_element(Rect::new(300.0, 200.0, 500.0, 300.0));
        let options = StageOptions::default()
            .relative_to_element(true)
            .with_scalar(1.0, 1.0);
        let mut stage = started(options, &mut env);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(500.0, 200.0)));
        assert_eq!(stage.displacement(), Displacement::new(200.0, -100.0));
    }

    #[test]
    fn legacy_center_shifts_the_anchor() {
        let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0))
            .with_element(Rect::new(100.0, 0.0, 300.0, 100.0));
        let options = StageOptions::default()
            .relative_to_element(true)
            .with_element_center(crate::ElementCenter::Legacy)
            .with_scalar(1.0, 1.0);
        let mut stage = started(options, &mut env);
        // (100 + 200) * 0.5 rather than 100 + 200 * 0.5
        assert_eq!(stage.element_metrics().center_x, 150.0);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(150.0, 50.0)));
        assert_eq!(stage.displacement(), Displacement::ZERO);
    }

    #[test]
    fn clipped_pointer_leaves_state_untouched() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default().clip_to_element(true), &mut env);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(150.0, 50.0)));
        let before = (stage.displacement(), stage.revision());

        let update = stage.handle_event(&env, InputEvent::PointerMove(Point::new(201.0, 50.0)));
        assert_eq!(update, StageUpdate::Clipped);
        assert_eq!((stage.displacement(), stage.revision()), before);
    }

    #[test]
    fn unsubscribed_kind_is_ignored() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        let update = stage.handle_event(&env, InputEvent::Orientation(Orientation::new(10.0, 10.0)));
        assert_eq!(update, StageUpdate::Ignored);
        assert!(!stage.calibration().is_calibrated());
    }

    #[test]
    fn first_orientation_sample_calibrates() {
        let mut env = handheld();
        let mut stage = started(StageOptions::default(), &mut env);
        let update = stage.handle_event(&env, InputEvent::Orientation(Orientation::new(5.0, 40.0)));
        assert_eq!(update, StageUpdate::Calibrated);
        assert_eq!(stage.displacement(), Displacement::ZERO);

        let update = stage.handle_event(&env, InputEvent::Orientation(Orientation::new(20.0, 25.0)));
        // (20 - 5) / 30 = 0.5 and (25 - 40) / 30 = -0.5
        assert_eq!(update, StageUpdate::Moved(Displacement::new(10.0, -5.0)));
    }

    #[test]
    fn non_finite_orientation_does_not_calibrate() {
        let mut env = handheld();
        let mut stage = started(StageOptions::default(), &mut env);
        for bad in [
            Orientation::new(f64::NAN, 10.0),
            Orientation::new(10.0, f64::INFINITY),
        ] {
            assert_eq!(
                stage.handle_event(&env, InputEvent::Orientation(bad)),
                StageUpdate::Ignored
            );
        }
        assert!(!stage.calibration().is_calibrated());
        assert_eq!(stage.revision(), 1);

        assert_eq!(
            stage.handle_event(&env, InputEvent::Orientation(Orientation::new(10.0, 10.0))),
            StageUpdate::Calibrated
        );
        // (25 - 10) / 30 = 0.5
        assert_eq!(
            stage.handle_event(&env, InputEvent::Orientation(Orientation::new(25.0, 10.0))),
            StageUpdate::Moved(Displacement::new(10.0, 0.0))
        );
        // Dropped after calibration too; the last displacement stands.
        assert_eq!(
            stage.handle_event(&env, InputEvent::Orientation(Orientation::new(f64::NAN, f64::NAN))),
            StageUpdate::Ignored
        );
        assert_eq!(stage.displacement(), Displacement::new(10.0, 0.0));
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(750.0, 400.0)));
        let before = (stage.displacement(), stage.revision());

        for bad in [
            Point::new(f64::NAN, 400.0),
            Point::new(750.0, f64::NEG_INFINITY),
        ] {
            assert_eq!(
                stage.handle_event(&env, InputEvent::PointerMove(bad)),
                StageUpdate::Ignored
            );
            assert_eq!((stage.displacement(), stage.revision()), before);
        }

        // Resize replays the last finite position.
        env.set_viewport(Size::new(500.0, 800.0));
        stage.handle_event(&env, InputEvent::Resize);
        let d = stage.displacement();
        assert!(d.movement_x.is_finite() && d.movement_y.is_finite());
    }

    #[test]
    fn restart_recalibrates() {
        let mut env = handheld();
        let mut stage = started(StageOptions::default(), &mut env);
        stage.handle_event(&env, InputEvent::Orientation(Orientation::new(5.0, 40.0)));
        stage.stop(&mut env);
        stage.start(&mut env).unwrap();
        assert!(!stage.calibration().is_calibrated());
        assert_eq!(
            stage.handle_event(&env, InputEvent::Orientation(Orientation::new(0.0, 0.0))),
            StageUpdate::Calibrated
        );
    }

    #[test]
    fn resize_replays_last_pointer() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(750.0, 400.0)));
        assert_eq!(stage.displacement(), Displacement::new(10.0, 0.0));

        env.set_viewport(Size::new(500.0, 800.0));
        env.set_element(Some(Rect::new(0.0, 0.0, 400.0, 100.0)));
        assert_eq!(stage.handle_event(&env, InputEvent::Resize), StageUpdate::Remeasured);
        // (750 - 250) / 250 = 2, then 400 * 2 * 0.1
        assert_eq!(stage.displacement(), Displacement::new(80.0, 0.0));
        assert_eq!(stage.mode(), Some(Mode::Pointer));
    }

    #[test]
    fn resize_with_detached_element_keeps_metrics() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        let before = *stage.metrics();
        env.set_element(None);
        assert_eq!(stage.handle_event(&env, InputEvent::Resize), StageUpdate::Ignored);
        assert_eq!(*stage.metrics(), before);
    }

    #[test]
    fn revision_counts_state_changes() {
        let mut env = desktop();
        let mut stage = started(StageOptions::default(), &mut env);
        assert_eq!(stage.revision(), 1);
        stage.handle_event(&env, InputEvent::PointerMove(Point::new(1.0, 1.0)));
        stage.handle_event(&env, InputEvent::Resize);
        assert_eq!(stage.revision(), 3);
    }
}
