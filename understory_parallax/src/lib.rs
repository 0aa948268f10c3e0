// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_parallax --heading-base-level=0

//! Understory Parallax: a headless parallax stage.
//!
//! A [`Stage`] follows the pointer (or, on handheld devices, the device tilt)
//! and turns it into a [`Displacement`]. Layers read that displacement and
//! shift themselves proportionally; [`CurtainProps`] computes the shift as a
//! `translate3d` transform.
//!
//! The crate owns no event loop and no rendering. Hosts implement
//! [`Environment`] to report viewport and container geometry and to register
//! listeners, then feed delivered events into [`Stage::handle_event`].
//!
//! ## Pointer example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_parallax::{
//!     Children, CurtainProps, HeadlessEnvironment, InputEvent, Stage, StageOptions,
//! };
//!
//! let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0))
//!     .with_element(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let mut stage = Stage::new(StageOptions::default()).unwrap();
//! stage.start(&mut env).unwrap();
//!
//! stage.handle_event(&env, InputEvent::PointerMove(Point::new(750.0, 400.0)));
//!
//! // Two layers moving at different rates.
//! let mut layers: Children<CurtainProps> = Children::Nodes(vec![
//!     CurtainProps::default().with_rate(0.5),
//!     CurtainProps::default().with_rate(2.0),
//! ]);
//! let frame = stage.render(&Default::default(), &mut layers);
//! let offsets: Vec<String> = frame
//!     .children
//!     .iter()
//!     .map(|layer| layer.transform().to_string())
//!     .collect();
//! assert_eq!(offsets, [
//!     "translate3d(5.0px, 0.0px, 0)",
//!     "translate3d(20.0px, 0.0px, 0)",
//! ]);
//!
//! stage.stop(&mut env);
//! ```
//!
//! ## Orientation example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_parallax::{
//!     Capabilities, Displacement, HeadlessEnvironment, InputEvent, Mode, Orientation, Stage,
//!     StageOptions, StageUpdate,
//! };
//!
//! let mut env = HeadlessEnvironment::new(Size::new(390.0, 844.0))
//!     .with_element(Rect::new(0.0, 0.0, 300.0, 600.0))
//!     .with_capabilities(Capabilities::HANDHELD);
//! let mut stage = Stage::new(StageOptions::default()).unwrap();
//! assert_eq!(stage.start(&mut env), Ok(Mode::Orientation));
//!
//! // The first sample only sets the zero reference.
//! let first = InputEvent::Orientation(Orientation::new(0.0, 45.0));
//! assert_eq!(stage.handle_event(&env, first), StageUpdate::Calibrated);
//!
//! let tilted = InputEvent::Orientation(Orientation::new(15.0, 45.0));
//! assert_eq!(
//!     stage.handle_event(&env, tilted),
//!     StageUpdate::Moved(Displacement::new(15.0, 0.0))
//! );
//! ```
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to `kurbo`.
//! - `serde`: `Serialize`/`Deserialize` for [`StageOptions`] (camelCase keys,
//!   every key optional) and the plain-data output types.
//! - `tracing`: lifecycle and dropped-event diagnostics under the
//!   `understory_parallax` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod calibration;
mod children;
mod curtain;
mod displacement;
mod environment;
mod metrics;
mod mode;
mod options;
mod stage;

pub use calibration::{Calibration, normalize_angle};
pub use children::{AcceptMovement, AttrValue, Attributes, Children, Frame, MOVEMENT_X, MOVEMENT_Y};
pub use curtain::{Curtain, CurtainOutput, CurtainProps, TRANSFORM, Translate3d};
pub use displacement::Displacement;
pub use environment::{
    Environment, EventKind, HeadlessEnvironment, InputEvent, ListenerId, Orientation,
};
pub use metrics::{ElementMetrics, Metrics, WindowMetrics};
pub use mode::{Capabilities, Mode, detect_mode, is_mobile_user_agent};
pub use options::{Axis, ElementCenter, OptionsError, StageOptions};
pub use stage::{Stage, StageError, StageUpdate};
