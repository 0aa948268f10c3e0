// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input mode detection.
//!
//! A stage reads pointer movement on desktop-like hosts and device
//! orientation on handheld ones. The choice is a pure function of the host's
//! [`Capabilities`]:
//!
//! ```
//! use understory_parallax::{Capabilities, Mode, detect_mode};
//!
//! let phone = Capabilities::from_user_agent(
//!     true,
//!     "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
//! );
//! assert_eq!(detect_mode(phone), Mode::Orientation);
//!
//! // Laptops often expose the orientation API without a sensor behind it.
//! let laptop = Capabilities::from_user_agent(true, "Mozilla/5.0 (X11; Linux x86_64)");
//! assert_eq!(detect_mode(laptop), Mode::Pointer);
//! ```

/// Input source a stage listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Pointer position drives displacement.
    #[default]
    Pointer,
    /// Device tilt drives displacement.
    Orientation,
}

/// What the host environment can deliver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// The host can deliver device orientation events.
    pub orientation_events: bool,
    /// The host looks like a handheld device.
    pub mobile: bool,
}

impl Capabilities {
    /// Desktop host: pointer only.
    pub const POINTER_ONLY: Self = Self {
        orientation_events: false,
        mobile: false,
    };

    /// Handheld host with an orientation sensor.
    pub const HANDHELD: Self = Self {
        orientation_events: true,
        mobile: true,
    };

    /// Derives the `mobile` flag from a user-agent string.
    #[must_use]
    pub fn from_user_agent(orientation_events: bool, user_agent: &str) -> Self {
        Self {
            orientation_events,
            mobile: is_mobile_user_agent(user_agent),
        }
    }
}

/// User-agent fragments that identify handheld browsers.
const MOBILE_TOKENS: &[&str] = &[
    "mobi",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "webos",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Returns `true` if `user_agent` contains a handheld token, ignoring ASCII case.
#[must_use]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let haystack = user_agent.as_bytes();
    MOBILE_TOKENS.iter().any(|token| {
        let needle = token.as_bytes();
        haystack
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle))
    })
}

/// Selects the input mode for a host.
///
/// Orientation requires both the event source and a handheld signature;
/// everything else falls back to the pointer.
#[must_use]
pub fn detect_mode(capabilities: Capabilities) -> Mode {
    if capabilities.orientation_events && capabilities.mobile {
        Mode::Orientation
    } else {
        Mode::Pointer
    }
}
