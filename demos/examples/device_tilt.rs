// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation-driven parallax.
//!
//! Simulate a phone: detect the mode from a user agent, calibrate on the
//! first sample, then tilt and rotate the device.
//!
//! Run:
//! - `cargo run -p understory_parallax_demos --example device_tilt`

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_parallax::{
    Capabilities, HeadlessEnvironment, InputEvent, Orientation, Stage, StageOptions,
};

const USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut env = HeadlessEnvironment::new(Size::new(390.0, 844.0))
        .with_element(Rect::new(0.0, 100.0, 390.0, 600.0))
        .with_capabilities(Capabilities::from_user_agent(true, USER_AGENT));
    let mut stage = Stage::new(StageOptions::default().with_max_viewing_angle(25.0))?;
    println!("mode: {:?}", stage.start(&mut env)?);

    let samples = [
        Orientation::new(1.23, 42.0),
        Orientation::new(6.2, 42.0),
        Orientation::new(13.7, 35.5),
        Orientation::new(-11.8, 50.1),
    ];
    for sample in samples {
        let update = stage.handle_event(&env, InputEvent::Orientation(sample));
        let d = stage.displacement();
        println!(
            "gamma {:>6.2} beta {:>6.2} -> {update:?} (x:{:.1} y:{:.1})",
            sample.gamma, sample.beta, d.movement_x, d.movement_y
        );
    }

    // Rotating to landscape re-measures and rescales the last tilt.
    env.set_viewport(Size::new(844.0, 390.0));
    env.set_element(Some(Rect::new(100.0, 0.0, 700.0, 390.0)));
    stage.handle_event(&env, InputEvent::Resize);
    let d = stage.displacement();
    println!("landscape: x:{:.1} y:{:.1}", d.movement_x, d.movement_y);

    stage.stop(&mut env);
    Ok(())
}
