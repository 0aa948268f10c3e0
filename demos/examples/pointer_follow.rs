// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-driven parallax.
//!
//! Load stage options from JSON, sweep a pointer across the viewport, and
//! print the displacement together with three curtain layers.
//!
//! Run:
//! - `cargo run -p understory_parallax_demos --example pointer_follow`
//! - `RUST_LOG=understory_parallax=trace cargo run -p understory_parallax_demos --example pointer_follow`

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_parallax::{
    Attributes, Children, Curtain, CurtainProps, HeadlessEnvironment, InputEvent, Stage,
    StageOptions,
};

const OPTIONS: &str = r#"{
    "scalarX": 0.2,
    "scalarY": 0.1,
    "clipToElement": true
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options: StageOptions = serde_json::from_str(OPTIONS)?;
    println!("options: {}", serde_json::to_string(&options)?);

    let mut env = HeadlessEnvironment::new(Size::new(1000.0, 800.0))
        .with_element(Rect::new(100.0, 200.0, 900.0, 600.0));
    let mut stage = Stage::new(options)?;
    let mode = stage.start(&mut env)?;
    println!("mode: {mode:?}");

    let mut layers: Children<CurtainProps> = Children::Nodes(vec![
        CurtainProps::default().with_rate(0.25),
        CurtainProps::default().with_rate(1.0),
        CurtainProps::default().with_rate(1.0).with_rate_y(0.0),
    ]);
    let mut curtains = vec![Curtain::new(); 3];

    // Left to right along the middle row, then one point outside the stage.
    let path = (0..=8)
        .map(|i| Point::new(100.0 + f64::from(i) * 100.0, 400.0))
        .chain([Point::new(50.0, 50.0)]);

    for point in path {
        let update = stage.handle_event(&env, InputEvent::PointerMove(point));
        let frame = stage.render(&Attributes::new(), &mut layers);
        let transforms: Vec<String> = frame
            .children
            .iter()
            .zip(curtains.iter_mut())
            .map(|(props, curtain)| curtain.render(props).transform.to_string())
            .collect();
        let d = stage.displacement();
        println!(
            "({:>5.1}, {:>5.1}) {update:?}\n    x:{:.1} y:{:.1}  {}",
            point.x,
            point.y,
            d.movement_x,
            d.movement_y,
            transforms.join(" | ")
        );
    }

    stage.stop(&mut env);
    println!("listeners after stop: {}", env.listener_count());
    Ok(())
}
