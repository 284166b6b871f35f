use anyhow::{bail, Result};

use tickertape_core::{controller::select_mode, AppConfig, DriveMode, Metrics};

pub fn run(config: &AppConfig, container: f64, content: f64, threshold: f64) -> Result<()> {
    for (name, value) in [("container", container), ("content", content), ("threshold", threshold)] {
        if !value.is_finite() || value < 0.0 {
            bail!("--{} must be a non-negative number, got {}", name, value);
        }
    }

    let metrics = Metrics::new(container, content, threshold);
    let decision = metrics.decide(&config.marquee.fit_thresholds());

    println!("Container: {}", container);
    println!("Content:   {}", content);
    println!("Distance:  {}", metrics.distance());

    match select_mode(config.marquee.animation_type, config.marquee.bounce, &decision) {
        None => println!("\nContent fits, no animation."),
        Some(DriveMode::Bounce) => println!("\nOverflow is small: bounce."),
        Some(DriveMode::Scroll) => println!("\nOverflow is large: scroll."),
    }

    Ok(())
}
