use std::env;

use anyhow::Result;
use log::info;
use tweenery_demo::{DemoConfig, run};

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };

    let summary = run(&config)?;
    info!(
        "Ran {} frames, ended in {} (states: {})",
        summary.frames,
        summary.final_state,
        summary.history.join(" -> ")
    );
    info!(
        "Fighter: x = {:.1}, y = {:.1}, rotation = {:.2}, alpha = {:.2}, scale = {:.2}",
        summary.fighter.x,
        summary.fighter.y,
        summary.fighter.rotation,
        summary.fighter.alpha,
        summary.fighter.scale
    );
    if !summary.intro_completed {
        info!("The intro did not complete");
    }
    Ok(())
}
