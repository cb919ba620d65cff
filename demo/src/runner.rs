use std::sync::Arc;

use anyhow::Result;
use futures::FutureExt;
use log::{info, warn};
use tweenery_animation::Tickery;

use crate::{Demo, DemoConfig, SharedDemo, Sprite};

/// What the scene looked like when a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub final_state: String,
    /// The names of all states entered, in order.
    pub history: Vec<String>,
    pub fighter: Sprite,
    pub background_tint: u32,
    pub intro_completed: bool,
}

/// Run the scene for the configured number of fixed frames, clicking the button at the
/// configured frames.
pub fn run(config: &DemoConfig) -> Result<RunSummary> {
    let tickery = Tickery::default();
    let demo = Arc::new(SharedDemo::new(Demo::new(config, &tickery)?));
    // After the animations, so that the state machine sees every frame's poses.
    tickery.subscribe(&demo);

    let mut intro = Some(demo.lock().start_intro()?);
    let mut intro_completed = false;
    demo.lock().start()?;

    let frame = config.frame();
    for index in 0..config.run.frames {
        if config.run.clicks.contains(&index) {
            info!("Button clicked at frame {index}");
            demo.lock().button_click()?;
        }

        tickery.advance(frame);

        if let Some(result) = intro.as_mut().and_then(|intro| intro.now_or_never()) {
            intro = None;
            match result {
                Ok(()) => {
                    info!("Intro completed at frame {index}");
                    intro_completed = true;
                }
                Err(err) => warn!("Intro did not complete: {err}"),
            }
        }
    }

    let demo = demo.lock();
    let final_state = demo
        .current_state()
        .map(|state| demo.state_name(state).to_owned())
        .unwrap_or_default();

    Ok(RunSummary {
        frames: config.run.frames,
        final_state,
        history: demo
            .history()
            .iter()
            .map(|state| demo.state_name(*state).to_owned())
            .collect(),
        fighter: demo.fighter().lock().clone(),
        background_tint: demo.background().lock().tint,
        intro_completed,
    })
}
