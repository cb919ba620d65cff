use std::{fmt, sync::Arc, time::Duration};

use anyhow::Result;
use parking_lot::Mutex;
use tweenery_animation::{Completion, Repeat, Tickery, Tween};

use crate::{
    Sprite,
    config::{IdleConfig, TweenConfig},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateId {
    /// The idle state at this index of the idle cycle.
    Idle(usize),
    Rotate,
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateId::Idle(index) => write!(f, "Idle#{index}"),
            StateId::Rotate => f.write_str("Rotate"),
        }
    }
}

/// A tween on the fighter together with how it is run.
#[derive(Debug)]
pub struct Animation {
    tween: Arc<Mutex<Tween>>,
    duration: Duration,
    repeat: Repeat,
}

impl Animation {
    /// Build the tween and subscribe it to the ticks of `tickery`.
    pub fn new(config: &TweenConfig, fighter: &Arc<Mutex<Sprite>>, tickery: &Tickery) -> Self {
        let mut tween = Tween::new();
        tween
            .add_control(fighter)
            .animate(config.properties.clone(), config.easing);

        let tween = Arc::new(Mutex::new(tween));
        tickery.subscribe(&tween);

        Self {
            tween,
            duration: config.duration(),
            repeat: config.repeat(),
        }
    }

    pub fn tween(&self) -> &Arc<Mutex<Tween>> {
        &self.tween
    }

    pub fn start(&self) -> Result<()> {
        let mut tween = self.tween.lock();
        tween.set_start_values().start(self.duration, self.repeat)?;
        Ok(())
    }

    /// Start from the start values and return a future that resolves when the run completes.
    pub fn start_future(&self) -> Result<Completion> {
        let mut tween = self.tween.lock();
        tween.set_start_values();
        Ok(tween.start_future(self.duration, self.repeat)?)
    }

    /// Stop and return the fighter to the pose the animation starts from.
    pub fn reset(&self) {
        let mut tween = self.tween.lock();
        tween.stop();
        tween.set_start_values();
    }
}

#[derive(Debug)]
pub struct IdleState {
    pub name: String,
    pub tint: u32,
    pub timeout: Duration,
    pub animation: Option<Animation>,
}

impl IdleState {
    pub fn new(config: &IdleConfig, fighter: &Arc<Mutex<Sprite>>, tickery: &Tickery) -> Self {
        Self {
            name: config.name.clone(),
            tint: config.tint,
            timeout: config.timeout(),
            animation: config
                .tween
                .as_ref()
                .map(|tween| Animation::new(tween, fighter, tickery)),
        }
    }
}
