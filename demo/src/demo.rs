use std::{sync::Arc, time::Duration};

use anyhow::{Result, ensure};
use log::{error, info};
use parking_lot::{Mutex, MutexGuard};
use tweenery_animation::{Completion, ReceivesTicks, TickResponse, Tickery};

use crate::{
    DemoConfig, Sprite,
    config::RotateConfig,
    state::{Animation, IdleState, StateId},
};

/// The sandbox scene: a background and a fighter, driven by a small state machine.
///
/// The idle states follow each other on timeouts. A button click switches to rotating and back.
#[derive(Debug)]
pub struct Demo {
    background: Arc<Mutex<Sprite>>,
    fighter: Arc<Mutex<Sprite>>,
    intro: Animation,
    idle: Vec<IdleState>,
    rotate: RotateConfig,

    current: Option<StateId>,
    /// Time spent in the current state.
    in_state: Duration,
    history: Vec<StateId>,
}

impl Demo {
    /// Build the scene. All its animations are subscribed to `tickery`, the demo itself is not.
    pub fn new(config: &DemoConfig, tickery: &Tickery) -> Result<Self> {
        config.validate()?;

        let scene = &config.scene;
        let background = Arc::new(Mutex::new(Sprite::new(scene.width, scene.height)));
        let fighter = Arc::new(Mutex::new(
            Sprite::new(scene.fighter_size, scene.fighter_size)
                .at(scene.width / 2.0, scene.height / 2.0)
                .with_floor(scene.height - scene.fighter_size / 2.0),
        ));

        let intro = Animation::new(&config.intro, &fighter, tickery);
        let idle = config
            .idle
            .iter()
            .map(|idle| IdleState::new(idle, &fighter, tickery))
            .collect();

        Ok(Self {
            background,
            fighter,
            intro,
            idle,
            rotate: config.rotate.clone(),
            current: None,
            in_state: Duration::ZERO,
            history: Vec::new(),
        })
    }

    /// Run the intro animation. The returned future resolves when it is done.
    pub fn start_intro(&self) -> Result<Completion> {
        self.intro.start_future()
    }

    /// Enter the first idle state.
    pub fn start(&mut self) -> Result<()> {
        self.set_state(StateId::Idle(0))
    }

    pub fn button_click(&mut self) -> Result<()> {
        if self.current == Some(StateId::Rotate) {
            self.set_state(StateId::Idle(0))
        } else {
            self.set_state(StateId::Rotate)
        }
    }

    pub fn set_state(&mut self, next: StateId) -> Result<()> {
        if let StateId::Idle(index) = next {
            ensure!(index < self.idle.len(), "There is no idle state {index}");
        }

        match self.current {
            Some(current) => {
                self.exit(current);
                info!("{} ==> {}", self.state_name(current), self.state_name(next));
            }
            None => info!(" ==> {}", self.state_name(next)),
        }

        self.current = Some(next);
        self.in_state = Duration::ZERO;
        self.history.push(next);
        self.enter(next)
    }

    fn enter(&self, state: StateId) -> Result<()> {
        match state {
            StateId::Idle(index) => {
                let idle = &self.idle[index];
                self.background.lock().tint = idle.tint;
                if let Some(animation) = &idle.animation {
                    animation.start()?;
                }
            }
            StateId::Rotate => {
                self.background.lock().tint = self.rotate.tint;
            }
        }
        Ok(())
    }

    fn exit(&self, state: StateId) {
        if let StateId::Idle(index) = state
            && let Some(animation) = &self.idle[index].animation
        {
            animation.reset();
        }
    }

    /// Advance the state machine by `delta`.
    pub fn update(&mut self, delta: Duration) -> Result<()> {
        match self.current {
            Some(StateId::Idle(index)) => {
                self.in_state += delta;
                if self.in_state >= self.idle[index].timeout {
                    self.set_state(StateId::Idle((index + 1) % self.idle.len()))?;
                }
            }
            Some(StateId::Rotate) => {
                self.in_state += delta;
                self.fighter.lock().rotation += self.rotate.step;
            }
            None => {}
        }
        Ok(())
    }

    pub fn state_name(&self, state: StateId) -> &str {
        match state {
            StateId::Idle(index) => &self.idle[index].name,
            StateId::Rotate => &self.rotate.name,
        }
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Every state entered so far, in order.
    pub fn history(&self) -> &[StateId] {
        &self.history
    }

    pub fn idle_states(&self) -> &[IdleState] {
        &self.idle
    }

    pub fn fighter(&self) -> &Arc<Mutex<Sprite>> {
        &self.fighter
    }

    pub fn background(&self) -> &Arc<Mutex<Sprite>> {
        &self.background
    }
}

/// A [`Demo`] that can be subscribed to a [`Tickery`] and advances on every tick.
#[derive(Debug)]
pub struct SharedDemo {
    inner: Mutex<Demo>,
}

impl SharedDemo {
    pub fn new(demo: Demo) -> Self {
        Self {
            inner: Mutex::new(demo),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Demo> {
        self.inner.lock()
    }
}

impl ReceivesTicks for SharedDemo {
    fn tick(&self, delta: Duration) -> TickResponse {
        if let Err(err) = self.lock().update(delta) {
            error!("State machine update failed: {err:#}");
        }
        TickResponse::Continue
    }
}
