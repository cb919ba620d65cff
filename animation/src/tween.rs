use std::{
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::{
    Completion, Controller, Curve, Easing, ReceivesTicks, Target, TickResponse, TweenError,
    TweenSpec,
};

/// A target shared between its owner and the tweens animating it.
pub type SharedTarget = Arc<Mutex<dyn Target + Send>>;

type Callback = Box<dyn FnOnce() + Send>;

/// How often a run repeats.
///
/// `Times(n)` is decremented on every completed cycle and the run ends when it reaches zero, so
/// both `Times(0)` and `Times(1)` run a single cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(0)
    }
}

impl From<u32> for Repeat {
    fn from(times: u32) -> Self {
        Repeat::Times(times)
    }
}

/// Negative counts repeat forever.
impl From<i32> for Repeat {
    fn from(times: i32) -> Self {
        u32::try_from(times).map_or(Repeat::Forever, Repeat::Times)
    }
}

/// What a call to [`Tween::update`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Not started or nothing to animate.
    Idle,
    Running,
    /// A cycle completed and the next one begins.
    Looped,
    /// The run completed and the callback (if any) was invoked.
    Completed,
}

/// Interpolates numeric fields of a set of targets over time.
///
/// A tween is driven from the outside: every call to [`update`](Tween::update) advances its timer
/// and applies all controllers to all targets. Targets are not owned, a tween keeps weak
/// references and forgets targets that were dropped.
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use parking_lot::Mutex;
/// use tweenery_animation::{Curve, Tween, TweenSpec};
///
/// let sprite = Arc::new(Mutex::new(
///     [("x".to_string(), 0.0)].into_iter().collect::<std::collections::HashMap<_, _>>(),
/// ));
///
/// let mut tween = Tween::new();
/// tween
///     .add_control(&sprite)
///     .animate(TweenSpec::new().property("x", 0, 100), Curve::Linear)
///     .start(Duration::from_millis(1000), 0)
///     .unwrap();
///
/// tween.update(Duration::from_millis(500));
/// assert_eq!(sprite.lock()["x"], 50.0);
/// ```
#[derive(Default)]
pub struct Tween {
    controls: Vec<Weak<Mutex<dyn Target + Send>>>,
    controllers: Vec<Controller>,

    /// Time passed in the current cycle, never beyond `length`.
    timer: Duration,
    length: Duration,
    repeat: Repeat,

    started: bool,
    finished: bool,
    callback: Option<Callback>,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("controls", &self.controls.len())
            .field("controllers", &self.controllers.len())
            .field("timer", &self.timer)
            .field("length", &self.length)
            .field("repeat", &self.repeat)
            .field("started", &self.started)
            .field("finished", &self.finished)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Tween {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target. Adding the same target twice animates it twice per update.
    pub fn add_control<T>(&mut self, target: &Arc<Mutex<T>>) -> &mut Self
    where
        T: Target + Send + 'static,
    {
        let target: SharedTarget = target.clone();
        self.add_shared_control(&target)
    }

    pub fn add_shared_control(&mut self, target: &SharedTarget) -> &mut Self {
        self.controls.push(Arc::downgrade(target));
        self
    }

    /// Interpolate the properties of `spec` along `easing`.
    ///
    /// Properties of multiple specs may overlap, the spec added last wins.
    pub fn animate(&mut self, spec: TweenSpec, easing: impl Easing + 'static) -> &mut Self {
        self.add_controller(Controller::from_spec(spec, easing))
    }

    pub fn animate_linear(&mut self, spec: TweenSpec) -> &mut Self {
        self.animate(spec, Curve::Linear)
    }

    pub fn add_controller(&mut self, controller: Controller) -> &mut Self {
        self.controllers.push(controller);
        self
    }

    pub fn clear_controllers(&mut self) -> &mut Self {
        self.controllers.clear();
        self
    }

    pub fn clear_controls(&mut self) -> &mut Self {
        self.controls.clear();
        self
    }

    /// Apply progress 0 to all targets without touching the run state.
    pub fn set_start_values(&mut self) -> &mut Self {
        self.apply(0.0);
        self
    }

    /// Start a run, replacing the current one.
    pub fn start(
        &mut self,
        duration: Duration,
        repeat: impl Into<Repeat>,
    ) -> Result<&mut Self, TweenError> {
        self.arm(duration, repeat.into(), None)
    }

    /// Start a run that invokes `callback` once when it completes.
    ///
    /// The callback runs inside [`update`](Self::update) and is dropped without being called if
    /// the run is stopped or replaced.
    pub fn start_with(
        &mut self,
        duration: Duration,
        repeat: impl Into<Repeat>,
        callback: impl FnOnce() + Send + 'static,
    ) -> Result<&mut Self, TweenError> {
        self.arm(duration, repeat.into(), Some(Box::new(callback)))
    }

    /// Start a run and return a future that resolves when it completes.
    pub fn start_future(
        &mut self,
        duration: Duration,
        repeat: impl Into<Repeat>,
    ) -> Result<Completion, TweenError> {
        let (completion, resolve) = Completion::new();
        self.arm(duration, repeat.into(), Some(Box::new(resolve)))?;
        Ok(completion)
    }

    fn arm(
        &mut self,
        duration: Duration,
        repeat: Repeat,
        callback: Option<Callback>,
    ) -> Result<&mut Self, TweenError> {
        if duration.is_zero() {
            warn!("Refusing to start a tween with zero duration");
            return Err(TweenError::ZeroDuration);
        }

        debug!("Starting tween for {duration:?}, repeat: {repeat:?}");
        self.length = duration;
        self.timer = Duration::ZERO;
        self.repeat = repeat;
        self.started = true;
        self.finished = false;
        self.callback = callback;
        Ok(self)
    }

    /// Advance the run by `delta` and apply the current progress to all targets.
    ///
    /// Does nothing if the tween is not started or has no controllers.
    pub fn update(&mut self, delta: Duration) -> Step {
        if !self.started || self.controllers.is_empty() {
            return Step::Idle;
        }

        self.timer = self.timer.saturating_add(delta).min(self.length);
        let k = self.progress();
        trace!("Tween update: k = {k}");
        self.apply(k);

        if self.timer < self.length {
            return Step::Running;
        }

        if let Repeat::Times(remaining) = &mut self.repeat {
            *remaining = remaining.saturating_sub(1);
        }

        if self.repeat == Repeat::Times(0) {
            let callback = self.callback.take();
            self.halt();
            debug!("Tween completed");
            if let Some(callback) = callback {
                callback();
            }
            return Step::Completed;
        }

        debug!("Tween looped, repeat: {:?}", self.repeat);
        self.timer = Duration::ZERO;
        Step::Looped
    }

    /// End the run without invoking its callback.
    ///
    /// Returns the linear progress the run stopped at.
    pub fn stop(&mut self) -> f64 {
        if self.started {
            debug!("Tween stopped at k = {}", self.progress());
        }
        self.callback = None;
        self.halt();
        self.progress()
    }

    /// Stop and forget all controllers and targets.
    pub fn destroy(&mut self) {
        self.stop();
        self.clear_controls();
        self.clear_controllers();
    }

    fn halt(&mut self) {
        self.started = false;
        self.finished = true;
    }

    fn apply(&mut self, k: f64) {
        let controllers = &self.controllers;
        self.controls.retain(|control| {
            let Some(control) = control.upgrade() else {
                return false;
            };
            let mut target = control.lock();
            for controller in controllers {
                controller.apply(&mut *target, k);
            }
            true
        });
    }

    /// The linear progress of the current cycle in `[0, 1]`, 0 if the tween was never started.
    pub fn progress(&self) -> f64 {
        if self.length.is_zero() {
            return 0.0;
        }
        self.timer.as_secs_f64() / self.length.as_secs_f64()
    }

    pub fn timer(&self) -> Duration {
        self.timer
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The number of targets, including targets that were dropped since the last update.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }
}

/// A shared tween subscribed to a [`Tickery`](crate::Tickery) updates on every tick for as long
/// as it is alive.
impl ReceivesTicks for Mutex<Tween> {
    fn tick(&self, delta: Duration) -> TickResponse {
        self.lock().update(delta);
        TickResponse::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use approx::assert_relative_eq;
    use futures::FutureExt;

    use super::*;
    use crate::{pipe, Mult};

    type Fields = HashMap<String, f64>;

    fn shared(fields: &[(&str, f64)]) -> Arc<Mutex<Fields>> {
        Arc::new(Mutex::new(
            fields.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        ))
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let increment = {
            let count = count.clone();
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        (count, increment)
    }

    fn x_tween(sprite: &Arc<Mutex<Fields>>) -> Tween {
        let mut tween = Tween::new();
        tween
            .add_control(sprite)
            .animate_linear(TweenSpec::new().property("x", 0, 100));
        tween
    }

    #[test]
    fn linear_run_reaches_its_end_and_finishes() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        tween.start(ms(1000), 0).unwrap();

        assert_eq!(tween.update(ms(250)), Step::Running);
        assert_eq!(tween.update(ms(250)), Step::Running);
        assert_relative_eq!(sprite.lock()["x"], 50.0);
        assert!(tween.is_started());

        assert_eq!(tween.update(ms(700)), Step::Completed);
        assert_eq!(sprite.lock()["x"], 100.0);
        assert_eq!(tween.timer(), ms(1000));
        assert!(!tween.is_started());
        assert!(tween.is_finished());
    }

    #[test]
    fn update_without_start_or_controllers_is_a_no_op() {
        let sprite = shared(&[("x", 7.0)]);
        let mut tween = x_tween(&sprite);
        assert_eq!(tween.update(ms(100)), Step::Idle);
        assert_eq!(sprite.lock()["x"], 7.0);

        let mut empty = Tween::new();
        empty.add_control(&sprite).start(ms(100), 0).unwrap();
        assert_eq!(empty.update(ms(100)), Step::Idle);
        assert_eq!(empty.timer(), Duration::ZERO);
        assert!(empty.is_started());
    }

    #[test]
    fn repeat_rearms_until_exhausted() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        let (count, callback) = counter();
        tween.start_with(ms(1000), 2, callback).unwrap();

        assert_eq!(tween.update(ms(1000)), Step::Looped);
        assert_eq!(tween.repeat(), Repeat::Times(1));
        assert_eq!(tween.timer(), Duration::ZERO);
        assert_eq!(sprite.lock()["x"], 100.0);

        // The next apply snaps back towards the start value.
        tween.update(ms(100));
        assert_relative_eq!(sprite.lock()["x"], 10.0);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(tween.update(ms(900)), Step::Completed);
        assert_eq!(tween.repeat(), Repeat::Times(0));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert_eq!(tween.update(ms(500)), Step::Idle);
        assert_eq!(sprite.lock()["x"], 100.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeat_once_runs_a_single_cycle() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        tween.start(ms(100), 1).unwrap();
        assert_eq!(tween.update(ms(100)), Step::Completed);
    }

    #[test]
    fn repeating_forever_never_completes() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        let (count, callback) = counter();
        tween.start_with(ms(100), -1, callback).unwrap();
        assert_eq!(tween.repeat(), Repeat::Forever);

        for _ in 0..50 {
            tween.update(ms(100));
        }
        assert!(tween.is_started());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tween.stop();
        assert!(tween.is_finished());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stop_returns_linear_progress_and_skips_the_callback() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .animate(TweenSpec::new().property("x", 0, 100), Curve::QuadraticIn);
        let (count, callback) = counter();
        tween.start_with(ms(1000), 0, callback).unwrap();
        tween.update(ms(300));

        assert_relative_eq!(tween.stop(), 0.3);
        assert!(!tween.is_started());
        assert!(tween.is_finished());

        assert_eq!(tween.update(ms(1000)), Step::Idle);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_relative_eq!(sprite.lock()["x"], 9.0);
    }

    #[test]
    fn stop_before_start_reports_zero() {
        assert_eq!(Tween::new().stop(), 0.0);
    }

    #[test]
    fn destroy_clears_everything() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        tween.start(ms(1000), 0).unwrap();
        tween.update(ms(100));
        tween.destroy();

        assert_eq!(tween.control_count(), 0);
        assert_eq!(tween.controller_count(), 0);
        assert!(tween.is_finished());

        tween.start(ms(1000), 0).unwrap();
        assert_eq!(tween.update(ms(500)), Step::Idle);
        assert_relative_eq!(sprite.lock()["x"], 10.0);
    }

    #[test]
    fn referenced_endpoints_follow_external_changes() {
        let sprite = shared(&[("y", 0.0), ("start_y", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .animate_linear(TweenSpec::new().property("y", "start_y", 400.0));
        tween.start(ms(1000), 0).unwrap();

        tween.update(ms(500));
        assert_relative_eq!(sprite.lock()["y"], 200.0);

        sprite.lock().insert("start_y".into(), 100.0);
        tween.update(ms(250));
        assert_relative_eq!(sprite.lock()["y"], 325.0);
    }

    #[test]
    fn set_start_values_leaves_the_run_state_alone() {
        let sprite = shared(&[("x", 42.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .animate_linear(TweenSpec::new().property("x", 10, 20));
        tween.set_start_values();

        assert_eq!(sprite.lock()["x"], 10.0);
        assert_eq!(tween.timer(), Duration::ZERO);
        assert!(!tween.is_started());
        assert!(!tween.is_finished());
    }

    #[test]
    fn all_targets_receive_all_controllers() {
        let a = shared(&[("x", 0.0), ("alpha", 0.0)]);
        let b = shared(&[("x", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&a)
            .add_control(&b)
            .animate_linear(TweenSpec::new().property("x", 0, 10))
            .animate_linear(TweenSpec::new().property("alpha", 0, 1));
        tween.start(ms(100), 0).unwrap();
        tween.update(ms(50));

        assert_relative_eq!(a.lock()["x"], 5.0);
        assert_relative_eq!(a.lock()["alpha"], 0.5);
        assert_relative_eq!(b.lock()["x"], 5.0);
        assert!(!b.lock().contains_key("alpha"));
    }

    #[test]
    fn a_target_added_twice_is_animated_twice() {
        let sprite = shared(&[("count", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .add_control(&sprite)
            .add_controller(Controller::from_fn(|target, _| {
                let count = target.field("count").unwrap_or_default();
                target.set_field("count", count + 1.0);
            }));
        assert_eq!(tween.control_count(), 2);

        tween.start(ms(100), 0).unwrap();
        tween.update(ms(10));
        assert_eq!(sprite.lock()["count"], 2.0);
        tween.update(ms(10));
        assert_eq!(sprite.lock()["count"], 4.0);
    }

    #[test]
    fn overlapping_specs_last_write_wins() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .animate_linear(TweenSpec::new().property("x", 0, 10))
            .animate_linear(TweenSpec::new().property("x", 100, 200));
        tween.start(ms(100), 0).unwrap();
        tween.update(ms(50));
        assert_relative_eq!(sprite.lock()["x"], 150.0);
    }

    #[test]
    fn dropped_targets_are_forgotten() {
        let kept = shared(&[("x", 0.0)]);
        let dropped = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&kept);
        tween.add_control(&dropped);
        assert_eq!(tween.control_count(), 2);

        drop(dropped);
        tween.start(ms(100), 0).unwrap();
        tween.update(ms(50));
        assert_eq!(tween.control_count(), 1);
        assert_relative_eq!(kept.lock()["x"], 50.0);
    }

    #[test]
    fn zero_duration_is_rejected_and_keeps_the_current_run() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        tween.start(ms(1000), 0).unwrap();
        tween.update(ms(400));

        assert_eq!(
            tween.start(Duration::ZERO, 0).map(|_| ()),
            Err(TweenError::ZeroDuration)
        );
        assert!(tween.is_started());
        assert_eq!(tween.timer(), ms(400));
    }

    #[test]
    fn restarting_replaces_the_run_and_drops_the_callback() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        let (count, callback) = counter();
        tween.start_with(ms(1000), 0, callback).unwrap();
        tween.update(ms(600));

        tween.start(ms(200), 0).unwrap();
        assert_eq!(tween.timer(), Duration::ZERO);
        assert_eq!(tween.update(ms(200)), Step::Completed);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn raw_controllers_and_piped_easings_compose() {
        let sprite = shared(&[("rotation", 0.0), ("x", 0.0)]);
        let mut tween = Tween::new();
        tween
            .add_control(&sprite)
            .animate(
                TweenSpec::new().property("x", 0, 100),
                pipe![Mult(2.0), Curve::Cut],
            )
            .add_controller(Controller::from_fn(|target, k| {
                target.set_field("rotation", k * std::f64::consts::PI);
            }));
        tween.start(ms(1000), 0).unwrap();
        tween.update(ms(500));

        assert_relative_eq!(sprite.lock()["x"], 100.0);
        assert_relative_eq!(sprite.lock()["rotation"], std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn completion_resolves_when_the_run_completes() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        let mut completion = tween.start_future(ms(100), 0).unwrap();

        tween.update(ms(50));
        assert_eq!((&mut completion).now_or_never(), None);

        tween.update(ms(50));
        assert_eq!(futures::executor::block_on(completion), Ok(()));
    }

    #[test]
    fn completion_is_cancelled_by_stop() {
        let sprite = shared(&[("x", 0.0)]);
        let mut tween = x_tween(&sprite);
        let completion = tween.start_future(ms(100), 0).unwrap();
        tween.update(ms(50));
        tween.stop();
        assert_eq!(
            futures::executor::block_on(completion),
            Err(TweenError::Cancelled)
        );
    }

    #[test]
    fn repeat_counts_convert_from_integers() {
        assert_eq!(Repeat::from(-1), Repeat::Forever);
        assert_eq!(Repeat::from(0), Repeat::Times(0));
        assert_eq!(Repeat::from(3u32), Repeat::Times(3));
        assert_eq!(Repeat::default(), Repeat::Times(0));
    }

    #[test]
    fn shared_tweens_receive_ticks() {
        let sprite = shared(&[("x", 0.0)]);
        let tween = Arc::new(Mutex::new(x_tween(&sprite)));
        tween.lock().start(ms(100), 0).unwrap();

        assert!(matches!(tween.tick(ms(25)), TickResponse::Continue));
        assert_relative_eq!(sprite.lock()["x"], 25.0);
    }
}
