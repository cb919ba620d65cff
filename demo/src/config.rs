use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use tweenery_animation::{Curve, Repeat, TweenSpec};

/// The scene configuration, read from a TOML file.
///
/// Every section is optional and falls back to the sandbox's built-in scene.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub scene: SceneConfig,
    pub run: RunConfig,
    /// Fades the fighter in before the state machine gets going.
    pub intro: TweenConfig,
    /// The idle states, visited in order. The last one returns to the first.
    pub idle: Vec<IdleConfig>,
    pub rotate: RotateConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f64,
    pub height: f64,
    pub fighter_size: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frame_ms: u64,
    pub frames: u64,
    /// Frames at which the button is clicked.
    pub clicks: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TweenConfig {
    pub duration_ms: u64,
    #[serde(default)]
    pub repeat: i32,
    #[serde(default)]
    pub easing: Curve,
    pub properties: TweenSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdleConfig {
    pub name: String,
    pub tint: u32,
    pub timeout_ms: u64,
    #[serde(default)]
    pub tween: Option<TweenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RotateConfig {
    pub name: String,
    pub tint: u32,
    /// Radians added on every tick.
    pub step: f64,
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration `{}`", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid configuration `{}`", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.idle.is_empty(), "At least one idle state is required");
        ensure!(self.run.frame_ms > 0, "`run.frame_ms` must be positive");
        self.intro.validate("intro")?;
        for idle in &self.idle {
            ensure!(idle.timeout_ms > 0, "Idle state `{}` has no timeout", idle.name);
            if let Some(tween) = &idle.tween {
                tween.validate(&idle.name)?;
            }
        }
        Ok(())
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.run.frame_ms)
    }
}

impl TweenConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat.into()
    }

    fn validate(&self, owner: &str) -> Result<()> {
        ensure!(self.duration_ms > 0, "The tween of `{owner}` has zero duration");
        ensure!(
            !self.properties.is_empty(),
            "The tween of `{owner}` animates no properties"
        );
        Ok(())
    }
}

impl IdleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            run: RunConfig::default(),
            intro: TweenConfig {
                duration_ms: 500,
                repeat: 0,
                easing: Curve::QuadraticOut,
                properties: TweenSpec::new().property("alpha", 0.0, 1.0),
            },
            idle: vec![
                IdleConfig {
                    name: "Idle1".into(),
                    tint: 0xff8888,
                    timeout_ms: 2000,
                    tween: Some(TweenConfig {
                        duration_ms: 800,
                        repeat: -1,
                        easing: Curve::CubicInReverse,
                        properties: TweenSpec::new().property("scale", 1.0, 1.2),
                    }),
                },
                IdleConfig {
                    name: "Idle2".into(),
                    tint: 0x88ff88,
                    timeout_ms: 2000,
                    tween: Some(TweenConfig {
                        duration_ms: 1000,
                        repeat: -1,
                        easing: Curve::QuarticInReverse,
                        properties: TweenSpec::new().property("alpha", 1.0, 0.4),
                    }),
                },
                IdleConfig {
                    name: "Idle3".into(),
                    tint: 0x8888ff,
                    timeout_ms: 3000,
                    tween: Some(TweenConfig {
                        duration_ms: 1500,
                        repeat: 2,
                        easing: Curve::BounceOut,
                        properties: TweenSpec::new().property("y", "base_y", "floor_y"),
                    }),
                },
            ],
            rotate: RotateConfig::default(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fighter_size: 100.0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            frames: 900,
            clicks: Vec::new(),
        }
    }
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            name: "Rotate".into(),
            tint: 0x888888,
            step: 0.01,
        }
    }
}
