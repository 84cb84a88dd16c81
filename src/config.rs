use crate::color::{self, Rgb};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

/// The two show styles. `Rich` is the polished one: fixed bursts, hue
/// families, sparkles, fade-in rockets and a dissolving finale. `Simple`
/// randomizes counts and colours and ends with a plain delayed clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Rich,
    Simple,
}

/// Where launch points sit along the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spread {
    /// Evenly spaced across the width, each nudged by up to half `jitter`.
    Even { jitter: f32 },
    /// Anywhere across the width.
    Uniform,
}

/// What happens once the last firework is gone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Finale {
    /// One full clear after `delay`.
    Clear { delay: Duration },
    /// Black overlays of decreasing alpha every `interval`, then a clear.
    Dissolve { interval: Duration, step: f32 },
}

/// Every constant the simulation uses. Distances are canvas pixels,
/// velocities pixels per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub gravity: f32,
    pub ascent_damping: f32,
    pub launch_speed: RangeInclusive<f32>,
    pub target_jitter: f32,
    pub apex_band: f32,
    pub apex_floor: f32,
    pub trail_cap: usize,
    pub fade_in_step: Option<f32>,
    pub burst: RangeInclusive<usize>,
    pub angle_jitter: f32,
    pub burst_speed: RangeInclusive<f32>,
    /// `None` gives every particle an unrelated hue.
    pub hue_spread: Option<f32>,
    pub lightness: RangeInclusive<f32>,
    pub size: RangeInclusive<f32>,
    pub sparkle_chance: f32,
    pub particle_damping: f32,
    pub particle_decay: f32,
    pub size_shrink: f32,
    pub life_decay: f32,
    pub batch: RangeInclusive<usize>,
    pub stagger: Duration,
    pub spread: Spread,
    pub fade_alpha: f32,
    pub finale: Finale,
}

impl Tuning {
    pub fn rich() -> Self {
        Self {
            gravity: 0.12,
            ascent_damping: 0.4,
            launch_speed: 5.0..=8.0,
            target_jitter: 200.0,
            apex_band: 0.6,
            apex_floor: 100.0,
            trail_cap: 12,
            fade_in_step: Some(0.05),
            burst: 40..=40,
            angle_jitter: 0.3,
            burst_speed: 2.0..=10.0,
            hue_spread: Some(40.0),
            lightness: 65.0..=95.0,
            size: 1.0..=3.5,
            sparkle_chance: 0.2,
            particle_damping: 0.98,
            particle_decay: 0.015,
            size_shrink: 0.995,
            life_decay: 0.008,
            batch: 4..=4,
            stagger: Duration::from_millis(300),
            spread: Spread::Even { jitter: 100.0 },
            fade_alpha: 0.05,
            finale: Finale::Dissolve {
                interval: Duration::from_millis(30),
                step: 0.05,
            },
        }
    }

    pub fn simple() -> Self {
        Self {
            trail_cap: 10,
            fade_in_step: None,
            burst: 30..=80,
            hue_spread: None,
            sparkle_chance: 0.0,
            particle_damping: 0.99,
            particle_decay: 0.02,
            size_shrink: 1.0,
            batch: 3..=8,
            stagger: Duration::from_millis(200),
            spread: Spread::Uniform,
            fade_alpha: 0.1,
            finale: Finale::Clear {
                delay: Duration::from_millis(1000),
            },
            ..Self::rich()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Rich => Self::rich(),
            Variant::Simple => Self::simple(),
        }
    }
}

/// Contents of the optional YAML config file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant: Variant,
    pub fps: u32,
    /// Canvas pixels per terminal cell.
    pub pixel_scale: f32,
    pub background: String,
    pub fade_alpha: Option<f32>,
    pub batch_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Rich,
            fps: 60,
            pixel_scale: 8.0,
            background: "000000".to_string(),
            fade_alpha: None,
            batch_size: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=240).contains(&self.fps) {
            bail!("fps must be between 1 and 240, got {}", self.fps);
        }
        if !(self.pixel_scale > 0.0 && self.pixel_scale.is_finite()) {
            bail!("pixel_scale must be positive, got {}", self.pixel_scale);
        }
        if let Some(alpha) = self.fade_alpha {
            if !(alpha > 0.0 && alpha <= 1.0) {
                bail!("fade_alpha must be in (0, 1], got {alpha}");
            }
        }
        if self.batch_size == Some(0) {
            bail!("batch_size must be at least 1");
        }
        self.background_rgb()?;
        Ok(())
    }

    pub fn background_rgb(&self) -> Result<Rgb> {
        match color::parse_hex(&self.background) {
            Some(rgb) => Ok(rgb),
            None => bail!(
                "invalid background color {:?}, expected RRGGBB (e.g. 1a1b26)",
                self.background
            ),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.fps.max(1) as u64)
    }

    /// Variant preset with this file's overrides applied.
    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::for_variant(self.variant);
        if let Some(alpha) = self.fade_alpha {
            tuning.fade_alpha = alpha;
        }
        if let Some(n) = self.batch_size {
            tuning.batch = n..=n;
        }
        tuning
    }
}
