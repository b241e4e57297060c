use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::catalog::Side;

/// Tunables of one selection session, loaded from a TOML profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Items shown (and selectable) at once.
    pub visible_slots: usize,
    /// Half-height of the dead-band around the initial position, in mm.
    pub stable_range: f32,
    /// Dead-band multiplier when palm tracking replaces fingertip tracking.
    pub hand_mode_range_multiplier: f32,
    /// Distance past the dead-band that maps to full scroll speed, in mm.
    pub scroll_zone_size: f32,
    /// Auto-scroll cap, items per second.
    pub scroll_max_speed: f32,
    /// Gain applied before cubing the edge-scroll factor.
    pub scroll_boost: f32,
    /// Filter the catalog by finger extension. Switches tracking to the
    /// palm and widens the dead-band.
    pub filtering_enabled: bool,
    /// Select with the fingertip height (ignored while filtering).
    pub tip_selection: bool,
    /// Apply the hovered pose on every tracking tick.
    pub live_preview: bool,
    /// Which hand's pose library to drive.
    pub side: Side,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            visible_slots: 2,
            stable_range: 10.0,
            hand_mode_range_multiplier: 3.0,
            scroll_zone_size: 30.0,
            scroll_max_speed: 2.0,
            scroll_boost: 1.6,
            filtering_enabled: false,
            tip_selection: true,
            live_preview: true,
            side: Side::Right,
        }
    }
}

fn config_dir() -> Result<PathBuf> {
    let dirs = UserDirs::new().ok_or_else(|| anyhow!("cannot resolve home directory"))?;
    Ok(dirs.home_dir().join(".config").join("posepick"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

impl SelectorConfig {
    /// Parse and validate a profile from an explicit path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        let cfg: SelectorConfig =
            toml::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load the user profile, installing the bundled default on first run.
    pub fn load_or_install_default() -> Result<Self> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = dir.join("default.toml");
        if !path.exists() {
            fs::write(&path, default_profile_text())?;
            info!("installed default profile at {}", path.display());
        }
        Self::load(&path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.visible_slots == 0 {
            return Err(anyhow!("visible_slots must be at least 1"));
        }
        if self.stable_range <= 0.0 {
            return Err(anyhow!("stable_range must be positive (mm)"));
        }
        if self.hand_mode_range_multiplier < 1.0 {
            return Err(anyhow!("hand_mode_range_multiplier must be >= 1"));
        }
        if self.scroll_zone_size <= 0.0 {
            return Err(anyhow!("scroll_zone_size must be positive (mm)"));
        }
        if self.scroll_max_speed <= 0.0 {
            return Err(anyhow!("scroll_max_speed must be positive (items/s)"));
        }
        if self.scroll_boost <= 0.0 {
            return Err(anyhow!("scroll_boost must be positive"));
        }
        Ok(())
    }
}
