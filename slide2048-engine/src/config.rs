//! Game Configuration
//!
//! Board size, window geometry, animation speed and the two tunable rules
//! (new-tile distribution and loss condition). Defaults reproduce the
//! classic 800×800 window with a 4×4 grid.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::rng::derive_seed;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Board must have at least 2 rows and 2 columns.
    #[error("board must be at least 2x2, got {rows}x{cols}")]
    #[allow(missing_docs)]
    BoardTooSmall { rows: usize, cols: usize },

    /// Window cannot be split into whole-pixel tiles.
    #[error("window {width}x{height} does not divide into {rows}x{cols} tiles")]
    #[allow(missing_docs)]
    UnevenTiles {
        width: i32,
        height: i32,
        rows: usize,
        cols: usize,
    },

    /// Tile extent must be a whole number of movement steps.
    #[error("tile extent {extent} is not a multiple of move step {step}")]
    #[allow(missing_docs)]
    StepMisaligned { extent: i32, step: i32 },

    /// Frame rate of zero.
    #[error("frame rate must be positive")]
    ZeroFrameRate,

    /// Spawn probability above 1000 per mille.
    #[error("four probability {0}‰ exceeds 1000‰")]
    InvalidProbability(u16),

    /// Environment variable could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    #[allow(missing_docs)]
    InvalidEnv { name: &'static str, value: String },

    /// Loss rule name not recognised.
    #[error("unknown loss rule {0:?}, expected board_full or no_moves_left")]
    UnknownLossRule(String),

    /// JSON decode error.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Distribution of values for tiles spawned after a move.
///
/// New-game tiles are always 2; this only governs post-move spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDistribution {
    /// Probability (in thousandths) that a spawned tile is a 4 instead of a 2.
    pub four_per_mille: u16,
}

impl SpawnDistribution {
    /// Even pick between 2 and 4.
    pub const UNIFORM: Self = Self { four_per_mille: 500 };

    /// The 90/10 split most 2048 clones use.
    pub const CLASSIC: Self = Self { four_per_mille: 100 };
}

impl Default for SpawnDistribution {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// When a game counts as lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossRule {
    /// Lost as soon as a settled move leaves all cells occupied,
    /// even if adjacent equal tiles could still merge.
    #[default]
    BoardFull,
    /// Lost only when the board is full and no adjacent pair can merge.
    NoMovesLeft,
}

impl std::str::FromStr for LossRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "board_full" => Ok(LossRule::BoardFull),
            "no_moves_left" => Ok(LossRule::NoMovesLeft),
            other => Err(ConfigError::UnknownLossRule(other.to_string())),
        }
    }
}

/// Full game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Window width in pixels
    pub width: i32,
    /// Window height in pixels
    pub height: i32,
    /// Pixels a tile travels per resolution pass
    pub move_step: i32,
    /// Resolution passes (and frames) per second
    pub frame_rate: u32,
    /// Post-move spawn values
    pub spawn: SpawnDistribution,
    /// Loss condition
    pub loss_rule: LossRule,
    /// RNG seed (None = front end picks one)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            width: 800,
            height: 800,
            move_step: 20,
            frame_rate: 60,
            spawn: SpawnDistribution::default(),
            loss_rule: LossRule::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with `SLIDE2048_*` environment variables.
    ///
    /// `SLIDE2048_SEED` accepts a number or any phrase (hashed into a seed).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(step) = env_parse::<i32>("SLIDE2048_MOVE_STEP")? {
            config.move_step = step;
        }
        if let Some(rate) = env_parse::<u32>("SLIDE2048_FRAME_RATE")? {
            config.frame_rate = rate;
        }
        if let Some(per_mille) = env_parse::<u16>("SLIDE2048_FOUR_PER_MILLE")? {
            config.spawn.four_per_mille = per_mille;
        }
        if let Some(rule) = env_parse::<LossRule>("SLIDE2048_LOSS_RULE")? {
            config.loss_rule = rule;
        }
        if let Ok(seed) = std::env::var("SLIDE2048_SEED") {
            config.seed = Some(seed.parse().unwrap_or_else(|_| derive_seed(&seed)));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate from JSON. Missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that tiles are whole pixels and moves land exactly on cell origins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(ConfigError::BoardTooSmall { rows: self.rows, cols: self.cols });
        }
        if self.width <= 0
            || self.height <= 0
            || self.width % self.cols as i32 != 0
            || self.height % self.rows as i32 != 0
        {
            return Err(ConfigError::UnevenTiles {
                width: self.width,
                height: self.height,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let geometry = self.geometry();
        for extent in [geometry.tile_width, geometry.tile_height] {
            if self.move_step <= 0 || extent % self.move_step != 0 {
                return Err(ConfigError::StepMisaligned { extent, step: self.move_step });
            }
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.spawn.four_per_mille > 1000 {
            return Err(ConfigError::InvalidProbability(self.spawn.four_per_mille));
        }
        Ok(())
    }

    /// Pixel geometry derived from window size and grid dimensions.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            rows: self.rows,
            cols: self.cols,
            tile_width: self.width / self.cols as i32,
            tile_height: self.height / self.rows as i32,
            step: self.move_step,
        }
    }
}

/// Board dimensions in cells and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Tile width in pixels
    pub tile_width: i32,
    /// Tile height in pixels
    pub tile_height: i32,
    /// Movement per pass in pixels
    pub step: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        GameConfig::default().geometry()
    }
}

impl Geometry {
    /// Total number of cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let geometry = GameConfig::default().geometry();
        assert_eq!(geometry.tile_width, 200);
        assert_eq!(geometry.tile_height, 200);
        assert_eq!(geometry.step, 20);
        assert_eq!(geometry.capacity(), 16);
    }

    #[test]
    fn test_default_validates() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_misaligned_step_rejected() {
        let config = GameConfig { move_step: 30, ..GameConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StepMisaligned { extent: 200, step: 30 })
        ));
    }

    #[test]
    fn test_uneven_window_rejected() {
        let config = GameConfig { width: 801, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::UnevenTiles { .. })));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let config = GameConfig {
            spawn: SpawnDistribution { four_per_mille: 1001 },
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidProbability(1001))));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = GameConfig::from_json(r#"{"move_step": 40, "loss_rule": "no_moves_left"}"#)
            .unwrap();
        assert_eq!(config.move_step, 40);
        assert_eq!(config.loss_rule, LossRule::NoMovesLeft);
        assert_eq!(config.rows, 4);
        assert_eq!(config.spawn, SpawnDistribution::UNIFORM);
    }

    #[test]
    fn test_json_invalid_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"move_step": 33}"#),
            Err(ConfigError::StepMisaligned { .. })
        ));
        assert!(matches!(GameConfig::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig { seed: Some(7), ..GameConfig::default() };
        let parsed = GameConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_loss_rule_from_str() {
        assert!(matches!("board_full".parse::<LossRule>(), Ok(LossRule::BoardFull)));
        assert!(matches!("no_moves_left".parse::<LossRule>(), Ok(LossRule::NoMovesLeft)));
        assert!(matches!(
            "sometimes".parse::<LossRule>(),
            Err(ConfigError::UnknownLossRule(name)) if name == "sometimes"
        ));
    }
}
