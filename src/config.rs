use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_REPLY_DELAY_MS: u32 = 320;
pub const MAX_REPLY_DELAY_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    PlayerVsPlayer,
    VsComputer,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("computer reply delay {0} ms exceeds the {max} ms limit", max = MAX_REPLY_DELAY_MS)]
    ReplyDelayTooLong(u32),
}

/// Match settings passed from the page as a plain object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    pub mode: GameMode,
    /// Pause before the computer replies. Cosmetic; the search never waits.
    pub computer_reply_delay_ms: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::PlayerVsPlayer,
            computer_reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.computer_reply_delay_ms > MAX_REPLY_DELAY_MS {
            return Err(ConfigError::ReplyDelayTooLong(self.computer_reply_delay_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_pvp() {
        let config = MatchConfig::default();

        assert_eq!(config.mode, GameMode::PlayerVsPlayer);
        assert_eq!(config.computer_reply_delay_ms, 320);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn overlong_delay_is_rejected() {
        let config = MatchConfig {
            mode: GameMode::VsComputer,
            computer_reply_delay_ms: 10_000,
        };

        let err = config.validate().unwrap_err();

        assert_eq!(err, ConfigError::ReplyDelayTooLong(10_000));
        assert!(err.to_string().contains("5000 ms limit"));
    }
}
