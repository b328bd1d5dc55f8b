//! Session configuration.
//!
//! Every timing and sizing constant the rules engine uses lives here, so a
//! host can tune windows for testing or alternative table rules without
//! touching the state machine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;
use super::seat::{TurnOrder, SEAT_COUNT};
use crate::cards::DECK_SIZE;

/// Session configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of each seat's peek window (default: 5s).
    pub peek_window: Duration,

    /// Length of a Look or Joker power window (default: 5s).
    pub power_window: Duration,

    /// Length of each responder's slot in a respond window (default: 3s).
    pub respond_window: Duration,

    /// Cards dealt to every seat (default: 4).
    pub hand_size: usize,

    /// Distinct own-hand slots a seat may reveal while peeking (default: 2).
    pub peek_limit: usize,

    /// Cards drawn as a penalty for a mismatched response (default: 2).
    pub penalty_cards: usize,

    /// Turn order, fixed for the whole session.
    pub turn_order: TurnOrder,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            peek_window: Duration::from_secs(5),
            power_window: Duration::from_secs(5),
            respond_window: Duration::from_secs(3),
            hand_size: 4,
            peek_limit: 2,
            penalty_cards: 2,
            turn_order: TurnOrder::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 {
            return Err(ConfigError::EmptyHand);
        }
        if self.hand_size * SEAT_COUNT > DECK_SIZE {
            return Err(ConfigError::HandSizeTooLarge {
                hand_size: self.hand_size,
            });
        }
        if self.peek_limit > self.hand_size {
            return Err(ConfigError::PeekLimitTooLarge {
                peek_limit: self.peek_limit,
                hand_size: self.hand_size,
            });
        }
        for (name, window) in [
            ("peek", self.peek_window),
            ("power", self.power_window),
            ("respond", self.respond_window),
        ] {
            if window.is_zero() {
                return Err(ConfigError::ZeroWindow(name));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_peek_window(mut self, window: Duration) -> Self {
        self.peek_window = window;
        self
    }

    #[must_use]
    pub fn with_power_window(mut self, window: Duration) -> Self {
        self.power_window = window;
        self
    }

    #[must_use]
    pub fn with_respond_window(mut self, window: Duration) -> Self {
        self.respond_window = window;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_peek_limit(mut self, limit: usize) -> Self {
        self.peek_limit = limit;
        self
    }

    #[must_use]
    pub fn with_penalty_cards(mut self, count: usize) -> Self {
        self.penalty_cards = count;
        self
    }

    #[must_use]
    pub fn with_turn_order(mut self, order: TurnOrder) -> Self {
        self.turn_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeatId;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.peek_window, Duration::from_secs(5));
        assert_eq!(config.respond_window, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_hands() {
        let config = SessionConfig::default().with_hand_size(14);
        assert_eq!(
            config.validate(),
            Err(ConfigError::HandSizeTooLarge { hand_size: 14 })
        );
        assert!(SessionConfig::default().with_hand_size(13).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_windows() {
        let config = SessionConfig::default().with_respond_window(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow("respond")));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SessionConfig::from_json(r#"{"hand_size": 5, "turn_order": [3, 2, 1, 0]}"#)
            .unwrap();
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.penalty_cards, 2);
        assert_eq!(config.turn_order.first(), SeatId::new(3));
    }

    #[test]
    fn test_from_json_rejects_bad_turn_order() {
        let err = SessionConfig::from_json(r#"{"turn_order": [0, 0, 1, 2]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
