//! Session options

use crate::board::Board;
use crate::legal;
use crate::types::{Color, Coord, GameMode, Piece};

use std::time::Duration;

/// Default delay before the computer makes its move
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(500);

/// Whether moves which leave the own king attacked are allowed
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum CheckPolicy {
    /// Check is ignored, the king can be left attacked and then captured
    #[default]
    Permissive,
    /// Moves which leave the own king attacked are rejected
    Strict,
}

impl CheckPolicy {
    /// Returns `true` if moving `piece` to `dst` on board `b` is allowed by this policy
    ///
    /// The move must be legal, this function only checks the policy-specific requirements.
    pub fn allows(&self, piece: &Piece, dst: Coord, b: &Board) -> bool {
        match self {
            CheckPolicy::Permissive => true,
            CheckPolicy::Strict => legal::is_safe_move(piece, dst, b),
        }
    }
}

/// Options of a game session
///
/// # Example
///
/// ```
/// # use tapchess::{CheckPolicy, Color, GameMode, Options};
/// # use std::time::Duration;
/// #
/// let options = Options::default()
///     .with_mode(GameMode::HumanVsAi)
///     .with_ai_color(Color::White)
///     .with_ai_delay(Duration::ZERO)
///     .with_check_policy(CheckPolicy::Strict);
/// assert_eq!(options.ai_color, Color::White);
/// assert_eq!(Options::default().ai_delay, Duration::from_millis(500));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Options {
    /// Game mode the session starts in
    pub mode: GameMode,
    /// Side played by the computer in [`GameMode::HumanVsAi`]
    pub ai_color: Color,
    /// Delay between the human move and the computer reply
    pub ai_delay: Duration,
    /// Whether moves can leave the own king attacked
    pub check_policy: CheckPolicy,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            mode: GameMode::HumanVsHuman,
            ai_color: Color::Black,
            ai_delay: DEFAULT_AI_DELAY,
            check_policy: CheckPolicy::Permissive,
        }
    }
}

impl Options {
    #[inline]
    pub fn with_mode(mut self, mode: GameMode) -> Options {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_ai_color(mut self, color: Color) -> Options {
        self.ai_color = color;
        self
    }

    #[inline]
    pub fn with_ai_delay(mut self, delay: Duration) -> Options {
        self.ai_delay = delay;
        self
    }

    #[inline]
    pub fn with_check_policy(mut self, policy: CheckPolicy) -> Options {
        self.check_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.mode, GameMode::HumanVsHuman);
        assert_eq!(options.ai_color, Color::Black);
        assert_eq!(options.ai_delay, Duration::from_millis(500));
        assert_eq!(options.check_policy, CheckPolicy::Permissive);
    }

    #[test]
    fn test_policy() {
        let b = Board::from_placement("4k3/4r3/8/8/8/8/4B3/4K3").unwrap();
        let bishop = b.piece_at(Coord::from_str("e2").unwrap()).unwrap();
        let d3 = Coord::from_str("d3").unwrap();
        assert!(CheckPolicy::Permissive.allows(bishop, d3, &b));
        assert!(!CheckPolicy::Strict.allows(bishop, d3, &b));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let options = Options::default()
            .with_mode(GameMode::HumanVsAi)
            .with_check_policy(CheckPolicy::Strict);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"human-vs-ai\""));
        assert!(json.contains("\"strict\""));
        assert!(json.contains("\"black\""));
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        let partial: Options = serde_json::from_str(r#"{"ai_color": "white"}"#).unwrap();
        assert_eq!(partial, Options::default().with_ai_color(Color::White));
    }
}
