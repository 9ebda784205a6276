//! Input structs for simulation scripts.
//!
//! ```json
//! {
//!   "commands": [
//!     { "at_ms": 4000, "action": "toggle_play" },
//!     { "at_ms": 9000, "action": "toggle_play" },
//!     { "at_ms": 12000, "action": "skip" },
//!     { "at_ms": 130000, "action": "complete", "outcome": "start_solo" }
//!   ],
//!   "run_until_ms": 140000
//! }
//! ```

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub commands: Vec<ScriptCommand>,

    /// Let the clock run on to this time after the last command.
    pub run_until_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptCommand {
    /// Virtual time at which the command is issued.
    pub at_ms: u64,
    pub action: Action,
    /// Outcome tag, only read by `complete`.
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Skip,
    TogglePlay,
    ToggleSound,
    Tick,
    Complete,
}

impl Script {
    /// Index of the first command scheduled earlier than its predecessor.
    pub fn first_out_of_order(&self) -> Option<usize> {
        self.commands
            .windows(2)
            .position(|w| w[1].at_ms < w[0].at_ms)
            .map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script: Script = serde_json::from_str(
            r#"{"commands": [
                {"at_ms": 10, "action": "skip"},
                {"at_ms": 20, "action": "complete", "outcome": "create_clan"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.commands.len(), 2);
        assert_eq!(script.commands[1].action, Action::Complete);
        assert_eq!(script.commands[1].outcome.as_deref(), Some("create_clan"));
        assert_eq!(script.run_until_ms, None);
        assert_eq!(script.first_out_of_order(), None);
    }

    #[test]
    fn test_detects_unsorted_commands() {
        let script: Script = serde_json::from_str(
            r#"{"commands": [
                {"at_ms": 50, "action": "tick"},
                {"at_ms": 10, "action": "skip"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.first_out_of_order(), Some(1));
    }
}
