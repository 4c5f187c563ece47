//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NEURO_QUEST_LEADERBOARD` | `leaderboard.txt` |
//! | `NEURO_QUEST_PLAYER` | `Player` |
//! | `NEURO_QUEST_SEED` | random |
//! | `NEURO_QUEST_MOTIF_LIMIT` | full pool |
//! | `NEURO_QUEST_LOG_DIR` | platform cache dir |
//! | `NEURO_QUEST_NO_SAVE` | off |

use std::path::PathBuf;

use crate::types::DEFAULT_PLAYER_NAME;

pub const DEFAULT_LEADERBOARD_FILE: &str = "leaderboard.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub leaderboard_path: PathBuf,
    pub player_name: String,
    /// Fixed shuffle seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Cap on the usable motif pool per level.
    pub motif_limit: Option<usize>,
    pub log_dir: Option<PathBuf>,
    pub save_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_FILE),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            seed: None,
            motif_limit: None,
            log_dir: None,
            save_enabled: true,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };
        let defaults = Self::default();

        let leaderboard_path = non_empty("NEURO_QUEST_LEADERBOARD")
            .map(PathBuf::from)
            .unwrap_or(defaults.leaderboard_path);

        let player_name = non_empty("NEURO_QUEST_PLAYER")
            .map(|s| s.replace(',', ""))
            .unwrap_or(defaults.player_name);

        let seed = non_empty("NEURO_QUEST_SEED").and_then(|s| s.parse().ok());

        let motif_limit = non_empty("NEURO_QUEST_MOTIF_LIMIT").and_then(|s| s.parse().ok());

        let log_dir = non_empty("NEURO_QUEST_LOG_DIR").map(PathBuf::from);

        let save_enabled = !non_empty("NEURO_QUEST_NO_SAVE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            leaderboard_path,
            player_name,
            seed,
            motif_limit,
            log_dir,
            save_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.leaderboard_path, PathBuf::from("leaderboard.txt"));
        assert_eq!(config.player_name, "Player");
        assert!(config.save_enabled);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("NEURO_QUEST_LEADERBOARD", "/tmp/scores.txt"),
            ("NEURO_QUEST_PLAYER", "Ann"),
            ("NEURO_QUEST_SEED", "42"),
            ("NEURO_QUEST_MOTIF_LIMIT", "3"),
            ("NEURO_QUEST_LOG_DIR", "/tmp/logs"),
            ("NEURO_QUEST_NO_SAVE", "TRUE"),
        ]));
        assert_eq!(config.leaderboard_path, PathBuf::from("/tmp/scores.txt"));
        assert_eq!(config.player_name, "Ann");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.motif_limit, Some(3));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(!config.save_enabled);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("NEURO_QUEST_SEED", "abc"),
            ("NEURO_QUEST_MOTIF_LIMIT", "-1"),
            ("NEURO_QUEST_PLAYER", "   "),
            ("NEURO_QUEST_NO_SAVE", "0"),
        ]));
        assert_eq!(config.seed, None);
        assert_eq!(config.motif_limit, None);
        assert_eq!(config.player_name, "Player");
        assert!(config.save_enabled);
    }

    #[test]
    fn test_player_name_drops_commas() {
        let config = AppConfig::from_lookup(lookup(&[("NEURO_QUEST_PLAYER", "Lee,Ann")]));
        assert_eq!(config.player_name, "LeeAnn");
    }
}
