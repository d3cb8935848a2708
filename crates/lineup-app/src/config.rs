// Configuration loading and parsing (league.toml, app.toml).

use lineup_core::lineup::slot::{parse_slots, Slot};
use lineup_core::projections::{Period, ProjectionScope, ScoringFormat};
use lineup_core::roster::player::PlayerId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Everything a run needs, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub team: TeamConfig,
    pub data_paths: DataPaths,
    pub display: DisplayConfig,
    /// Parsed from `league.roster_positions`, in declaration order.
    pub slots: Vec<Slot>,
}

impl Config {
    /// The projection scope this run optimizes for.
    pub fn scope(&self) -> ProjectionScope {
        ProjectionScope {
            season: self.league.season,
            period: match self.league.week {
                Some(w) => Period::Week(w),
                None => Period::Season,
            },
            format: self.league.scoring,
        }
    }

    /// Starters listed in league.toml, with "0" and "" meaning an empty slot.
    pub fn configured_starters(&self) -> Option<Vec<Option<PlayerId>>> {
        self.team
            .starters
            .as_ref()
            .map(|ids| ids.iter().map(|s| parse_starter_id(s)).collect())
    }
}

/// Platforms write "0" (or nothing) for an unfilled starting slot.
pub fn parse_starter_id(raw: &str) -> Option<PlayerId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "0" {
        None
    } else {
        Some(PlayerId::new(trimmed))
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for league.toml's top-level tables.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    team: TeamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub league_id: String,
    pub season: u16,
    /// Omit for a full-season projection scope.
    #[serde(default)]
    pub week: Option<u8>,
    pub scoring: ScoringFormat,
    /// Ordered slot labels, e.g. ["QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "BN"].
    pub roster_positions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub team_id: String,
    /// Current starters in slot order. When absent, the starters file from
    /// app.toml is used if configured.
    #[serde(default)]
    pub starters: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// app.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct AppFile {
    data_paths: DataPaths,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    pub projections: String,
    #[serde(default)]
    pub starters: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Fractional digits shown for projected points (1 or 2).
    #[serde(default = "default_precision")]
    pub precision: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> u8 {
    2
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/app.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- app.toml (required) ---
    let app_path = config_dir.join("app.toml");
    let app_text = read_file(&app_path)?;
    let app_file: AppFile = toml::from_str(&app_text).map_err(|e| ConfigError::ParseError {
        path: app_path.clone(),
        source: e,
    })?;

    let slots = parse_slots(&league_file.league.roster_positions).map_err(|e| {
        ConfigError::ValidationError {
            field: "league.roster_positions".into(),
            message: e.to_string(),
        }
    })?;

    let config = Config {
        league: league_file.league,
        team: league_file.team,
        data_paths: app_file.data_paths,
        display: app_file.display,
        slots,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.season == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.season".into(),
            message: "must be greater than 0".into(),
        });
    }

    if let Some(week) = config.league.week {
        if !(1..=18).contains(&week) {
            return Err(ConfigError::ValidationError {
                field: "league.week".into(),
                message: format!("must be between 1 and 18 inclusive, got {week}"),
            });
        }
    }

    if config.slots.iter().all(Slot::is_bench) {
        return Err(ConfigError::ValidationError {
            field: "league.roster_positions".into(),
            message: "must contain at least one starting slot".into(),
        });
    }

    if config.team.team_id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "team.team_id".into(),
            message: "must not be empty".into(),
        });
    }

    let precision = config.display.precision;
    if !(1..=2).contains(&precision) {
        return Err(ConfigError::ValidationError {
            field: "display.precision".into(),
            message: format!("must be 1 or 2, got {precision}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the lineup-app crate root (works whether `cargo test`
    /// runs from the crate root or the workspace root).
    fn crate_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/lineup-app/defaults").exists() {
            cwd.join("crates/lineup-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with config/ holding copies of both default files.
    fn temp_config_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();

        let root = crate_root();
        fs::copy(root.join("defaults/league.toml"), config_dir.join("league.toml")).unwrap();
        fs::copy(root.join("defaults/app.toml"), config_dir.join("app.toml")).unwrap();
        tmp
    }

    fn rewrite(tmp: &Path, file: &str, from: &str, to: &str) {
        let path = tmp.join("config").join(file);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "{file} should contain `{from}`");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        match load_config_from(tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_config_dir("lineup_config_defaults");
        let config = load_config_from(&tmp).expect("should load default config");

        assert_eq!(config.league.name, "Sunday Scaries League");
        assert_eq!(config.league.season, 2024);
        assert_eq!(config.league.week, Some(7));
        assert_eq!(config.league.scoring, ScoringFormat::Ppr);
        assert_eq!(config.team.team_id, "3");
        assert_eq!(config.slots.len(), 15);
        assert_eq!(config.slots[0].label, "QB");
        assert_eq!(config.slots.iter().filter(|s| s.is_bench()).count(), 6);
        assert_eq!(config.display.precision, 2);
        assert_eq!(config.data_paths.roster, "data/roster.csv");
        assert!(config.team.starters.is_none());

        let scope = config.scope();
        assert_eq!(scope.period, Period::Week(7));
        assert_eq!(scope.format, ScoringFormat::Ppr);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_week_means_season_scope() {
        let tmp = temp_config_dir("lineup_config_season_scope");
        rewrite(&tmp, "league.toml", "week = 7\n", "");
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.scope().period, Period::Season);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn configured_starters_parse_empty_markers() {
        let tmp = temp_config_dir("lineup_config_starters");
        rewrite(
            &tmp,
            "league.toml",
            "team_id = \"3\"",
            "team_id = \"3\"\nstarters = [\"4046\", \"0\", \"\", \"6794\"]",
        );
        let config = load_config_from(&tmp).unwrap();
        let starters = config.configured_starters().unwrap();
        assert_eq!(
            starters,
            vec![Some(PlayerId::from("4046")), None, None, Some(PlayerId::from("6794"))]
        );
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_slot_label() {
        let tmp = temp_config_dir("lineup_config_bad_slot");
        rewrite(&tmp, "league.toml", "\"K\"", "\"IDP_FLEX\"");
        expect_validation_field(&tmp, "league.roster_positions");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bench_only_roster() {
        let tmp = temp_config_dir("lineup_config_bench_only");
        let league = r#"
[league]
name = "Test"
league_id = "1"
season = 2024
scoring = "std"
roster_positions = ["BN", "BN", "IR"]

[team]
team_id = "1"
"#;
        fs::write(tmp.join("config/league.toml"), league).unwrap();
        expect_validation_field(&tmp, "league.roster_positions");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_week_out_of_range() {
        let tmp = temp_config_dir("lineup_config_week_range");
        rewrite(&tmp, "league.toml", "week = 7", "week = 19");
        expect_validation_field(&tmp, "league.week");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_season_zero() {
        let tmp = temp_config_dir("lineup_config_season_zero");
        rewrite(&tmp, "league.toml", "season = 2024", "season = 0");
        expect_validation_field(&tmp, "league.season");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_precision_out_of_range() {
        let tmp = temp_config_dir("lineup_config_precision");
        rewrite(&tmp, "app.toml", "precision = 2", "precision = 4");
        expect_validation_field(&tmp, "display.precision");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_unknown_scoring() {
        let tmp = temp_config_dir("lineup_config_bad_scoring");
        rewrite(&tmp, "league.toml", "scoring = \"ppr\"", "scoring = \"six_pt_pass\"");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_app_toml() {
        let tmp = temp_config_dir("lineup_config_missing_app");
        fs::remove_file(tmp.join("config/app.toml")).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("app.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_existing() {
        let tmp = std::env::temp_dir().join("lineup_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();

        let root = crate_root();
        fs::copy(root.join("defaults/league.toml"), defaults_dir.join("league.toml")).unwrap();
        fs::copy(root.join("defaults/app.toml"), defaults_dir.join("app.toml")).unwrap();
        fs::write(defaults_dir.join("league.toml.example"), "# example\n").unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(copied[0].ends_with("app.toml"));
        assert_eq!(fs::read_to_string(config_dir.join("league.toml")).unwrap(), "# custom\n");
        assert!(!config_dir.join("league.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("lineup_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_starter_id_markers() {
        assert_eq!(parse_starter_id("0"), None);
        assert_eq!(parse_starter_id("  "), None);
        assert_eq!(parse_starter_id(" 4984 "), Some(PlayerId::from("4984")));
    }
}
