use league_api::league::{ConfigError, DivisionScope, LeagueConfig};
use log::{LevelFilter, debug};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub league: LeagueConfig,
    /// Division to open on, from `HOOPS_DIVISION` (slug or full name).
    pub division: Option<String>,
    /// Signed-in user for `--check-access`, from `HOOPS_UID`.
    pub uid: Option<String>,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        Ok(Self {
            full_screen: false,
            log_level: var("HOOPS_LOG").and_then(|l| l.parse().ok()),
            league: load_league_config()?,
            division: var("HOOPS_DIVISION"),
            uid: var("HOOPS_UID"),
        })
    }

    pub fn initial_scope(&self) -> DivisionScope {
        match &self.division {
            Some(d) => self.league.resolve_scope(d),
            None => DivisionScope::All,
        }
    }
}

/// A missing file means the built-in league layout; a broken one is an error.
fn load_league_config() -> Result<LeagueConfig, ConfigError> {
    let path = league_config_path();
    match LeagueConfig::from_path(&path) {
        Err(ConfigError::FileNotFound { path }) => {
            debug!("no league config at {}, using defaults", path.display());
            Ok(LeagueConfig::default())
        }
        other => other,
    }
}

fn league_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("HOOPS_LEAGUE_CONFIG")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("hoopsboard").join("league.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("hoopsboard")
            .join("league.json");
    }
    PathBuf::from("league.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(division: Option<&str>) -> AppSettings {
        AppSettings {
            full_screen: false,
            log_level: None,
            league: LeagueConfig::default(),
            division: division.map(str::to_owned),
            uid: None,
        }
    }

    #[test]
    fn division_slug_opens_that_division() {
        assert_eq!(
            settings(Some("14u")).initial_scope(),
            DivisionScope::Division("14U (8th)".into())
        );
        assert_eq!(settings(Some("all")).initial_scope(), DivisionScope::All);
        assert_eq!(settings(None).initial_scope(), DivisionScope::All);
    }
}
