use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use configparser::ini;

use crate::{Error, Result};

static CONFIG_DIR_SYS: &str = "/usr/etc";
static CONFIG_DIR: &str = "/etc";
static CONFIG: &str = "crsstat.cfg";
static SECTION: &str = "default";

/// Settings read from the `[default]` section of the configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Clusterware home, skips the discovery
    pub home: Option<PathBuf>,
    /// Where the discovered environment is remembered
    pub cache: PathBuf,
    /// Include the lower stack (`-init`) resources
    pub init: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            home: None,
            cache: default_cache(),
            init: false,
        }
    }
}

fn default_cache() -> PathBuf {
    let user = env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .unwrap_or_else(|_| "default".to_string());
    env::temp_dir().join(format!(".crsstat.{}", user))
}

impl Config {
    /// Reads all the files in order, later values win.
    pub fn from_files(paths: &[impl AsRef<Path>]) -> Result<Config> {
        let mut all_cfgs = String::new();

        for path in paths {
            all_cfgs.push_str(&fs::read_to_string(path)?);
            all_cfgs.push('\n');
        }

        Config::from_text(&all_cfgs)
    }

    fn from_text(text: &str) -> Result<Config> {
        let mut cfg = ini::Ini::new();
        cfg.read(text.to_string()).map_err(Error::Config)?;

        let mut config = Config::default();
        if let Some(home) = cfg.get(SECTION, "home").filter(|h| !h.is_empty()) {
            config.home = Some(PathBuf::from(home));
        }
        if let Some(cache) = cfg.get(SECTION, "cache").filter(|c| !c.is_empty()) {
            config.cache = PathBuf::from(cache);
        }
        config.init = cfg
            .getboolcoerce(SECTION, "init")
            .map_err(Error::Config)?
            .unwrap_or(false);

        Ok(config)
    }
}

/// Existing configuration files, from the system wide to the user one.
pub fn find_configs() -> Vec<PathBuf> {
    let mut candidates = vec![
        Path::new(CONFIG_DIR_SYS).join(CONFIG),
        Path::new(CONFIG_DIR).join(CONFIG),
    ];
    if let Ok(home) = env::var("HOME") {
        candidates.push(Path::new(&home).join(format!(".{}", CONFIG)));
    }

    candidates.into_iter().filter(|path| path.exists()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_text("").unwrap();
        assert_eq!(config.home, None);
        assert!(!config.init);
        assert!(config
            .cache
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".crsstat."));
    }

    #[test]
    fn keys() {
        let config = Config::from_text(
            "[default]\nhome = /u01/app/19.0.0/grid\ncache = /var/tmp/crsstat.cache\ninit = yes\n",
        )
        .unwrap();

        assert_eq!(config.home, Some(PathBuf::from("/u01/app/19.0.0/grid")));
        assert_eq!(config.cache, PathBuf::from("/var/tmp/crsstat.cache"));
        assert!(config.init);
    }

    #[test]
    fn later_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.cfg");
        let user = dir.path().join("user.cfg");
        fs::write(&system, "[default]\nhome = /opt/grid\ninit = true\n").unwrap();
        fs::write(&user, "[default]\nhome = /u01/grid\n").unwrap();

        let config = Config::from_files(&[system, user]).unwrap();
        assert_eq!(config.home, Some(PathBuf::from("/u01/grid")));
        assert!(config.init);
    }

    #[test]
    fn bad_boolean() {
        assert!(matches!(
            Config::from_text("[default]\ninit = maybe\n"),
            Err(Error::Config(_))
        ));
    }
}
