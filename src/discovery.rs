//! Finds the clusterware installation and runs its status command.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(unix)]
use std::os::unix::fs::{MetadataExt, PermissionsExt};

use chrono::prelude::*;
use configparser::ini;
use regex::Regex;

use crate::config::Config;
use crate::record::Format;
use crate::{Error, Result};

static HOME_VARS: &[&str] = &["ORA_CRS_HOME", "GRID_HOME"];
static CACHE_SECTION: &str = "crs";
static PROC: &str = "/proc";
/// Assumed release of a home that only ships `crs_stat`
static PRE_CRSCTL_VERSION: &str = "10";

/// The installation the status is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub home: PathBuf,
    pub version: String,
    pub format: Format,
}

impl Format {
    /// `crsctl status resource -v` exists from 11.2 on.
    pub fn from_version(version: &str) -> Option<Format> {
        let mut parts = version.trim().split('.').map(str::parse::<u32>);
        let major = parts.next()?.ok()?;
        let minor = match parts.next() {
            Some(minor) => minor.ok()?,
            None => 0,
        };

        if major > 11 || (major == 11 && minor >= 2) {
            Some(Format::Verbose)
        } else {
            Some(Format::Legacy)
        }
    }
}

impl Environment {
    /// Resolves the home from, in order, `home`, the configuration, the
    /// environment, the cache (unless `refresh`) and the running daemons.
    pub fn discover(home: Option<PathBuf>, config: &Config, refresh: bool) -> Result<Environment> {
        let explicit = home
            .or_else(|| config.home.clone())
            .or_else(home_from_env);

        if let Some(home) = explicit {
            tracing::debug!(home = %home.display(), "using configured home");
            return Environment::from_home(home);
        }

        if !refresh {
            if let Some(environment) = Environment::from_cache(&config.cache) {
                tracing::debug!(cache = %config.cache.display(), "using cached environment");
                return Ok(environment);
            }
        }

        let environment = Environment::from_home(find_home()?)?;
        if let Err(e) = environment.store(&config.cache) {
            tracing::warn!(cache = %config.cache.display(), error = %e, "cannot write cache");
        }

        Ok(environment)
    }

    fn from_home(home: PathBuf) -> Result<Environment> {
        let version = query_version(&home)?;
        let format = Format::from_version(&version).ok_or_else(|| {
            Error::EnvironmentUndiscoverable(format!("unrecognized release version `{}`", version))
        })?;
        tracing::debug!(home = %home.display(), %version, %format, "environment discovered");

        Ok(Environment {
            home,
            version,
            format,
        })
    }

    /// The cached environment, when it still points to an installation.
    pub fn from_cache(path: impl AsRef<Path>) -> Option<Environment> {
        if !cache_is_trusted(path.as_ref()) {
            return None;
        }

        let mut cache = ini::Ini::new();
        if let Err(e) = cache.load(path.as_ref()) {
            tracing::debug!(error = %e, "no usable cache");
            return None;
        }

        let home = PathBuf::from(cache.get(CACHE_SECTION, "home")?);
        let version = cache.get(CACHE_SECTION, "version")?;
        if !home.join("bin").is_dir() {
            tracing::debug!(home = %home.display(), "cached home is gone");
            return None;
        }
        let format = Format::from_version(&version)?;

        Some(Environment {
            home,
            version,
            format,
        })
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut cache = ini::Ini::new();
        cache.set(
            CACHE_SECTION,
            "home",
            Some(self.home.to_string_lossy().into_owned()),
        );
        cache.set(CACHE_SECTION, "version", Some(self.version.clone()));
        cache.set(CACHE_SECTION, "date", Some(Utc::now().to_rfc3339()));
        fs::write(path.as_ref(), cache.writes())?;
        #[cfg(unix)]
        fs::set_permissions(path.as_ref(), fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Command printing the status of every resource in `format`.
    pub fn status_command(&self, format: Format, init: bool) -> Command {
        match format {
            Format::Legacy => Command::new(self.home.join("bin").join("crs_stat")),
            Format::Verbose => {
                let mut cmd = Command::new(self.home.join("bin").join("crsctl"));
                cmd.args(["status", "resource", "-v"]);
                if init {
                    cmd.arg("-init");
                }
                cmd
            }
        }
    }

    /// Output of the status command, failing when it fails or prints nothing.
    pub fn status_output(&self, format: Format, init: bool) -> Result<String> {
        let mut cmd = self.status_command(format, init);
        tracing::debug!(?cmd, "running status command");

        let output = cmd.output()?;
        let command = format!("{:?}", cmd);
        if !output.status.success() {
            return Err(Error::UpstreamCommandFailure {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(Error::EmptyOutput(command));
        }

        Ok(stdout)
    }
}

/// The cache names the binaries that get executed: only a file owned by the
/// current user and writable by nobody else is read.
#[cfg(unix)]
fn cache_is_trusted(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };

    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if metadata.uid() != euid {
        tracing::warn!(
            cache = %path.display(),
            owner = metadata.uid(),
            "ignoring cache owned by another user"
        );
        return false;
    }
    if metadata.mode() & 0o022 != 0 {
        tracing::warn!(
            cache = %path.display(),
            mode = %format!("{:o}", metadata.mode() & 0o777),
            "ignoring cache writable by others"
        );
        return false;
    }

    true
}

#[cfg(not(unix))]
fn cache_is_trusted(path: &Path) -> bool {
    path.exists()
}

fn home_from_env() -> Option<PathBuf> {
    HOME_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|home| !home.is_empty())
        .map(PathBuf::from)
}

fn daemon_regex() -> Result<Regex> {
    Ok(Regex::new(
        r"^(?P<home>/\S+)/bin/(?:ohasd|crsd|ocssd)\.bin(?:\s|$)",
    )?)
}

/// Home of a clusterware daemon, given the first argument of its command line.
fn home_from_cmdline(re: &Regex, exe: &str) -> Option<PathBuf> {
    re.captures(exe)
        .and_then(|caps| caps.name("home"))
        .map(|home| PathBuf::from(home.as_str()))
}

/// Looks for a running clusterware daemon.
fn find_home() -> Result<PathBuf> {
    find_home_in(Path::new(PROC))
}

fn find_home_in(proc: &Path) -> Result<PathBuf> {
    let re = daemon_regex()?;

    let processes = fs::read_dir(proc).map_err(|e| {
        Error::EnvironmentUndiscoverable(format!("{}: {}", proc.display(), e))
    })?;
    for entry in processes.flatten() {
        let is_pid = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.chars().all(|c| c.is_ascii_digit()));
        if !is_pid {
            continue;
        }

        // Processes may exit while walking /proc.
        let Ok(cmdline) = fs::read(entry.path().join("cmdline")) else {
            continue;
        };
        let cmdline = String::from_utf8_lossy(&cmdline);
        let exe = cmdline.split('\0').next().unwrap_or_default();
        if let Some(home) = home_from_cmdline(&re, exe) {
            tracing::debug!(pid = ?entry.file_name(), home = %home.display(), "found clusterware daemon");
            return Ok(home);
        }
    }

    Err(Error::EnvironmentUndiscoverable(
        "no running clusterware daemon found, use --home".to_string(),
    ))
}

/// Dotted version inside the brackets of `crsctl query ... releaseversion`.
fn parse_release_version(output: &str) -> Option<String> {
    let re = Regex::new(r"\[(\d+(?:\.\d+)+)\]").ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|version| version.as_str().to_string())
}

fn query_version(home: &Path) -> Result<String> {
    let bin = home.join("bin");
    let crsctl = bin.join("crsctl");

    if crsctl.exists() {
        // Oracle Restart only answers the `has` query.
        for stack in ["crs", "has"] {
            let output = match Command::new(&crsctl)
                .args(["query", stack, "releaseversion"])
                .output()
            {
                Ok(output) => output,
                Err(e) => {
                    tracing::debug!(error = %e, stack, "cannot run crsctl");
                    continue;
                }
            };
            if !output.status.success() {
                continue;
            }
            if let Some(version) = parse_release_version(&String::from_utf8_lossy(&output.stdout)) {
                return Ok(version);
            }
        }
    } else if bin.join("crs_stat").exists() {
        return Ok(PRE_CRSCTL_VERSION.to_string());
    }

    Err(Error::EnvironmentUndiscoverable(format!(
        "cannot determine the release of {}",
        home.display()
    )))
}
