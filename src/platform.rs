//! Per-OS locations for the client's settings file and local storage.
//!
//! - **Linux**: `$XDG_CONFIG_HOME/goodnews`, `$XDG_DATA_HOME/goodnews`
//!   (falling back to `~/.config` and `~/.local/share`)
//! - **macOS**: `~/Library/Application Support/GoodNews` for both
//! - **Windows**: `%APPDATA%\GoodNews` for both

use std::env;
use std::path::PathBuf;

fn home() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `$var/goodnews` when `var` is set, otherwise `~/<fallback>/goodnews`.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("goodnews"),
        _ => fallback
            .iter()
            .fold(home(), |path, part| path.join(part))
            .join("goodnews"),
    }
}

#[cfg(target_os = "macos")]
fn app_support_dir() -> PathBuf {
    home().join("Library").join("Application Support").join("GoodNews")
}

#[cfg(target_os = "windows")]
fn roaming_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home().join("AppData").join("Roaming"));
    appdata.join("GoodNews")
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        roaming_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Directory holding `local_storage.json`.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        roaming_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}
