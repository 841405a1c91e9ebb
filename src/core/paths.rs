use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base pathpipe config directory. `PATHPIPE_CONFIG_DIR` overrides the
/// platform default (`%APPDATA%\pathpipe` on Windows, `~/.config/pathpipe`
/// elsewhere).
pub(crate) fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("PATHPIPE_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::Config("APPDATA environment variable not set on Windows".to_string())
        })?;
        Ok(PathBuf::from(appdata).join("pathpipe"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::Config("HOME environment variable not set on Unix-like system".to_string())
        })?;
        Ok(PathBuf::from(home).join(".config").join("pathpipe"))
    }
}

/// Settings file path inside the config directory.
pub(crate) fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("pathpipe.json"))
}
