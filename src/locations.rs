use crate::errors::{Result, ShellError, ShellErrorType};
use directories::BaseDirs;
use std::path::PathBuf;

pub fn get_default_storage_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| {
        ShellError::new(
            ShellErrorType::ConfigError,
            "Unable to determine the home directory".to_string(),
        )
    })?;
    let main_dir = base_dirs.home_dir().join("vshell");
    if !main_dir.exists() {
        std::fs::create_dir_all(&main_dir)?;
    }
    Ok(main_dir)
}

pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = get_default_storage_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}
