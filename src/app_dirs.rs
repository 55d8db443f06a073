use directories::ProjectDirs;
use std::path::PathBuf;

/// Where round storage lives on disk.
pub struct AppDirs;

impl AppDirs {
    /// The round database, preferring `~/.local/state` when HOME is set.
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("earshot");
            Some(state_dir.join("rounds.db"))
        } else {
            ProjectDirs::from("", "", "earshot")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("rounds.db"))
        }
    }

    /// The append-only CSV log of finished rounds.
    pub fn round_log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "earshot")
            .map(|proj_dirs| proj_dirs.config_dir().join("rounds.csv"))
    }
}
