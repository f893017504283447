use std::path::PathBuf;

/// Per-user configuration directory for 8stash
pub fn get_config_directory() -> Option<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        "macos" => dirs::home_dir().map(|home| home.join("Library/Application Support")),
        _ => dirs::config_dir(),
    };

    base.map(|dir| dir.join("8stash"))
}

/// Location of the user-level fallback config file
pub fn get_user_config_file() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join("config.yaml"))
}
