use directories::ProjectDirs;
use std::path::PathBuf;

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "rx-cli")
}

/// Where the optional `config.toml` is looked up.
///
/// Falls back to the working directory on systems without a home directory.
pub fn config_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_default()
        .join("config.toml")
}
