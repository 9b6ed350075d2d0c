//! Configuration file discovery.
//!
//! Discovers `.reva.toml` files by walking up the directory tree from a
//! starting point, then appending the global `~/.reva.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".reva.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global
/// (`~/.reva.toml`) last. Discovery stops at the first config that sets
/// `root = true`; in that case the global config is not appended either.
///
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            let is_root = is_root_config(&candidate);
            configs.push(candidate);
            if is_root {
                found_root = true;
                break;
            }
        }
    }

    if !found_root
        && let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.reva.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Filters discovered configs down to the ones under the test tree.
    fn local_only(configs: Vec<PathBuf>) -> Vec<PathBuf> {
        configs
            .into_iter()
            .filter(|p| !is_global_config(p))
            .collect()
    }

    #[test]
    fn discover_finds_nothing_without_configs() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a/b");
        fs::create_dir_all(&deep).unwrap();

        assert!(local_only(discover_config_files(&deep)).is_empty());
    }

    #[test]
    fn discover_walks_up_in_precedence_order() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join(CONFIG_FILENAME);
        fs::write(&outer, "# outer\n").unwrap();

        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let inner = project.join(CONFIG_FILENAME);
        fs::write(&inner, "# inner\n").unwrap();

        let deep = project.join("data/batches");
        fs::create_dir_all(&deep).unwrap();

        let configs = local_only(discover_config_files(&deep));
        assert_eq!(configs, vec![inner, outer]);
    }

    #[test]
    fn discover_starts_at_cwd_itself() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILENAME);
        fs::write(&config, "# here\n").unwrap();

        let configs = local_only(discover_config_files(dir.path()));
        assert_eq!(configs, vec![config]);
    }

    #[test]
    fn root_config_stops_discovery() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "# outer\n").unwrap();

        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let root_config = project.join(CONFIG_FILENAME);
        fs::write(&root_config, "root = true\n").unwrap();

        let deep = project.join("src");
        fs::create_dir_all(&deep).unwrap();

        // The root config cuts off both the outer and the global config.
        let configs = discover_config_files(&deep);
        assert_eq!(configs, vec![root_config]);
    }

    #[test]
    fn root_false_does_not_stop_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join(CONFIG_FILENAME);
        fs::write(&outer, "# outer\n").unwrap();

        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let inner = project.join(CONFIG_FILENAME);
        fs::write(&inner, "root = false\n").unwrap();

        let configs = local_only(discover_config_files(&project));
        assert_eq!(configs, vec![inner, outer]);
    }

    #[test]
    fn discover_skips_directory_named_like_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_FILENAME)).unwrap();

        assert!(local_only(discover_config_files(dir.path())).is_empty());
    }

    #[test]
    fn global_config_path_ends_with_filename() {
        let path = global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with(CONFIG_FILENAME));
    }

    #[test]
    fn is_global_config_distinguishes_paths() {
        let global = global_config_path().unwrap();
        assert!(is_global_config(&global));
        assert!(!is_global_config(Path::new("/tmp/.reva.toml")));
    }
}
