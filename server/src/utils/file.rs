//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path (config file, seed file) to an absolute path.
///
/// - `~` and `~/rest` resolve against the home directory
/// - relative paths (`.`, `..`, `./x`, bare names) resolve against the current directory
/// - absolute paths are returned unchanged
///
/// ```text
/// expand_path("~/.incidents/incidents.json") // -> /home/user/.incidents/incidents.json
/// expand_path("seed.json")                   // -> /current/dir/seed.json
/// expand_path("/etc/incidents.json")         // -> /etc/incidents.json
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute_unchanged() {
        assert_eq!(
            expand_path("/etc/incidents.json"),
            PathBuf::from("/etc/incidents.json")
        );
    }

    #[test]
    fn test_expand_path_relative_becomes_absolute() {
        let result = expand_path("seed.json");
        assert!(result.is_absolute());
        assert_eq!(result, std::env::current_dir().unwrap().join("seed.json"));

        let result = expand_path("./data/seed.json");
        assert!(result.is_absolute());
        assert!(result.ends_with("data/seed.json"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.incidents/incidents.json");
        assert!(result.is_absolute());
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".incidents/incidents.json"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_expand_path_tilde_user_form_not_expanded() {
        // `~other/..` is a plain relative name, not a home reference
        let result = expand_path("~other/file.json");
        assert!(result.ends_with("~other/file.json"));
    }

    #[test]
    fn test_expand_path_trims_whitespace() {
        assert_eq!(expand_path("  /srv/seed.json  "), PathBuf::from("/srv/seed.json"));
    }

    #[test]
    fn test_expand_path_empty_is_current_dir() {
        let result = expand_path("   ");
        assert!(result.is_absolute());
        assert!(!result.as_os_str().is_empty());
    }
}
