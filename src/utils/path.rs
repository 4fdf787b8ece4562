//! Path utilities: expand `~` in paths given on the command line or in the
//! configuration file.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde("/var/lib/a.sqlite"), PathBuf::from("/var/lib/a.sqlite"));
        assert_eq!(expand_tilde("rel/a~b"), PathBuf::from("rel/a~b"));
    }

    #[test]
    fn home_prefix_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/photos"), home.join("photos"));
        }
    }
}
