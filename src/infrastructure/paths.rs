//! Path translation for the Zellij plugin sandbox.

use std::path::PathBuf;

/// Root the host filesystem is mounted at inside the sandbox.
pub const HOST_ROOT: &str = "/host";

/// Directory for the plugin's trace file.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT)
        .join(".local/share/zellij")
        .join("hypothesizer")
}

/// Maps a leading `~` to the sandbox host root.
///
/// # Example
///
/// ```rust
/// use hypothesizer::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/papers"), "/host/papers");
/// assert_eq!(expand_tilde("/tmp/out"), "/tmp/out");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => HOST_ROOT.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOST_ROOT}{rest}"),
        _ => path.to_string(),
    }
}

/// Turns a sandbox path back into the one the user recognises.
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    match path.strip_prefix(HOST_ROOT) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde("~"), "/host");
        assert_eq!(expand_tilde("~/exports/ml"), "/host/exports/ml");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
        assert_eq!(expand_tilde("relative/dir"), "relative/dir");
    }

    #[test]
    fn host_prefix_is_shown_as_home() {
        assert_eq!(strip_host_prefix("/host/exports/a.md"), "~/exports/a.md");
        assert_eq!(strip_host_prefix("/host"), "~");
        assert_eq!(strip_host_prefix("/hostile/a.md"), "/hostile/a.md");
        assert_eq!(strip_host_prefix("/tmp/a.md"), "/tmp/a.md");
    }

    #[test]
    fn data_dir_is_under_host() {
        assert!(get_data_dir().starts_with(HOST_ROOT));
        assert!(get_data_dir().ends_with("hypothesizer"));
    }
}
