//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Directory name under the cache root.
const CACHE_DIR_NAME: &str = "luet-pm-installer";

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve the cache directory from `XDG_CACHE_HOME` and `HOME` values.
fn cache_dir_from(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let cache_root = xdg_cache_home
        .filter(|v| !v.is_empty())
        .map_or_else(
            || home.map_or_else(|| PathBuf::from("."), PathBuf::from).join(".cache"),
            PathBuf::from,
        );
    cache_root.join(CACHE_DIR_NAME)
}

/// Return the `$XDG_CACHE_HOME/luet-pm-installer/` directory, creating it if needed.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let dir = cache_dir_from(std::env::var_os("XDG_CACHE_HOME"), std::env::var_os("HOME"));
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for `command` in the cache directory.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(format!("{command}.log")))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn cache_dir_prefers_xdg() {
        assert_eq!(
            cache_dir_from(Some("/var/cache/build".into()), Some("/root".into())),
            PathBuf::from("/var/cache/build/luet-pm-installer")
        );
    }

    #[test]
    fn cache_dir_falls_back_to_home() {
        assert_eq!(
            cache_dir_from(None, Some("/root".into())),
            PathBuf::from("/root/.cache/luet-pm-installer")
        );
        assert_eq!(
            cache_dir_from(Some(OsString::new()), Some("/home/u".into())),
            PathBuf::from("/home/u/.cache/luet-pm-installer")
        );
    }

    #[test]
    fn cache_dir_without_home_is_relative() {
        assert_eq!(
            cache_dir_from(None, None),
            PathBuf::from("./.cache/luet-pm-installer")
        );
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8);
        assert_eq!(&s[2..3], ":");
        assert_eq!(&s[5..6], ":");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
    }
}
