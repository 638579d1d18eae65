use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
///
/// Unresolvable variables leave the path untouched.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tilde_when_expanding_then_uses_home() {
        let home = std::env::var("HOME").expect("HOME should be set");
        let expanded = expand_path(Path::new("~/scripts/demo.txt"));
        assert_eq!(expanded, Path::new(&home).join("scripts/demo.txt"));
    }

    #[test]
    fn given_plain_path_when_expanding_then_unchanged() {
        assert_eq!(
            expand_path(Path::new("relative/script.txt")),
            PathBuf::from("relative/script.txt")
        );
    }

    #[test]
    fn given_unset_variable_when_expanding_then_keeps_original() {
        let original = Path::new("$BRANCHTREE_SURELY_UNSET_VAR/x");
        assert_eq!(expand_path(original), original.to_path_buf());
    }
}
