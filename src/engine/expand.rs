//! Path variable expansion
//!
//! Patterns and candidate paths both go through the same expander before any
//! comparison, so `~/.ssh/` in a policy matches `~/.ssh/id_rsa` in a request
//! whether or not the home directory is known.

/// Base-directory markers, checked in order
const BASE_DIR_MARKERS: &[&str] = &["${CLAUDE_PROJECT_DIR}", "$CLAUDE_PROJECT_DIR"];

/// Substitutes leading `~` and `$CLAUDE_PROJECT_DIR` markers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathExpander {
    home: Option<String>,
    base_dir: Option<String>,
}

impl PathExpander {
    pub fn new(home: Option<String>, base_dir: Option<String>) -> Self {
        Self {
            home: home.map(trim_trailing_separator),
            base_dir: base_dir.map(trim_trailing_separator),
        }
    }

    /// Expander using the current user's home directory
    pub fn from_env(base_dir: Option<String>) -> Self {
        let home = dirs::home_dir().map(|p| p.display().to_string());
        Self::new(home, base_dir)
    }

    /// Expander that leaves every string unchanged
    #[cfg(test)]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Expand a path or pattern. Unknown or unresolved markers pass through.
    pub fn expand(&self, path: &str) -> String {
        let (value, rest) = self.split(path);
        format!("{}{}", value, rest)
    }

    /// Split off a leading marker: `(resolved value, remainder)`.
    ///
    /// The value is empty when no known marker resolves. It is never pattern
    /// syntax and must be matched literally.
    pub fn split<'a>(&'a self, path: &'a str) -> (&'a str, &'a str) {
        if let Some(home) = &self.home {
            if let Some(rest) = strip_marker(path, "~") {
                return (home.as_str(), rest);
            }
        }

        if let Some(base) = &self.base_dir {
            for marker in BASE_DIR_MARKERS {
                if let Some(rest) = strip_marker(path, marker) {
                    return (base.as_str(), rest);
                }
            }
        }

        ("", path)
    }
}

/// Strip `marker` when it is the whole string or is followed by `/`
fn strip_marker<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(marker)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn trim_trailing_separator(dir: String) -> String {
    if dir.len() > 1 && dir.ends_with('/') {
        dir.trim_end_matches('/').to_string()
    } else {
        dir
    }
}
