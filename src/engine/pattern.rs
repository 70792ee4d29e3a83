//! Path pattern compilation
//!
//! A policy pattern is matched in one of three ways:
//!
//! - **Directory prefix**: the expanded pattern ends with `/`. Any candidate
//!   starting with the pattern minus its trailing `/` matches.
//! - **Glob**: the raw pattern contains `*`, `?`, `[` or `]`. `**` crosses
//!   separators, `*` and `?` do not, `[!...]` is a negated class. The regex is
//!   anchored and tested against the full path and its basename.
//! - **Literal**: exact match, a `/<pattern>` suffix, or a prefix match.
//!
//! A glob with unbalanced brackets is matched as a literal instead.

use regex::{Regex, RegexBuilder};

use crate::error::{GuardError, Result};

use super::expand::PathExpander;

/// Longest pattern accepted, in bytes
pub const MAX_PATTERN_LEN: usize = 1024;

/// Compiled size cap handed to the regex engine
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

const GLOB_META: &[char] = &['*', '?', '[', ']'];

/// Reject patterns over [`MAX_PATTERN_LEN`]
pub fn check_pattern_len(pattern: &str) -> Result<()> {
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(GuardError::PatternTooLong {
            pattern: pattern.chars().take(64).collect(),
            len: pattern.len(),
            max: MAX_PATTERN_LEN,
        });
    }
    Ok(())
}

/// Build a size-limited regex
pub fn build_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

/// A single pattern, ready to test expanded candidate paths
#[derive(Debug, Clone)]
pub enum CompiledMatcher {
    DirectoryPrefix { prefix: String },
    Glob { regex: Regex },
    Literal { expanded: String, raw: String },
}

impl CompiledMatcher {
    /// Compile `pattern` under the given expansion context
    pub fn compile(pattern: &str, expander: &PathExpander) -> Result<Self> {
        check_pattern_len(pattern)?;

        let expanded = expander.expand(pattern);

        if let Some(prefix) = expanded.strip_suffix('/') {
            return Ok(CompiledMatcher::DirectoryPrefix {
                prefix: prefix.to_string(),
            });
        }

        if pattern.contains(GLOB_META) {
            let (value, rest) = expander.split(pattern);
            if let Some(regex) = glob_to_regex(value, rest).and_then(|re| build_regex(&re).ok()) {
                return Ok(CompiledMatcher::Glob { regex });
            }
            tracing::debug!(pattern, "Glob did not compile, matching as literal");
        }

        Ok(CompiledMatcher::Literal {
            expanded,
            raw: pattern.to_string(),
        })
    }

    /// Test an already expanded candidate path
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            CompiledMatcher::DirectoryPrefix { prefix } => candidate.starts_with(prefix.as_str()),
            CompiledMatcher::Glob { regex } => {
                regex.is_match(candidate) || regex.is_match(basename(candidate))
            }
            CompiledMatcher::Literal { expanded, raw } => {
                candidate == expanded
                    || candidate.ends_with(&format!("/{}", raw))
                    || candidate.starts_with(expanded.as_str())
            }
        }
    }

    /// Name of the strategy, for logging
    pub fn mode(&self) -> &'static str {
        match self {
            CompiledMatcher::DirectoryPrefix { .. } => "directory",
            CompiledMatcher::Glob { .. } => "glob",
            CompiledMatcher::Literal { .. } => "literal",
        }
    }
}

/// Expand both sides and test `candidate` against `pattern`
pub fn path_matches(pattern: &str, candidate: &str, expander: &PathExpander) -> Result<bool> {
    let matcher = CompiledMatcher::compile(pattern, expander)?;
    Ok(matcher.matches(&expander.expand(candidate)))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Translate a glob into an anchored regex. `literal` is an expanded marker
/// value matched as-is in front of `glob`. `None` on unbalanced brackets.
fn glob_to_regex(literal: &str, glob: &str) -> Option<String> {
    let mut re = String::with_capacity(literal.len() + glob.len() * 2 + 2);
    re.push('^');
    re.push_str(&regex::escape(literal));

    let mut chars = glob.chars().peekable();
    let mut in_class = false;
    let mut prev_dash = false;

    while let Some(c) = chars.next() {
        if in_class {
            match c {
                ']' => {
                    re.push(']');
                    in_class = false;
                }
                // `&&`, `~~` and `--` are set operators inside regex classes
                '[' | '\\' | '&' | '~' => {
                    re.push('\\');
                    re.push(c);
                }
                '-' if prev_dash || chars.peek() == Some(&'-') => re.push_str("\\-"),
                _ => re.push(c),
            }
            prev_dash = c == '-';
            continue;
        }

        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    re.push_str(".*");
                } else {
                    re.push_str("[^/]*");
                }
            }
            '?' => re.push_str("[^/]"),
            '[' => {
                in_class = true;
                prev_dash = false;
                re.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    re.push('^');
                }
            }
            ']' => return None,
            _ => {
                let mut buf = [0u8; 4];
                re.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }

    if in_class {
        return None;
    }

    re.push('$');
    Some(re)
}
