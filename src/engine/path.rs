//! Path classification against zero-access and read-only lists
//!
//! First match wins. Zero-access patterns are always tried before read-only
//! patterns, and a zero-access hit returns without touching the read-only list.

use crate::config::PolicyDocument;
use crate::error::Result;
use crate::output::{BlockCategory, Verdict};

use super::expand::PathExpander;
use super::pattern::CompiledMatcher;

/// Classify a candidate path
pub fn classify(file_path: &str, policy: &PolicyDocument, expander: &PathExpander) -> Result<Verdict> {
    let candidate = expander.expand(file_path);

    if let Some(pattern) = first_match(&policy.zero_access_paths, &candidate, expander)? {
        return Ok(blocked(BlockCategory::ZeroAccess, pattern));
    }

    if let Some(pattern) = first_match(&policy.read_only_paths, &candidate, expander)? {
        return Ok(blocked(BlockCategory::ReadOnly, pattern));
    }

    Ok(Verdict::allow("path matched no protected pattern"))
}

fn first_match<'a>(
    patterns: &'a [String],
    candidate: &str,
    expander: &PathExpander,
) -> Result<Option<&'a str>> {
    for pattern in patterns {
        let matcher = CompiledMatcher::compile(pattern, expander)?;
        if matcher.matches(candidate) {
            tracing::debug!(pattern = %pattern, mode = matcher.mode(), candidate, "Path pattern matched");
            return Ok(Some(pattern.as_str()));
        }
    }
    Ok(None)
}

fn blocked(category: BlockCategory, pattern: &str) -> Verdict {
    Verdict::block(category, format!("{}: {}", category.label(), pattern))
}
