//! Content scanning
//!
//! Each rule's `file_pattern` is a plain regex (not a glob) tested against the
//! candidate path as given. Only when it matches is `content_pattern` tested
//! against the proposed content. The first rule that matches both blocks.

use regex::Regex;

use crate::config::ContentRule;
use crate::error::{GuardError, Result};
use crate::output::{BlockCategory, Verdict};

use super::pattern::{build_regex, check_pattern_len};

/// Scan proposed content. Callers skip this when the content is empty.
pub fn scan(file_path: &str, content: &str, rules: &[ContentRule]) -> Result<Verdict> {
    for rule in rules {
        if !compile(&rule.file_pattern)?.is_match(file_path) {
            continue;
        }

        if compile(&rule.content_pattern)?.is_match(content) {
            tracing::debug!(file_pattern = %rule.file_pattern, reason = %rule.reason, "Content rule matched");
            return Ok(Verdict::block(BlockCategory::Content, rule.reason.clone()));
        }
    }

    Ok(Verdict::allow("content matched no rule"))
}

fn compile(pattern: &str) -> Result<Regex> {
    check_pattern_len(pattern)?;
    build_regex(pattern).map_err(|e| GuardError::InvalidContentRule {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
