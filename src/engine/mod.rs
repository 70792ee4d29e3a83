//! Decision gate for write-guard
//!
//! Runs the path check, then the content check, and stops at the first block.
//! Non-write tools and requests without a file path are allowed untouched.

pub mod content;
pub mod expand;
pub mod path;
pub mod pattern;

use crate::config::{Config, FaultPolicy, PolicyDocument};
use crate::error::{GuardError, Result};
use crate::input::{HookInput, ToolKind};
use crate::output::{BlockCategory, Verdict};

pub use expand::PathExpander;
pub use pattern::CompiledMatcher;

/// The write gate: an immutable policy plus its expansion context
#[derive(Debug, Clone)]
pub struct WriteGate {
    policy: PolicyDocument,
    expander: PathExpander,
    on_fault: FaultPolicy,
}

impl WriteGate {
    pub fn new(policy: PolicyDocument, expander: PathExpander, on_fault: FaultPolicy) -> Self {
        Self {
            policy,
            expander,
            on_fault,
        }
    }

    /// Create a gate from loaded configuration, resolving markers from the environment
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.policy.clone(),
            PathExpander::from_env(config.base_dir()),
            config.general.on_fault,
        )
    }

    /// Main entry point: check an input and return a verdict
    pub fn check(&self, input: &HookInput) -> Verdict {
        if input.kind() != ToolKind::Write {
            return Verdict::allow(format!("{} is not a write", input.tool_name));
        }

        let Some(file_path) = input.file_path() else {
            return Verdict::allow("no file path to check");
        };

        match self.evaluate(file_path, input.content()) {
            Ok(verdict) => verdict,
            Err(e) => self.fault(e),
        }
    }

    /// Path check, then content check when the content is non-empty
    pub fn evaluate(&self, file_path: &str, content: &str) -> Result<Verdict> {
        let verdict = path::classify(file_path, &self.policy, &self.expander)?;
        if verdict.is_blocked() {
            return Ok(verdict);
        }

        if content.is_empty() {
            return Ok(verdict);
        }

        content::scan(file_path, content, &self.policy.content_rules)
    }

    fn fault(&self, error: GuardError) -> Verdict {
        tracing::warn!(error = %error, on_fault = ?self.on_fault, "Evaluation fault");
        match self.on_fault {
            FaultPolicy::Allow => Verdict::FaultAllowed {
                detail: error.to_string(),
            },
            FaultPolicy::Block => Verdict::block(
                BlockCategory::Fault,
                format!("{}: {}", BlockCategory::Fault.label(), error),
            ),
        }
    }
}
