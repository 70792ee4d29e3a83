//! Verdicts and their mapping to the hook process contract
//!
//! Claude Code reads a PreToolUse hook's exit status: `0` lets the tool run,
//! `2` blocks it and feeds stderr back to the model. Anything else is reported
//! as a hook error.

use std::fmt;

/// Exit status for an allowed write (including fail-open faults)
pub const EXIT_ALLOW: u8 = 0;

/// Exit status for a malformed hook payload
pub const EXIT_MALFORMED: u8 = 1;

/// Exit status for a security block
pub const EXIT_BLOCK: u8 = 2;

/// Which layer produced a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    ZeroAccess,
    ReadOnly,
    Content,
    /// Evaluation faulted and the fault policy is fail-closed
    Fault,
}

impl BlockCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BlockCategory::ZeroAccess => "zero-access path",
            BlockCategory::ReadOnly => "read-only path",
            BlockCategory::Content => "content rule",
            BlockCategory::Fault => "internal fault",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal outcome of one decision request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The write may proceed
    Allowed { reason: String },

    /// The write must not proceed
    Blocked {
        category: BlockCategory,
        reason: String,
    },

    /// Evaluation faulted and the fault policy let the write through
    FaultAllowed { detail: String },
}

impl Verdict {
    pub fn allow(reason: impl Into<String>) -> Self {
        Verdict::Allowed {
            reason: reason.into(),
        }
    }

    pub fn block(category: BlockCategory, reason: impl Into<String>) -> Self {
        Verdict::Blocked {
            category,
            reason: reason.into(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }

    pub fn is_allowed(&self) -> bool {
        !self.is_blocked()
    }

    pub fn category(&self) -> Option<BlockCategory> {
        match self {
            Verdict::Blocked { category, .. } => Some(*category),
            _ => None,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Allowed { reason } => reason,
            Verdict::Blocked { reason, .. } => reason,
            Verdict::FaultAllowed { detail } => detail,
        }
    }
}

/// What the hook process does once a request has been handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Allow,

    /// Blocked; the message goes to stderr
    Block { message: String },

    /// Would have blocked, but dry-run lets it through
    DryRunBlock { message: String },

    /// Fail-open fault; the detail is still reported
    Fault { detail: String },

    /// The payload could not be parsed
    Malformed { detail: String },
}

impl HookOutcome {
    /// Map a verdict to the process outcome for the given candidate path
    pub fn from_verdict(verdict: &Verdict, file_path: Option<&str>, dry_run: bool) -> Self {
        match verdict {
            Verdict::Allowed { .. } => HookOutcome::Allow,
            Verdict::FaultAllowed { detail } => HookOutcome::Fault {
                detail: detail.clone(),
            },
            Verdict::Blocked { reason, .. } => {
                let path = file_path.unwrap_or("<unknown>");
                if dry_run {
                    HookOutcome::DryRunBlock {
                        message: format!(
                            "SECURITY (dry-run): Would block write to {}: {}",
                            path, reason
                        ),
                    }
                } else {
                    HookOutcome::Block {
                        message: format!("SECURITY: Blocked write to {}: {}", path, reason),
                    }
                }
            }
        }
    }

    pub fn malformed(detail: impl fmt::Display) -> Self {
        HookOutcome::Malformed {
            detail: detail.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            HookOutcome::Allow | HookOutcome::DryRunBlock { .. } | HookOutcome::Fault { .. } => {
                EXIT_ALLOW
            }
            HookOutcome::Block { .. } => EXIT_BLOCK,
            HookOutcome::Malformed { .. } => EXIT_MALFORMED,
        }
    }

    /// Line to write to stderr, if any
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            HookOutcome::Allow => None,
            HookOutcome::Block { message } | HookOutcome::DryRunBlock { message } => {
                Some(message.clone())
            }
            HookOutcome::Fault { detail } => {
                Some(format!("write-guard: internal fault (allowing): {}", detail))
            }
            HookOutcome::Malformed { detail } => {
                Some(format!("write-guard: failed to parse hook input: {}", detail))
            }
        }
    }
}
