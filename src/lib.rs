//! write-guard - Access-control gate for Claude Code Write operations
//!
//! Decides, before a file write runs, whether to allow or block it.
//!
//! # Features
//!
//! - **Zero-access paths**: never writable, checked first
//! - **Read-only paths**: not writable, checked after zero-access
//! - **Content rules**: regex checks on proposed content, gated by a path regex
//! - **Glob, directory and literal patterns** with `~` and `$CLAUDE_PROJECT_DIR` expansion
//! - **Fault policy**: fail-open or fail-closed when evaluation itself fails
//! - **Audit logging**: JSONL log of all outcomes
//!
//! # Example
//!
//! ```
//! use write_guard::{HookInput, PathExpander, PolicyDocument, WriteGate};
//! use write_guard::config::FaultPolicy;
//!
//! let mut policy = PolicyDocument::empty();
//! policy.zero_access_paths.push("~/.ssh/".to_string());
//! let gate = WriteGate::new(policy, PathExpander::from_env(None), FaultPolicy::Allow);
//!
//! let input = r#"{"tool_name":"Write","tool_input":{"file_path":"~/.ssh/id_rsa","content":"x"}}"#;
//! let hook_input = HookInput::from_json(input).unwrap();
//!
//! let verdict = gate.check(&hook_input);
//! assert!(verdict.is_blocked());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;

// Re-exports for convenience
pub use config::{Config, ContentRule, PolicyDocument};
pub use engine::{PathExpander, WriteGate};
pub use error::GuardError;
pub use input::{HookInput, ToolInput, ToolKind};
pub use output::{BlockCategory, HookOutcome, Verdict};
