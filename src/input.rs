//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON input from stdin that Claude Code sends to PreToolUse hooks.

use serde::Deserialize;

use crate::error::Result;

/// Main input structure from Claude Code hooks
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Write", "Read", "Bash")
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// Hook event name (e.g., "PreToolUse")
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

/// The subset of tool parameters the gate looks at.
///
/// Unknown keys are ignored, but `file_path` and `content` must be strings
/// when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

/// Operation kind, resolved once from `tool_name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// A file write; the only kind the gate inspects
    Write,
    /// Anything else passes through unchecked
    Other,
}

impl ToolKind {
    pub fn from_tool_name(name: &str) -> Self {
        match name {
            "Write" => ToolKind::Write,
            _ => ToolKind::Other,
        }
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn kind(&self) -> ToolKind {
        ToolKind::from_tool_name(&self.tool_name)
    }

    /// Candidate path, if one was supplied and is non-empty
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input
            .file_path
            .as_deref()
            .filter(|p| !p.is_empty())
    }

    /// Proposed content, empty when absent
    pub fn content(&self) -> &str {
        self.tool_input.content.as_deref().unwrap_or("")
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        match self.file_path() {
            Some(path) => format!("{}: {}", self.tool_name, path),
            None => self.tool_name.clone(),
        }
    }
}
