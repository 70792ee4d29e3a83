//! Configuration loading for write-guard
//!
//! Supports TOML configuration with embedded defaults. The policy section is
//! the immutable document the gate evaluates; it is loaded once per process.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{GuardError, Result};

/// Environment variable naming the project base directory
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// What the gate does when evaluation itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Let the write through and report the fault (fail-open)
    #[default]
    #[serde(alias = "open")]
    Allow,

    /// Block the write (fail-closed)
    #[serde(alias = "closed")]
    Block,
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,

    /// Behavior on evaluation faults
    pub on_fault: FaultPolicy,

    /// Report blocks without enforcing them
    pub dry_run: bool,

    /// Value for the `$CLAUDE_PROJECT_DIR` marker; falls back to the environment
    pub base_dir: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some("~/.claude/write-guard/audit.jsonl".to_string()),
            on_fault: FaultPolicy::Allow,
            dry_run: false,
            base_dir: None,
        }
    }
}

/// A conditional content check: applies when `file_pattern` matches the path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRule {
    /// Regex tested against the candidate path
    #[serde(alias = "file_pattern")]
    pub file_pattern: String,

    /// Regex tested against the proposed content
    #[serde(alias = "content_pattern")]
    pub content_pattern: String,

    /// Reported when the rule blocks
    pub reason: String,
}

impl ContentRule {
    pub fn new(
        file_pattern: impl Into<String>,
        content_pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            file_pattern: file_pattern.into(),
            content_pattern: content_pattern.into(),
            reason: reason.into(),
        }
    }
}

/// The policy evaluated for every write.
///
/// Lists missing from a `[policy]` section are empty; the built-in defaults
/// only apply when the whole section is absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    /// Paths that may never be written, checked first
    #[serde(default, alias = "zero_access_paths")]
    pub zero_access_paths: Vec<String>,

    /// Paths that may not be written, checked after zero-access
    #[serde(default, alias = "read_only_paths")]
    pub read_only_paths: Vec<String>,

    /// Content checks, in order
    #[serde(default, alias = "content_rules")]
    pub content_rules: Vec<ContentRule>,
}

impl PolicyDocument {
    /// A policy with no rules; every write is allowed
    pub fn empty() -> Self {
        Self {
            zero_access_paths: Vec::new(),
            read_only_paths: Vec::new(),
            content_rules: Vec::new(),
        }
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            zero_access_paths: vec![
                "~/.ssh/".to_string(),
                "~/.gnupg/".to_string(),
                "~/.aws/".to_string(),
                "~/.config/gcloud/".to_string(),
                "~/.azure/".to_string(),
                "~/.kube/config".to_string(),
                "~/.docker/config.json".to_string(),
                "~/.netrc".to_string(),
                "~/.npmrc".to_string(),
                "~/.pypirc".to_string(),
                "*.pem".to_string(),
                "*.p12".to_string(),
                "*.key".to_string(),
                "id_rsa".to_string(),
                "id_ed25519".to_string(),
            ],
            read_only_paths: vec![
                "/etc/".to_string(),
                "/usr/".to_string(),
                "/bin/".to_string(),
                "/sbin/".to_string(),
                "~/.bashrc".to_string(),
                "~/.zshrc".to_string(),
                "~/.profile".to_string(),
                "~/.claude/settings.json".to_string(),
                "package-lock.json".to_string(),
                "yarn.lock".to_string(),
                "pnpm-lock.yaml".to_string(),
                "Cargo.lock".to_string(),
                "poetry.lock".to_string(),
            ],
            content_rules: vec![
                ContentRule::new(
                    ".*",
                    r"-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----",
                    "private key material",
                ),
                ContentRule::new(".*", r"AKIA[0-9A-Z]{16}", "AWS access key literal"),
                ContentRule::new(
                    ".*",
                    r"gh[pousr]_[A-Za-z0-9_]{36,}",
                    "GitHub token literal",
                ),
                ContentRule::new(
                    r"\.(env|ya?ml|json|toml)$",
                    r"(?i)(api[_-]?key|secret[_-]?key|access[_-]?token)\s*[=:]\s*['\x22]?[a-zA-Z0-9_]{16,}",
                    "hard-coded credential",
                ),
            ],
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub policy: PolicyDocument,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/write-guard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/write-guard/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(error = %e, "Ignoring unusable config file"),
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            GuardError::Config { reason, .. } => GuardError::Config {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GuardError::Config {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded), if audit logging is on
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }

    /// Resolved value of the base-directory marker
    pub fn base_dir(&self) -> Option<String> {
        self.general
            .base_dir
            .clone()
            .or_else(|| std::env::var(PROJECT_DIR_ENV).ok())
            .filter(|dir| !dir.is_empty())
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.claude/write-guard/audit.jsonl"
on_fault = "allow"
dry_run = false

[policy]
zeroAccessPaths = [
    "~/.ssh/",
    "~/.gnupg/",
    "~/.aws/",
    "~/.config/gcloud/",
    "~/.azure/",
    "~/.kube/config",
    "~/.docker/config.json",
    "~/.netrc",
    "~/.npmrc",
    "~/.pypirc",
    "*.pem",
    "*.p12",
    "*.key",
    "id_rsa",
    "id_ed25519",
]
readOnlyPaths = [
    "/etc/",
    "/usr/",
    "/bin/",
    "/sbin/",
    "~/.bashrc",
    "~/.zshrc",
    "~/.profile",
    "~/.claude/settings.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
]

[[policy.contentRules]]
filePattern = '.*'
contentPattern = '-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----'
reason = "private key material"

[[policy.contentRules]]
filePattern = '.*'
contentPattern = 'AKIA[0-9A-Z]{16}'
reason = "AWS access key literal"

[[policy.contentRules]]
filePattern = '.*'
contentPattern = 'gh[pousr]_[A-Za-z0-9_]{36,}'
reason = "GitHub token literal"

[[policy.contentRules]]
filePattern = '\.(env|ya?ml|json|toml)$'
contentPattern = '''(?i)(api[_-]?key|secret[_-]?key|access[_-]?token)\s*[=:]\s*['\x22]?[a-zA-Z0-9_]{16,}'''
reason = "hard-coded credential"
"#;
