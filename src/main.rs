//! write-guard - Access-control gate for Claude Code Write operations
//!
//! # Usage
//!
//! ```bash
//! # As a Claude Code PreToolUse hook (reads JSON from stdin, exit status is the verdict)
//! echo '{"tool_name":"Write","tool_input":{"file_path":"~/.ssh/id_rsa","content":"x"}}' | write-guard
//!
//! # With an explicit config file
//! write-guard --config ./write-guard.toml
//!
//! # Dry-run mode (report what would be blocked)
//! write-guard --dry-run
//! ```

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use write_guard::{
    audit::{AuditEntry, AuditLogger},
    config::Config,
    engine::WriteGate,
    input::HookInput,
    output::{HookOutcome, EXIT_ALLOW},
};

/// Environment variable holding the log filter
const LOG_ENV: &str = "WRITE_GUARD_LOG";

/// Environment variable enabling dry-run mode
const DRY_RUN_ENV: &str = "WRITE_GUARD_DRY_RUN";

/// Print version information
fn print_version() {
    println!("write-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"write-guard - Access-control gate for Claude Code Write operations

USAGE:
    write-guard [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file
    -d, --dry-run           Report blocks but allow the write

ENVIRONMENT:
    WRITE_GUARD_DRY_RUN=1   Same as --dry-run
    WRITE_GUARD_LOG         Log filter (default: warn)
    CLAUDE_PROJECT_DIR      Value of the $CLAUDE_PROJECT_DIR pattern marker

EXIT STATUS:
    0   allow
    1   malformed hook input
    2   blocked (reason on stderr, prefixed SECURITY:)

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Write",
          "hooks": [{{ "type": "command", "command": "~/.claude/write-guard/write-guard" }}]
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    dry_run: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            dry_run: false,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    init_logging();

    // Load configuration
    let config = if let Some(ref path) = args.config_path {
        Config::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            Config::default()
        })
    } else {
        Config::load()
    };

    let dry_run = args.dry_run
        || config.general.dry_run
        || env::var(DRY_RUN_ENV).is_ok_and(|v| !v.is_empty() && v != "0");

    let gate = WriteGate::from_config(&config);
    let mut logger = AuditLogger::new(config.audit_path().as_deref());

    // The payload is the whole decision input; read to end before parsing
    let mut input_json = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_json) {
        return finish(HookOutcome::malformed(format!("failed to read stdin: {}", e)));
    }

    // No input = nothing to check, allow
    if input_json.trim().is_empty() {
        return ExitCode::from(EXIT_ALLOW);
    }

    let input = match HookInput::from_json(&input_json) {
        Ok(input) => input,
        Err(e) => {
            if let Err(log_err) = logger.log(&AuditEntry::malformed(e.to_string())) {
                eprintln!("Warning: Failed to write audit log: {}", log_err);
            }
            return finish(HookOutcome::malformed(e));
        }
    };

    let verdict = gate.check(&input);
    tracing::debug!(input = %input.summary(), ?verdict, "Decision");

    if let Err(e) = logger.log_verdict(&input, &verdict, dry_run) {
        eprintln!("Warning: Failed to write audit log: {}", e);
    }

    finish(HookOutcome::from_verdict(&verdict, input.file_path(), dry_run))
}

/// Write the diagnostic and convert the outcome to an exit status
fn finish(outcome: HookOutcome) -> ExitCode {
    if let Some(message) = outcome.diagnostic() {
        eprintln!("{}", message);
    }
    ExitCode::from(outcome.exit_code())
}
