//! Output layer shared by every `sccdag` subcommand.
//!
//! Commands receive an [`OutputMode`] and format through [`render_mode`]:
//! sectioned output for humans, compact lines for pipes, or the stable JSON
//! report.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` in the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use sccdag_core::{AnalysisError, GraphError};
use serde::{Deserialize, Serialize};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned keys).
    Pretty,
    /// Terse plain text for pipes and scripts.
    Text,
    /// Machine-readable JSON report.
    Json,
}

impl OutputMode {
    fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_format: Option<OutputMode>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown env values fall through.
    if let Some(mode) = format_env.and_then(OutputMode::parse_loose) {
        return mode;
    }

    if let Some(mode) = config_format {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config file and TTY defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_format: Option<OutputMode>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_format,
        is_tty,
    )
}

/// Render a serializable value into `out` with explicit pretty/text renderers.
///
/// JSON mode serializes `value` directly, indented when `pretty_json` is set.
pub fn render_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    pretty_json: bool,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            if pretty_json {
                serde_json::to_writer_pretty(&mut *out, value)?;
            } else {
                serde_json::to_writer(&mut *out, value)?;
            }
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1001", "input_unreadable").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }
}

impl From<&GraphError> for CliError {
    fn from(err: &GraphError) -> Self {
        let kind = err.kind();
        Self {
            message: err.to_string(),
            suggestion: kind.hint().map(str::to_string),
            error_code: Some(kind.code().to_string()),
        }
    }
}

impl From<&AnalysisError> for CliError {
    fn from(err: &AnalysisError) -> Self {
        Self {
            message: err.to_string(),
            ..Self::from(&err.source)
        }
    }
}

impl From<&anyhow::Error> for CliError {
    /// Graph errors anywhere in the chain keep their code and hint. The
    /// message joins the context chain down to the first graph error.
    fn from(err: &anyhow::Error) -> Self {
        let mut parts = Vec::new();
        let mut typed = None;
        for cause in err.chain() {
            parts.push(cause.to_string());
            if let Some(e) = cause.downcast_ref::<AnalysisError>() {
                typed = Some(Self::from(e));
                break;
            }
            if let Some(e) = cause.downcast_ref::<GraphError>() {
                typed = Some(Self::from(e));
                break;
            }
        }
        let message = parts.join(": ");
        match typed {
            Some(typed) => Self { message, ..typed },
            None => Self::new(message),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use sccdag_core::Stage;

    fn captured(f: impl FnOnce(&mut dyn Write) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some(OutputMode::Json),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env_and_config() {
        let mode =
            resolve_output_mode_inner(None, true, Some("pretty"), Some(OutputMode::Text), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_config() {
        let mode =
            resolve_output_mode_inner(None, false, Some("TEXT"), Some(OutputMode::Json), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_unknown_env_falls_through_to_config() {
        let mode =
            resolve_output_mode_inner(None, false, Some("fancy"), Some(OutputMode::Json), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_default_depends_on_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, false),
            OutputMode::Text
        );
    }

    // ── render_mode ─────────────────────────────────────────────────────────

    #[derive(Serialize)]
    struct Sample {
        count: u32,
    }

    #[test]
    fn render_mode_json_compact_and_pretty() {
        let compact = captured(|w| {
            render_mode(w, OutputMode::Json, false, &Sample { count: 3 }, |_, _| Ok(()), |_, _| Ok(()))
        });
        assert_eq!(compact, "{\"count\":3}\n");

        let pretty = captured(|w| {
            render_mode(w, OutputMode::Json, true, &Sample { count: 3 }, |_, _| Ok(()), |_, _| Ok(()))
        });
        assert!(pretty.contains("\n  \"count\": 3\n"));
    }

    #[test]
    fn render_mode_dispatches_text_and_pretty() {
        let text = captured(|w| {
            render_mode(
                w,
                OutputMode::Text,
                true,
                &Sample { count: 7 },
                |s, w| writeln!(w, "count={}", s.count),
                |_, w| writeln!(w, "unused"),
            )
        });
        assert_eq!(text, "count=7\n");

        let pretty = captured(|w| {
            render_mode(
                w,
                OutputMode::Pretty,
                true,
                &Sample { count: 7 },
                |_, w| writeln!(w, "unused"),
                |s, w| pretty_kv(w, "Count", s.count.to_string()),
            )
        });
        assert!(pretty.starts_with("Count:"));
        assert!(pretty.trim_end().ends_with('7'));
    }

    // ── CliError ────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_graph_error_carries_code_and_hint() {
        let err = GraphError::VertexOutOfRange { vertex: 9, n: 3 };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.contains("vertex 9"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn cli_error_from_anyhow_finds_analysis_error_in_chain() {
        let err = anyhow::Error::new(AnalysisError {
            stage: Stage::TopoSort,
            source: GraphError::CondensationCycle {
                placed: 1,
                expected: 2,
            },
        })
        .context("analysis of graph.json failed");

        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.message.starts_with("analysis of graph.json failed: topo-sort stage failed"));
    }

    #[test]
    fn cli_error_from_plain_anyhow_has_no_code() {
        let err: anyhow::Error = Err::<(), _>(io::Error::other("disk gone"))
            .context("failed to read input.json")
            .expect_err("error");
        let cli = CliError::from(&err);
        assert_eq!(cli.message, "failed to read input.json: disk gone");
        assert!(cli.error_code.is_none());
    }

    #[test]
    fn write_error_human_and_json() {
        let err = CliError {
            suggestion: Some("try again".to_string()),
            error_code: Some("E1001".to_string()),
            ..CliError::new("bad input")
        };

        let human = captured(|w| write_error(w, OutputMode::Pretty, &err));
        assert_eq!(human, "error: bad input\n  suggestion: try again\n");

        let json = captured(|w| write_error(w, OutputMode::Json, &err));
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(parsed["error"]["error_code"], "E1001");
        assert_eq!(parsed["error"]["message"], "bad input");
    }

    #[test]
    fn output_mode_deserializes_lowercase() {
        let mode: OutputMode = serde_json::from_str("\"json\"").expect("parse");
        assert_eq!(mode, OutputMode::Json);
    }
}
