//! `sccdag components`: strongly connected components only.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sccdag_core::{AnalysisError, Stage, scc};

use crate::cmd::{emit, fmt_members};
use crate::config::Config;
use crate::input::read_input;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::report::ComponentsReport;

/// Arguments for `sccdag components`.
#[derive(Args, Debug, Default)]
pub struct ComponentsArgs {
    /// JSON graph record to decompose.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Execute `sccdag components`.
pub fn run_components(
    args: &ComponentsArgs,
    config: &Config,
    output: OutputMode,
) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    let graph = input
        .to_graph()
        .map_err(|source| AnalysisError {
            stage: Stage::Build,
            source,
        })
        .with_context(|| format!("invalid graph in {}", args.input.display()))?;

    let staged = scc::kosaraju(&graph);
    let report = ComponentsReport::new(&graph, &staged);

    let mut body = Vec::new();
    render_mode(
        &mut body,
        output,
        config.output.pretty_json,
        &report,
        render_components_text,
        render_components_pretty,
    )?;
    emit(None, &body)
}

fn render_components_text(report: &ComponentsReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "components {}", report.scc.components_count)?;
    for (id, members) in report.scc.components.iter().enumerate() {
        let marker = if report.cycle_components.contains(&id) {
            " cycle"
        } else {
            ""
        };
        writeln!(w, "component {id}{marker}: {}", fmt_members(members))?;
    }
    Ok(())
}

fn render_components_pretty(report: &ComponentsReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Strongly connected components ({})",
            report.scc.components_count
        ),
    )?;
    pretty_kv(w, "Cycles", report.cycle_components.len().to_string())?;
    pretty_kv(w, "Hash", &report.content_hash)?;
    writeln!(w)?;

    if report.scc.components.is_empty() {
        writeln!(w, "Graph has no vertices.")?;
        return Ok(());
    }

    for (id, members) in report.scc.components.iter().enumerate() {
        let marker = if report.cycle_components.contains(&id) {
            "  (cycle)"
        } else {
            ""
        };
        writeln!(w, "  C{id:<6} {}{marker}", fmt_members(members))?;
    }
    Ok(())
}
