//! `sccdag analyze`: run the full pipeline and emit the report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sccdag_core::{AnalysisError, AnalysisOptions, Objective, ParallelEdgePolicy, Stage, analyze};
use tracing::info;

use crate::cmd::{emit, fmt_component_path, fmt_distance, fmt_members};
use crate::config::Config;
use crate::input::{read_input, resolve_source};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::report::AnalysisReport;

/// Arguments for `sccdag analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// JSON graph record to analyze.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the report here instead of stdout (JSON unless a format is set).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Source vertex; overrides the record's `source`.
    #[arg(long, allow_negative_numbers = true)]
    pub source: Option<i64>,

    /// Weight kept for parallel condensation edges: first-seen, min or max.
    #[arg(long, value_name = "POLICY")]
    pub parallel_edges: Option<ParallelEdgePolicy>,
}

/// Execute `sccdag analyze`.
pub fn run_analyze(args: &AnalyzeArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    let graph = input
        .to_graph()
        .map_err(|source| AnalysisError {
            stage: Stage::Build,
            source,
        })
        .with_context(|| format!("invalid graph in {}", args.input.display()))?;

    let source = resolve_source(&graph, input.source, args.source)
        .map_err(|source| AnalysisError {
            stage: Stage::Build,
            source,
        })
        .with_context(|| format!("invalid source for {}", args.input.display()))?;

    let parallel_edges = args
        .parallel_edges
        .unwrap_or(config.analysis.parallel_edges);
    let analysis = analyze(&graph, source, &AnalysisOptions { parallel_edges })
        .with_context(|| format!("analysis of {} failed", args.input.display()))?;

    let report = AnalysisReport::new(&input, &graph, &analysis, parallel_edges);

    let mut body = Vec::new();
    render_mode(
        &mut body,
        output,
        config.output.pretty_json,
        &report,
        render_analysis_text,
        render_analysis_pretty,
    )?;
    emit(args.output.as_deref(), &body)?;

    if let Some(path) = &args.output {
        info!(path = %path.display(), bytes = body.len(), "report written");
    }
    Ok(())
}

fn render_analysis_text(report: &AnalysisReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "components {}", report.scc.components_count)?;
    for (id, members) in report.scc.components.iter().enumerate() {
        writeln!(w, "component {id}: {}", fmt_members(members))?;
    }
    writeln!(
        w,
        "condensation nodes={} edges={}",
        report.condensation_dag.nodes, report.condensation_dag.edges
    )?;
    writeln!(w, "order {}", fmt_members(&report.topological_sort.order))?;
    writeln!(
        w,
        "source {} component {}",
        report.input_meta.source, report.dag_shortest_paths.source_component
    )?;
    for p in &report.paths_examples {
        let t = p.target_component;
        writeln!(
            w,
            "target {t} shortest {} longest {}",
            fmt_distance(report.dag_shortest_paths.dist[t], Objective::Shortest),
            fmt_distance(report.dag_longest_paths.best[t], Objective::Longest),
        )?;
    }
    Ok(())
}

fn render_analysis_pretty(report: &AnalysisReport, w: &mut dyn Write) -> std::io::Result<()> {
    let meta = &report.input_meta;
    pretty_section(w, "Input")?;
    pretty_kv(w, "Vertices", meta.n.to_string())?;
    pretty_kv(w, "Directed", if meta.directed { "yes" } else { "no" })?;
    pretty_kv(
        w,
        "Source",
        format!(
            "{} (C{})",
            meta.source, report.dag_shortest_paths.source_component
        ),
    )?;
    pretty_kv(w, "Hash", &meta.content_hash)?;

    writeln!(w)?;
    pretty_section(
        w,
        &format!("Components ({})", report.scc.components_count),
    )?;
    for (id, members) in report.scc.components.iter().enumerate() {
        writeln!(w, "  C{id:<6} {}", fmt_members(members))?;
    }

    writeln!(w)?;
    pretty_section(w, "Condensation")?;
    pretty_kv(w, "Nodes", report.condensation_dag.nodes.to_string())?;
    pretty_kv(w, "Edges", report.condensation_dag.edges.to_string())?;
    pretty_kv(w, "Parallel", report.condensation_dag.parallel_edges.as_str())?;
    pretty_kv(
        w,
        "Topo order",
        fmt_component_path(&report.topological_sort.order),
    )?;

    writeln!(w)?;
    pretty_section(
        w,
        &format!(
            "Paths from C{}",
            report.dag_shortest_paths.source_component
        ),
    )?;
    writeln!(
        w,
        "  {:<8} {:>10} {:>10}  {:<24} {}",
        "TARGET", "SHORTEST", "LONGEST", "SHORTEST PATH", "LONGEST PATH"
    )?;
    for p in &report.paths_examples {
        let t = p.target_component;
        writeln!(
            w,
            "  {:<8} {:>10} {:>10}  {:<24} {}",
            format!("C{t}"),
            fmt_distance(report.dag_shortest_paths.dist[t], Objective::Shortest),
            fmt_distance(report.dag_longest_paths.best[t], Objective::Longest),
            fmt_component_path(&p.shortest_path),
            fmt_component_path(&p.longest_path),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::GraphInput;

    fn sample_report() -> AnalysisReport {
        let input: GraphInput = serde_json::from_str(
            r#"{"n": 5, "edges": [
                {"u": 0, "v": 1, "w": 1}, {"u": 1, "v": 2, "w": 1},
                {"u": 2, "v": 0, "w": 1}, {"u": 1, "v": 3, "w": 5}
            ]}"#,
        )
        .expect("valid record");
        let graph = input.to_graph().expect("valid graph");
        let analysis = analyze(&graph, 0, &AnalysisOptions::default()).expect("runs");
        AnalysisReport::new(&input, &graph, &analysis, ParallelEdgePolicy::FirstSeen)
    }

    fn rendered(f: fn(&AnalysisReport, &mut dyn Write) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&sample_report(), &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn analyze_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AnalyzeArgs,
        }

        let parsed = Wrapper::parse_from([
            "test",
            "graph.json",
            "--source",
            "-1",
            "--parallel-edges",
            "max",
            "-o",
            "out.json",
        ]);
        assert_eq!(parsed.args.input, PathBuf::from("graph.json"));
        assert_eq!(parsed.args.source, Some(-1));
        assert_eq!(parsed.args.parallel_edges, Some(ParallelEdgePolicy::Max));
        assert_eq!(parsed.args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn text_lists_components_and_distances() {
        let text = rendered(render_analysis_text);
        assert!(text.starts_with("components 3\n"));
        // Isolated vertex 4 finishes last, so it is numbered first.
        assert!(text.contains("component 0: 4\n"));
        assert!(text.contains("component 1: 0 2 1\n"));
        assert!(text.contains("condensation nodes=3 edges=1\n"));
        assert!(text.contains("shortest 5 longest 5\n"));
        assert!(text.contains("shortest unreached longest unreached\n"));
    }

    #[test]
    fn pretty_has_sections_and_paths() {
        let pretty = rendered(render_analysis_pretty);
        assert!(pretty.contains("Components (3)"));
        assert!(pretty.contains("Paths from C"));
        assert!(pretty.contains("blake3:"));
        assert!(pretty.contains("unreached"));
        assert!(pretty.contains(" -> "));
    }
}
