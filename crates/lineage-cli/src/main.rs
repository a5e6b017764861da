use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lineage_core::{LayoutDirection, LayoutStrategy, NodeId};
use lineage_graph::{LayoutConfig, LayoutRequest, LineageDocument, LineageLayout};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out document lineage graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Position the visible part of a lineage document
    Layout(LayoutArgs),
    /// Print the descendant count of every node
    Count(InputArgs),
    /// List visible node and edge ids for the current expand state
    Visible(LayoutArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Lineage document (nodes, edges, optional root and expanded map)
    #[arg(short, long)]
    input: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    io: InputArgs,

    /// Layout configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TB, BT, LR or RL
    #[arg(short, long)]
    direction: Option<LayoutDirection>,

    /// auto, tree or layered
    #[arg(short, long)]
    strategy: Option<LayoutStrategy>,

    /// Root node id, overriding the document
    #[arg(short, long)]
    root: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VisibleSummary<'a> {
    nodes: Vec<&'a NodeId>,
    edges: Vec<&'a str>,
    collapsed: Vec<&'a NodeId>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Layout(args) => run_layout(&args),
        Command::Count(args) => run_count(&args),
        Command::Visible(args) => run_visible(&args),
    }
}

fn load_document(path: &Path) -> Result<LineageDocument> {
    LineageDocument::load(path).with_context(|| format!("reading lineage document {}", path.display()))
}

fn load_layout(args: &LayoutArgs) -> Result<LineageLayout> {
    let config = match &args.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("reading layout config {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    Ok(LineageLayout::new(config))
}

fn build_request<'a>(document: &'a LineageDocument, args: &'a LayoutArgs) -> LayoutRequest<'a> {
    let mut request = document.request();
    if let Some(root) = &args.root {
        request = request.with_root(root);
    }
    if let Some(direction) = args.direction {
        request = request.with_direction(direction);
    }
    if let Some(strategy) = args.strategy {
        request = request.with_strategy(strategy);
    }
    request
}

fn run_layout(args: &LayoutArgs) -> Result<()> {
    let layout = load_layout(args)?;
    let document = load_document(&args.io.input)?;
    let result = layout.arrange(&build_request(&document, args));

    tracing::info!(
        "Placed {} of {} nodes, {} collapsed with hidden descendants",
        result.nodes.len(),
        document.nodes.len(),
        result.hidden.len()
    );
    emit(&args.io, &result)
}

fn run_count(args: &InputArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let counts = LineageLayout::default().descendant_counts(&document.nodes, &document.edges);
    emit(args, &counts)
}

fn run_visible(args: &LayoutArgs) -> Result<()> {
    let layout = load_layout(args)?;
    let document = load_document(&args.io.input)?;
    let visible = layout.visible(&build_request(&document, args));

    let summary = VisibleSummary {
        nodes: visible.nodes.iter().map(|node| &node.id).collect(),
        edges: visible.edges.iter().map(|edge| edge.id.0.as_str()).collect(),
        collapsed: visible.collapsed.clone(),
    };
    emit(&args.io, &summary)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn emit<T: Serialize>(args: &InputArgs, value: &T) -> Result<()> {
    let json = render(value, args.pretty)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!("Wrote output to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "nodes": [
            { "id": "deal:1", "type": "deal", "data": { "label": "Acme" } },
            { "id": "document:1", "type": "document" },
            { "id": "visual_asset:1", "type": "visual_asset" },
            { "id": "evidence:1", "type": "evidence" }
        ],
        "edges": [
            { "id": "e1", "source": "deal:1", "target": "document:1" },
            { "id": "e2", "source": "document:1", "target": "visual_asset:1" },
            { "id": "e3", "source": "visual_asset:1", "target": "evidence:1" }
        ]
    }"#;

    fn write_document(dir: &Path) -> PathBuf {
        let path = dir.join("lineage.json");
        fs::write(&path, DOCUMENT).unwrap();
        path
    }

    fn layout_args(input: PathBuf, output: PathBuf) -> LayoutArgs {
        LayoutArgs {
            io: InputArgs {
                input,
                output: Some(output),
                pretty: false,
            },
            config: None,
            direction: None,
            strategy: None,
            root: None,
        }
    }

    #[test]
    fn test_cli_parses_layout_flags() {
        let cli = Cli::try_parse_from([
            "lineage", "layout", "--input", "in.json", "--direction", "LR", "--strategy", "dagre",
            "--root", "deal:1", "--pretty",
        ])
        .unwrap();

        let Command::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.direction, Some(LayoutDirection::LeftRight));
        assert_eq!(args.strategy, Some(LayoutStrategy::Layered));
        assert_eq!(args.root.as_deref(), Some("deal:1"));
        assert!(args.io.pretty);
    }

    #[test]
    fn test_cli_rejects_unknown_direction() {
        let parsed = Cli::try_parse_from(["lineage", "layout", "--input", "in.json", "-d", "XY"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_layout_writes_positioned_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_document(dir.path());
        let output = dir.path().join("out.json");

        run_layout(&layout_args(input, output.clone())).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        let nodes = json["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|node| node["position"].is_object()));
        assert_eq!(json["descendantCounts"]["deal:1"], 3);
        assert_eq!(json["hidden"]["visual_asset:1"], 1);
    }

    #[test]
    fn test_visible_respects_root_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_document(dir.path());
        let output = dir.path().join("visible.json");
        let mut args = layout_args(input, output.clone());
        args.root = Some("document:1".to_string());

        run_visible(&args).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["nodes"], serde_json::json!(["document:1", "visual_asset:1"]));
        assert_eq!(json["edges"], serde_json::json!(["e2"]));
        assert_eq!(json["collapsed"], serde_json::json!(["visual_asset:1"]));
    }

    #[test]
    fn test_missing_input_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let args = InputArgs {
            input: dir.path().join("missing.json"),
            output: None,
            pretty: false,
        };

        let err = run_count(&args).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
