use lineage_core::{LineageEdge, LineageNode};
use lineage_graph::LineageDocument;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Deal → documents → segments → visuals → evidence, `fanout` children per
/// level below each document.
pub fn generate_synthetic_lineage(
    deals: usize,
    documents_per_deal: usize,
    fanout: usize,
) -> (Vec<LineageNode>, Vec<LineageEdge>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for d in 0..deals {
        let deal = format!("deal:{d}");
        nodes.push(LineageNode::new(deal.as_str(), "deal").with_data("label", format!("Deal {d}")));

        for doc in 0..documents_per_deal {
            let document = format!("document:{d}.{doc}");
            nodes.push(
                LineageNode::new(document.as_str(), "document")
                    .with_data("label", format!("Document {doc:04}")),
            );
            link(&mut edges, &deal, &document);

            for s in 0..fanout {
                let segment = format!("segment:{d}.{doc}.{s}");
                nodes.push(LineageNode::new(segment.as_str(), "segment"));
                link(&mut edges, &document, &segment);

                for v in 0..fanout {
                    let visual = format!("visual_asset:{d}.{doc}.{s}.{v}");
                    nodes.push(LineageNode::new(visual.as_str(), "visual_asset"));
                    link(&mut edges, &segment, &visual);

                    let evidence = format!("evidence:{d}.{doc}.{s}.{v}");
                    nodes.push(LineageNode::new(evidence.as_str(), "evidence"));
                    link(&mut edges, &visual, &evidence);
                }
            }
        }
    }

    (nodes, edges)
}

fn link(edges: &mut Vec<LineageEdge>, source: &str, target: &str) {
    let id = format!("e{}", edges.len());
    edges.push(LineageEdge::new(id, source, target));
}

/// Writes a synthetic lineage document to a temp dir for CLI-style runs.
pub fn write_synthetic_document(
    deals: usize,
    documents_per_deal: usize,
    fanout: usize,
) -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let (nodes, edges) = generate_synthetic_lineage(deals, documents_per_deal, fanout);
    let document = LineageDocument {
        nodes,
        edges,
        ..Default::default()
    };

    let path = temp_dir.path().join("lineage.json");
    fs::write(&path, serde_json::to_string(&document)?)?;
    Ok((temp_dir, path))
}
