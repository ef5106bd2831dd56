//! Lays out a trace payload and writes the graph as SVG.
//!
//! Run with: cargo run --example render_trace > trace.svg

use langeval::prelude::*;

const TRACE: &str = r#"{
    "data": {
        "id": "trc_001",
        "name": "chat-rag-pipeline",
        "latency": 3.45,
        "totalCost": 0.0042,
        "observations": [
            { "id": "obs_root", "name": "chat-rag-pipeline", "type": "SPAN",
              "startTime": "2024-02-03T10:30:00.000Z", "endTime": "2024-02-03T10:30:03.450Z" },
            { "id": "obs_retrieval", "name": "Retrieval", "type": "TOOL",
              "parentObservationId": "obs_root",
              "startTime": "2024-02-03T10:30:00.100Z", "endTime": "2024-02-03T10:30:01.300Z" },
            { "id": "obs_embed", "name": "Embed query", "type": "MODEL",
              "parentObservationId": "obs_retrieval",
              "startTime": "2024-02-03T10:30:00.150Z", "endTime": "2024-02-03T10:30:00.400Z" },
            { "id": "obs_search", "name": "Vector search", "type": "TOOL",
              "parentObservationId": "obs_retrieval",
              "startTime": "2024-02-03T10:30:00.450Z", "endTime": "2024-02-03T10:30:01.250Z" },
            { "id": "obs_generation", "name": "Generation: GPT-4o", "type": "GENERATION",
              "parentObservationId": "obs_root", "model": "gpt-4o",
              "startTime": "2024-02-03T10:30:01.400Z", "endTime": "2024-02-03T10:30:03.400Z",
              "calculatedTotalCost": 0.0041,
              "usage": { "promptTokens": 500, "completionTokens": 700, "totalTokens": 1200 } }
        ]
    },
    "source": "langfuse"
}"#;

fn main() {
    let envelope = TraceEnvelope::from_json(TRACE).expect("invalid trace payload");
    let summary = TraceSummary::from_envelope(&envelope);
    eprintln!(
        "{} ({} spans): {}",
        envelope.data.name.as_deref().unwrap_or("trace"),
        summary.observation_count,
        summary.headline()
    );

    let graph = build_graph(&envelope.data.observations, &LayoutConfig::default());
    for node in &graph.nodes {
        eprintln!(
            "  {:<24} x={:>6} y={:>6}  {:.2}s",
            node.data.label, node.position.x, node.position.y, node.data.duration
        );
    }

    let selected = "obs_generation";
    if let Some(obs) = envelope.data.observation(selected) {
        let panel = DetailPanel::from_observation(obs);
        for row in &panel.metadata {
            eprintln!("  {}: {}", row.label, row.value);
        }
    }

    let canvas = TraceFlowGraph::new(&envelope.data.observations, |obs: &Observation| {
        eprintln!("selected {}", obs.id);
    });
    println!("{}", canvas.render(Some(selected)));
}
