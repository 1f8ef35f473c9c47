//! Demo entry point
//!
//! Compiles a small sample assignment against the headless engine and
//! prints the resulting specifications, then replays a synthetic click and
//! selection through the interaction pipeline.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;
use vg_core::{
    Aggregation, AxisChannel, ChartAssignment, ChartOptions, ClickEvent, FieldDescriptor, InteractionBus,
    Row, SelectionEvent, SemanticType,
};
use vg_render::{ChartInput, HeadlessEngine, ViewOrchestrator};
use vg_spec::SELECTION_PARAM;

fn sample_dataset() -> Vec<Row> {
    [
        json!({"date": "2024-01-01", "region": "East", "sales": 120, "profit": 30}),
        json!({"date": "2024-01-02", "region": "East", "sales": 150, "profit": 42}),
        json!({"date": "2024-01-01", "region": "West", "sales": 90, "profit": 12}),
        json!({"date": "2024-01-02", "region": "West", "sales": 110, "profit": 25}),
    ]
    .into_iter()
    .map(|value| value.as_object().cloned().unwrap_or_default())
    .collect()
}

fn sample_assignment() -> ChartAssignment {
    let mut assignment = ChartAssignment::new();
    assignment.add_field(
        AxisChannel::Columns,
        FieldDescriptor::dimension("date", "Date", SemanticType::Temporal),
    );
    assignment.add_field(
        AxisChannel::Rows,
        FieldDescriptor::measure("profit", "Profit", SemanticType::Quantitative, Aggregation::Mean),
    );
    assignment.add_field(
        AxisChannel::Rows,
        FieldDescriptor::measure("sales", "Sales", SemanticType::Quantitative, Aggregation::Sum),
    );
    assignment.color = Some(FieldDescriptor::dimension("region", "Region", SemanticType::Nominal));
    assignment
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let engine = Arc::new(HeadlessEngine::new());
    let bus = Arc::new(InteractionBus::new());
    let mut orchestrator = ViewOrchestrator::new(engine.clone(), bus.clone());

    // report every non-empty selection paired with its click
    let mut geom_clicks = bus.geom_clicks();
    let subscriber = tokio::spawn(async move {
        while let Some((selection, click)) = geom_clicks.recv().await {
            info!(view = click.view, fields = selection.values.len(), "geom click");
        }
    });

    let input = ChartInput {
        dataset: sample_dataset(),
        assignment: sample_assignment(),
        options: ChartOptions::default(),
    };

    for handle in orchestrator.render_pass(&input) {
        handle.await?;
    }
    info!(views = orchestrator.targets().len(), "render pass complete");

    for (index, spec) in engine.specs().iter().enumerate() {
        println!("--- view {index} ---");
        println!("{}", serde_json::to_string_pretty(spec)?);
    }

    // replay one interaction through the pipeline
    if let Some(view) = engine.views().first() {
        view.emit_click(ClickEvent::new(0));
        view.emit_selection(SELECTION_PARAM, SelectionEvent::single("sales", json!(150)));
    }

    // release every bus handle so the subscriber loop ends
    drop(bus);
    drop(orchestrator);
    drop(engine);
    subscriber.await?;
    Ok(())
}
