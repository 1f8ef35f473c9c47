//! Multi-view rendering orchestrator
//!
//! Expands one chart input into the planned grid of views, keeps exactly
//! one rendering target per view, drives the engine once per target and
//! forwards every rendered view's events into the owned interaction bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vg_core::{ChartAssignment, ChartOptions, InteractionBus, Row};
use vg_spec::{build_single_view, compose, plan_trellis, RootSpec, SELECTION_PARAM};

use crate::engine::{RenderEngine, RenderOptions, RenderedView};
use crate::target::{sync_targets, RenderTarget};

/// The full input tuple of one compilation-and-render pass
#[derive(Debug, Clone, Default)]
pub struct ChartInput {
    pub dataset: Vec<Row>,
    pub assignment: ChartAssignment,
    pub options: ChartOptions,
}

/// Owns the rendering targets and the interaction bus for one chart
///
/// A pass is re-entrant: a new pass may start while earlier renders are
/// still in flight. Each pass bumps a generation counter and a completion
/// from a superseded pass skips listener attachment instead of wiring a
/// stale view into the bus.
pub struct ViewOrchestrator {
    engine: Arc<dyn RenderEngine>,
    bus: Arc<InteractionBus>,
    targets: Vec<RenderTarget>,
    generation: Arc<AtomicU64>,
}

impl ViewOrchestrator {
    pub fn new(engine: Arc<dyn RenderEngine>, bus: Arc<InteractionBus>) -> Self {
        Self {
            engine,
            bus,
            targets: Vec::new(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn bus(&self) -> &Arc<InteractionBus> {
        &self.bus
    }

    pub fn targets(&self) -> &[RenderTarget] {
        &self.targets
    }

    /// Compile and render every view of the given input
    ///
    /// Rendering is initiated, not awaited: the returned handles resolve as
    /// the engine finishes each view and may be ignored by callers that do
    /// not need completion.
    pub fn render_pass(&mut self, input: &ChartInput) -> Vec<JoinHandle<()>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let plan = plan_trellis(&input.assignment.rows, &input.assignment.columns);
        sync_targets(&mut self.targets, plan.view_count());

        let root = RootSpec::new(
            input.dataset.clone(),
            input.assignment.bound_field_ids(),
            input.options.interactive_scale,
        );
        let render_options = RenderOptions {
            actions: input.options.show_actions,
            ..RenderOptions::default()
        };

        let mut handles = Vec::new();
        if plan.is_single() {
            let view = build_single_view(&plan.single_binding(&input.assignment), &input.options);
            handles.push(self.spawn_render(
                0,
                self.targets[0].clone(),
                compose(&root, view),
                render_options,
                generation,
            ));
        } else {
            for i in 0..plan.row_repeat.len() {
                for j in 0..plan.col_repeat.len() {
                    let index = i * plan.col_repeat.len() + j;
                    let Some(target) = self.targets.get(index) else {
                        continue;
                    };
                    let view =
                        build_single_view(&plan.repeat_binding(&input.assignment, i, j), &input.options);
                    handles.push(self.spawn_render(
                        index,
                        target.clone(),
                        compose(&root, view),
                        render_options.clone(),
                        generation,
                    ));
                }
            }
        }
        handles
    }

    fn spawn_render(
        &self,
        index: usize,
        target: RenderTarget,
        spec: vg_spec::ChartSpec,
        options: RenderOptions,
        generation: u64,
    ) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let bus = self.bus.clone();
        let current = self.generation.clone();

        tokio::spawn(async move {
            match engine.render(&target, spec, &options).await {
                Ok(view) => {
                    if current.load(Ordering::SeqCst) != generation {
                        debug!(view = index, "superseded render completed, skipping listeners");
                        return;
                    }
                    attach_listeners(index, view.as_ref(), &bus);
                }
                Err(err) => {
                    // a failed view never aborts the other views
                    warn!(view = index, error = %err, "render failed");
                }
            }
        })
    }
}

/// Wire one rendered view into the bus
///
/// Attachment failures are logged and swallowed; the view still displays
/// but does not participate in the interaction pipeline.
fn attach_listeners(index: usize, view: &dyn RenderedView, bus: &Arc<InteractionBus>) {
    let click_bus = bus.clone();
    if let Err(err) = view.on_click(Box::new(move |mut event| {
        event.view = index;
        click_bus.push_click(event);
    })) {
        warn!(view = index, error = %err, "could not attach click listener");
    }

    let selection_bus = bus.clone();
    if let Err(err) = view.on_selection(
        SELECTION_PARAM,
        Box::new(move |event| selection_bus.push_selection(event)),
    ) {
        warn!(view = index, error = %err, "could not attach selection listener");
    }
}

/// Handle to a background orchestrator driver
///
/// Dropping the handle closes the input channel and ends the driver.
pub struct OrchestratorHandle {
    input_tx: watch::Sender<Option<ChartInput>>,
    _task: JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Replace the pending input; rapid successive updates coalesce so the
    /// driver only renders the newest one
    pub fn update(&self, input: ChartInput) {
        self.input_tx.send_replace(Some(input));
    }
}

/// Run an orchestrator on a background task fed through a change-detection
/// boundary around the full input tuple
pub fn spawn_driver(mut orchestrator: ViewOrchestrator) -> OrchestratorHandle {
    let (input_tx, mut input_rx) = watch::channel(None::<ChartInput>);
    let task = tokio::spawn(async move {
        while input_rx.changed().await.is_ok() {
            let input = input_rx.borrow_and_update().clone();
            if let Some(input) = input {
                // fire and forget; stale completions are generation-guarded
                let _ = orchestrator.render_pass(&input);
            }
        }
    });
    OrchestratorHandle {
        input_tx,
        _task: task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessEngine;
    use serde_json::json;
    use vg_core::{
        Aggregation, AxisChannel, ChannelRole, ClickEvent, FieldDescriptor, SelectionEvent, SemanticType,
    };

    fn date() -> FieldDescriptor {
        FieldDescriptor::dimension("date", "Date", SemanticType::Temporal)
    }

    fn measure(fid: &str) -> FieldDescriptor {
        FieldDescriptor::measure(fid, fid, SemanticType::Quantitative, Aggregation::Sum)
    }

    fn input(rows: Vec<FieldDescriptor>, columns: Vec<FieldDescriptor>) -> ChartInput {
        let mut assignment = ChartAssignment::new();
        for field in rows {
            assignment.add_field(AxisChannel::Rows, field);
        }
        for field in columns {
            assignment.add_field(AxisChannel::Columns, field);
        }
        ChartInput {
            dataset: Vec::new(),
            assignment,
            options: ChartOptions::default(),
        }
    }

    async fn drain(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            handle.await.expect("render task completes");
        }
    }

    #[tokio::test]
    async fn test_single_view_pass() {
        let engine = Arc::new(HeadlessEngine::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));

        drain(orchestrator.render_pass(&input(vec![measure("sales")], vec![date()]))).await;

        assert_eq!(orchestrator.targets().len(), 1);
        let specs = engine.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].view.encoding[&ChannelRole::X].field, "date");
        assert_eq!(specs[0].view.encoding[&ChannelRole::Y].field, "sales");
    }

    #[tokio::test]
    async fn test_repeated_measures_render_row_major() {
        let engine = Arc::new(HeadlessEngine::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));

        let input = input(vec![measure("profit"), measure("sales")], vec![date()]);
        drain(orchestrator.render_pass(&input)).await;

        assert_eq!(orchestrator.targets().len(), 2);
        let specs = engine.specs();
        assert_eq!(specs.len(), 2);
        // both views share x, differing in y
        assert!(specs.iter().all(|s| s.view.encoding[&ChannelRole::X].field == "date"));
        let ys: Vec<_> = specs.iter().map(|s| s.view.encoding[&ChannelRole::Y].field.clone()).collect();
        assert_eq!(ys, vec!["profit", "sales"]);
    }

    #[tokio::test]
    async fn test_targets_reused_by_position_across_passes() {
        let engine = Arc::new(HeadlessEngine::new());
        let mut orchestrator = ViewOrchestrator::new(engine, Arc::new(InteractionBus::new()));

        drain(orchestrator.render_pass(&input(
            vec![measure("profit"), measure("sales")],
            vec![date()],
        )))
        .await;
        let first = orchestrator.targets()[0].id;

        drain(orchestrator.render_pass(&input(vec![measure("profit")], vec![date()]))).await;
        assert_eq!(orchestrator.targets().len(), 1);
        assert_eq!(orchestrator.targets()[0].id, first);
    }

    #[tokio::test]
    async fn test_selection_param_scopes_bound_fields() {
        let engine = Arc::new(HeadlessEngine::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));

        let mut pass = input(vec![measure("sales")], vec![date()]);
        pass.assignment.color = Some(FieldDescriptor::dimension("region", "Region", SemanticType::Nominal));
        drain(orchestrator.render_pass(&pass)).await;

        let spec = serde_json::to_value(&engine.specs()[0]).expect("spec serializes");
        assert_eq!(
            spec["params"][0],
            json!({"name": "geom", "select": {"type": "point", "fields": ["sales", "date", "region"]}})
        );
    }

    #[tokio::test]
    async fn test_interactive_scale_adds_interval_param() {
        let engine = Arc::new(HeadlessEngine::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));

        let mut pass = input(vec![measure("sales")], vec![date()]);
        pass.options.interactive_scale = true;
        drain(orchestrator.render_pass(&pass)).await;

        assert_eq!(engine.specs()[0].params.len(), 2);
    }

    #[tokio::test]
    async fn test_events_flow_from_views_into_bus() {
        let engine = Arc::new(HeadlessEngine::new());
        let bus = Arc::new(InteractionBus::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), bus.clone());
        let mut geom_clicks = bus.geom_clicks();

        drain(orchestrator.render_pass(&input(vec![measure("sales")], vec![date()]))).await;

        let views = engine.views();
        assert_eq!(views.len(), 1);
        views[0].emit_click(ClickEvent::new(0));
        views[0].emit_selection(SELECTION_PARAM, SelectionEvent::single("sales", json!(10)));

        let (selection, click) = geom_clicks.recv().await.expect("bus is open");
        assert_eq!(click.view, 0);
        assert!(selection.values.contains_key("sales"));
    }

    #[tokio::test]
    async fn test_failed_listener_attachment_does_not_abort_pass() {
        let engine = Arc::new(HeadlessEngine::new().with_failing_listeners());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));

        drain(orchestrator.render_pass(&input(
            vec![measure("profit"), measure("sales")],
            vec![date()],
        )))
        .await;

        // every view still rendered even though no listener attached
        assert_eq!(engine.specs().len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_pass_skips_listener_attachment() {
        let engine = Arc::new(HeadlessEngine::new());
        let bus = Arc::new(InteractionBus::new());
        let mut orchestrator = ViewOrchestrator::new(engine.clone(), bus.clone());

        let pass = input(vec![measure("sales")], vec![date()]);
        // the first pass's tasks have not run yet when the second starts
        let stale = orchestrator.render_pass(&pass);
        let fresh = orchestrator.render_pass(&pass);
        drain(stale).await;
        drain(fresh).await;

        assert_eq!(engine.specs().len(), 2);
        let attached: usize = engine.views().iter().filter(|v| v.has_listeners()).count();
        assert_eq!(attached, 1);
    }

    #[tokio::test]
    async fn test_driver_coalesces_rapid_updates() {
        let engine = Arc::new(HeadlessEngine::new());
        let orchestrator = ViewOrchestrator::new(engine.clone(), Arc::new(InteractionBus::new()));
        let handle = spawn_driver(orchestrator);

        handle.update(input(vec![measure("profit")], vec![date()]));
        handle.update(input(vec![measure("sales")], vec![date()]));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let specs = engine.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].view.encoding[&ChannelRole::Y].field, "sales");
    }
}
