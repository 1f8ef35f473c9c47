//! Headless rendering engine for tests and demos
//!
//! Records every spec it is asked to render and exposes the created views
//! so synthetic interaction events can be fired at them.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use vg_core::{ClickEvent, SelectionEvent};
use vg_spec::ChartSpec;

use crate::engine::{ClickHandler, RenderEngine, RenderError, RenderOptions, RenderedView, SelectionHandler};
use crate::target::RenderTarget;

/// One recorded render call
#[derive(Debug, Clone)]
pub struct RenderRecord {
    pub target: RenderTarget,
    pub spec: ChartSpec,
    pub actions: bool,
}

/// A rendered view that stores its listeners and replays injected events
#[derive(Default)]
pub struct HeadlessView {
    fail_listeners: bool,
    click_handlers: Mutex<Vec<ClickHandler>>,
    selection_handlers: Mutex<Vec<(String, SelectionHandler)>>,
}

impl HeadlessView {
    fn new(fail_listeners: bool) -> Self {
        Self {
            fail_listeners,
            ..Self::default()
        }
    }

    /// Whether any listener was attached to this view
    pub fn has_listeners(&self) -> bool {
        !self.click_handlers.lock().is_empty() || !self.selection_handlers.lock().is_empty()
    }

    /// Fire a synthetic click at every registered click listener
    pub fn emit_click(&self, event: ClickEvent) {
        for handler in self.click_handlers.lock().iter() {
            handler(event.clone());
        }
    }

    /// Fire a synthetic selection change for the given parameter
    pub fn emit_selection(&self, param: &str, event: SelectionEvent) {
        for (name, handler) in self.selection_handlers.lock().iter() {
            if name == param {
                handler(event.clone());
            }
        }
    }
}

impl RenderedView for HeadlessView {
    fn on_click(&self, handler: ClickHandler) -> Result<(), RenderError> {
        if self.fail_listeners {
            return Err(RenderError::Listener("click events unsupported".into()));
        }
        self.click_handlers.lock().push(handler);
        Ok(())
    }

    fn on_selection(&self, param: &str, handler: SelectionHandler) -> Result<(), RenderError> {
        if self.fail_listeners {
            return Err(RenderError::Listener("signal listeners unsupported".into()));
        }
        self.selection_handlers.lock().push((param.to_string(), handler));
        Ok(())
    }
}

/// Recording engine; renders complete immediately
#[derive(Default)]
pub struct HeadlessEngine {
    fail_listeners: bool,
    records: Mutex<Vec<RenderRecord>>,
    views: Mutex<Vec<Arc<HeadlessView>>>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every created view reject listener attachment
    pub fn with_failing_listeners(mut self) -> Self {
        self.fail_listeners = true;
        self
    }

    /// Specs rendered so far, in call order
    pub fn specs(&self) -> Vec<ChartSpec> {
        self.records.lock().iter().map(|r| r.spec.clone()).collect()
    }

    /// Full render records, in call order
    pub fn records(&self) -> Vec<RenderRecord> {
        self.records.lock().clone()
    }

    /// Views created so far, in call order
    pub fn views(&self) -> Vec<Arc<HeadlessView>> {
        self.views.lock().clone()
    }
}

#[async_trait]
impl RenderEngine for HeadlessEngine {
    async fn render(
        &self,
        target: &RenderTarget,
        spec: ChartSpec,
        options: &RenderOptions,
    ) -> Result<Arc<dyn RenderedView>, RenderError> {
        self.records.lock().push(RenderRecord {
            target: target.clone(),
            spec,
            actions: options.actions,
        });
        let view = Arc::new(HeadlessView::new(self.fail_listeners));
        self.views.lock().push(view.clone());
        Ok(view)
    }
}
