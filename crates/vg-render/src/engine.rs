//! External rendering-engine boundary
//!
//! The rendering engine is consumed as a pure collaborator: specification
//! in, rendered view and its event surface out. Everything behind these
//! traits is outside this workspace.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use vg_core::{ClickEvent, SelectionEvent};
use vg_spec::ChartSpec;

use crate::target::RenderTarget;

/// Errors surfaced by the rendering engine
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering failed: {0}")]
    Engine(String),

    #[error("listener attachment failed: {0}")]
    Listener(String),
}

/// Per-render options passed through to the engine
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Grammar mode the spec is written in
    pub mode: &'static str,

    /// Show the engine's action menu on the view
    pub actions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: "vega-lite",
            actions: false,
        }
    }
}

pub type ClickHandler = Box<dyn Fn(ClickEvent) + Send + Sync>;
pub type SelectionHandler = Box<dyn Fn(SelectionEvent) + Send + Sync>;

/// The event surface of one rendered view
///
/// Attachment may fail (a mark type without the needed event support);
/// callers log and continue rather than propagate.
pub trait RenderedView: Send + Sync {
    /// Register a raw pointer-click listener
    fn on_click(&self, handler: ClickHandler) -> Result<(), RenderError>;

    /// Register a listener for changes of a named selection parameter
    fn on_selection(&self, param: &str, handler: SelectionHandler) -> Result<(), RenderError>;
}

/// The rendering engine itself
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Render one spec into one target; completion is observed
    /// asynchronously
    async fn render(
        &self,
        target: &RenderTarget,
        spec: ChartSpec,
        options: &RenderOptions,
    ) -> Result<Arc<dyn RenderedView>, RenderError>;
}
