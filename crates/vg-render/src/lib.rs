//! Multi-view rendering orchestration
//!
//! This crate owns the boundary to the external rendering engine and the
//! orchestrator that keeps one rendering target per planned view, compiles
//! a spec for each, and wires every rendered view's events into the shared
//! interaction bus.

pub mod engine;
pub mod headless;
pub mod orchestrator;
pub mod target;

pub use engine::{ClickHandler, RenderEngine, RenderError, RenderOptions, RenderedView, SelectionHandler};
pub use headless::{HeadlessEngine, HeadlessView, RenderRecord};
pub use orchestrator::{spawn_driver, ChartInput, OrchestratorHandle, ViewOrchestrator};
pub use target::{sync_targets, RenderTarget};
