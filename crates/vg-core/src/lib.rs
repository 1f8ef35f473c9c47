//! Core vocabulary for the chart compilation pipeline
//!
//! This crate provides the field descriptor model, channel assignments,
//! chart options and the shared interaction event bus that every other
//! crate in the workspace consumes.

pub mod assignment;
pub mod events;
pub mod field;
pub mod options;

// Re-export commonly used types
pub use assignment::{AxisChannel, ChannelBinding, ChannelRole, ChartAssignment};
pub use events::{ClickEvent, GeomClickStream, InteractionBus, SelectionEvent};
pub use field::{Aggregation, AnalyticType, FieldCatalog, FieldDescriptor, SemanticType};
pub use options::{ChartOptions, GeomChoice, MarkType};

/// A single dataset record, keyed by field id
pub type Row = serde_json::Map<String, serde_json::Value>;
