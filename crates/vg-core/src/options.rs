use serde::{Deserialize, Serialize};

/// Geometric primitive used to render records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Point,
    Circle,
    Tick,
    Bar,
    Line,
    Area,
    Rect,
    Text,
}

impl MarkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkType::Point => "point",
            MarkType::Circle => "circle",
            MarkType::Tick => "tick",
            MarkType::Bar => "bar",
            MarkType::Line => "line",
            MarkType::Area => "area",
            MarkType::Rect => "rect",
            MarkType::Text => "text",
        }
    }
}

impl std::fmt::Display for MarkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller's mark choice: automatic inference or a fixed mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeomChoice {
    Auto,
    Mark(MarkType),
}

impl Default for GeomChoice {
    fn default() -> Self {
        GeomChoice::Auto
    }
}

/// Chart-level option toggles consumed by one compilation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Attach aggregation functions to measure encodings
    pub default_aggregated: bool,

    /// Leave the grammar's implicit stacking enabled; when false,
    /// quantitative positional channels get an explicit stack override
    pub default_stack: bool,

    /// Declare a pan/zoom interval parameter bound to the view scales
    pub interactive_scale: bool,

    /// Mark selection
    pub geom: GeomChoice,

    /// Show the rendering engine's action menu on each view
    pub show_actions: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            default_aggregated: true,
            default_stack: true,
            interactive_scale: false,
            geom: GeomChoice::Auto,
            show_actions: false,
        }
    }
}
