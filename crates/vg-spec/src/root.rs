//! Root specification shared by every view of one chart

use serde::Serialize;
use vg_core::Row;

use crate::view::ViewSpec;

/// Name of the point-selection parameter attached to every view
pub const SELECTION_PARAM: &str = "geom";

/// Name of the pan/zoom interval parameter
pub const SCALE_PARAM: &str = "grid";

/// Inline dataset block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBlock {
    pub values: Vec<Row>,
}

/// Point selection body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSelect {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub fields: Vec<String>,
}

/// A declarative interactive parameter on the root spec
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectionParam {
    /// Named point selection scoped to the given field ids
    Point { name: String, select: PointSelect },
    /// Interval selection bound to the view scales, enabling pan/zoom
    IntervalScales {
        name: String,
        select: &'static str,
        bind: &'static str,
    },
}

impl SelectionParam {
    pub fn point(name: &str, fields: Vec<String>) -> Self {
        SelectionParam::Point {
            name: name.to_string(),
            select: PointSelect {
                kind: "point",
                fields,
            },
        }
    }

    pub fn interval_scales(name: &str) -> Self {
        SelectionParam::IntervalScales {
            name: name.to_string(),
            select: "interval",
            bind: "scales",
        }
    }
}

/// Dataset and interaction parameters shared by all views of one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootSpec {
    pub data: DataBlock,
    pub params: Vec<SelectionParam>,
}

impl RootSpec {
    /// Build the root spec for one compilation pass
    ///
    /// `field_ids` scopes the point selection to every fid bound anywhere
    /// in the assignment; `interactive_scale` adds the pan/zoom interval.
    pub fn new(dataset: Vec<Row>, field_ids: Vec<String>, interactive_scale: bool) -> Self {
        let mut params = vec![SelectionParam::point(SELECTION_PARAM, field_ids)];
        if interactive_scale {
            params.push(SelectionParam::interval_scales(SCALE_PARAM));
        }
        Self {
            data: DataBlock { values: dataset },
            params,
        }
    }
}

/// One renderable chart: the shared root merged with one view's mark and
/// encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: DataBlock,
    pub params: Vec<SelectionParam>,
    #[serde(flatten)]
    pub view: ViewSpec,
}

/// Merge the shared root with a single view's spec
pub fn compose(root: &RootSpec, view: ViewSpec) -> ChartSpec {
    ChartSpec {
        data: root.data.clone(),
        params: root.params.clone(),
        view,
    }
}
