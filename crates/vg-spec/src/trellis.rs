//! Trellis layout engine
//!
//! Decides how many repeated views a field assignment expands into and
//! which field occupies each repeated position. Measures on a shelf each
//! become their own repeated view; dimensions ahead of the primary axis are
//! demoted to facet channels, and only the candidate nearest the primary
//! axis is actually used (documented only-nearest-facet-wins policy).

use vg_core::{ChannelBinding, ChartAssignment, FieldDescriptor};

/// Derived layout for one compilation pass
#[derive(Debug, Clone)]
pub struct TrellisPlan {
    /// One repeated view row per field; measures, or the trailing dimension
    pub row_repeat: Vec<FieldDescriptor>,
    /// One repeated view column per field
    pub col_repeat: Vec<FieldDescriptor>,
    /// Facet channel shared by all repeated views, null when unused
    pub row_facet: FieldDescriptor,
    pub col_facet: FieldDescriptor,
    /// Primary positional axes for the non-repeated case
    pub x_field: FieldDescriptor,
    pub y_field: FieldDescriptor,
}

impl TrellisPlan {
    /// Number of views to render; never zero
    pub fn view_count(&self) -> usize {
        (self.row_repeat.len() * self.col_repeat.len()).max(1)
    }

    /// Whether the plan collapses to a single view
    pub fn is_single(&self) -> bool {
        self.row_repeat.len() <= 1 && self.col_repeat.len() <= 1
    }

    /// Channel binding for the single-view case: primary axes plus the
    /// shared facet and visual channels
    pub fn single_binding(&self, assignment: &ChartAssignment) -> ChannelBinding {
        ChannelBinding {
            x: self.x_field.clone(),
            y: self.y_field.clone(),
            color: optional_field(&assignment.color),
            opacity: optional_field(&assignment.opacity),
            size: optional_field(&assignment.size),
            row: self.row_facet.clone(),
            column: self.col_facet.clone(),
            ..ChannelBinding::default()
        }
    }

    /// Channel binding for repeated view `(i, j)`: x/y come from the repeat
    /// fields while facet and visual channels are shared across the grid
    pub fn repeat_binding(&self, assignment: &ChartAssignment, i: usize, j: usize) -> ChannelBinding {
        ChannelBinding {
            x: self.col_repeat.get(j).cloned().unwrap_or_else(FieldDescriptor::null),
            y: self.row_repeat.get(i).cloned().unwrap_or_else(FieldDescriptor::null),
            color: optional_field(&assignment.color),
            opacity: optional_field(&assignment.opacity),
            size: optional_field(&assignment.size),
            row: self.row_facet.clone(),
            column: self.col_facet.clone(),
            ..ChannelBinding::default()
        }
    }
}

fn optional_field(field: &Option<FieldDescriptor>) -> FieldDescriptor {
    field.clone().unwrap_or_else(FieldDescriptor::null)
}

/// Compute the trellis plan from the ordered row and column field lists
pub fn plan_trellis(rows: &[FieldDescriptor], columns: &[FieldDescriptor]) -> TrellisPlan {
    TrellisPlan {
        row_repeat: repeat_fields(rows),
        col_repeat: repeat_fields(columns),
        row_facet: facet_field(rows),
        col_facet: facet_field(columns),
        x_field: trailing_field(columns),
        y_field: trailing_field(rows),
    }
}

/// Measures drive repetition; a measure-free shelf yields its trailing
/// dimension as a singleton (one view, not one view per category)
fn repeat_fields(shelf: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    let measures: Vec<FieldDescriptor> = shelf.iter().filter(|f| f.is_measure()).cloned().collect();
    if !measures.is_empty() {
        return measures;
    }
    shelf.iter().filter(|f| f.is_dimension()).next_back().cloned().into_iter().collect()
}

/// Nearest facet candidate: the last dimension ahead of the shelf's
/// trailing element. Earlier candidates are intentionally unused.
fn facet_field(shelf: &[FieldDescriptor]) -> FieldDescriptor {
    let ahead = &shelf[..shelf.len().saturating_sub(1)];
    ahead
        .iter()
        .filter(|f| f.is_dimension())
        .next_back()
        .cloned()
        .unwrap_or_else(FieldDescriptor::null)
}

fn trailing_field(shelf: &[FieldDescriptor]) -> FieldDescriptor {
    shelf.last().cloned().unwrap_or_else(FieldDescriptor::null)
}
