//! Single-view specification builder

use serde::Serialize;
use vg_core::{ChannelBinding, ChartOptions, FieldCatalog, GeomChoice, MarkType, SemanticType};

use crate::encoding::{disable_stacking, encode_channels, inject_aggregates, EncodingMap};
use crate::mark::auto_mark;

/// Fixed mark opacity applied to every view
pub const MARK_OPACITY: f64 = 0.96;

/// Mark definition shared by all records of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkDef {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    pub opacity: f64,
    pub tooltip: bool,
}

impl MarkDef {
    pub fn new(mark_type: MarkType) -> Self {
        Self {
            mark_type,
            opacity: MARK_OPACITY,
            tooltip: true,
        }
    }
}

/// One complete mark-plus-encoding specification for a single view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSpec {
    pub mark: MarkDef,
    pub encoding: EncodingMap,
}

/// Compile one channel binding into a view specification
///
/// Pure and idempotent: the same binding and options always produce a
/// structurally identical spec.
pub fn build_single_view(binding: &ChannelBinding, options: &ChartOptions) -> ViewSpec {
    let mark_type = match options.geom {
        GeomChoice::Mark(mark) => mark,
        GeomChoice::Auto => {
            let mut types: Vec<SemanticType> = Vec::with_capacity(2);
            if !binding.x.is_null() {
                types.push(binding.x.semantic_type);
            }
            if !binding.y.is_null() {
                types.push(binding.y.semantic_type);
            }
            auto_mark(&types)
        }
    };

    let mut encoding = encode_channels(binding);
    if options.default_aggregated {
        let catalog = FieldCatalog::from_fields(&binding.fields());
        inject_aggregates(&mut encoding, &catalog);
    }
    if !options.default_stack {
        disable_stacking(&mut encoding);
    }

    ViewSpec {
        mark: MarkDef::new(mark_type),
        encoding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_core::{Aggregation, ChannelRole, FieldDescriptor};

    fn region_sales_binding() -> ChannelBinding {
        ChannelBinding {
            x: FieldDescriptor::dimension("Region", "Region", SemanticType::Nominal),
            y: FieldDescriptor::measure("Sales", "Sales", SemanticType::Quantitative, Aggregation::Sum),
            ..ChannelBinding::default()
        }
    }

    #[test]
    fn test_nominal_by_aggregated_measure() {
        let options = ChartOptions::default();
        let spec = build_single_view(&region_sales_binding(), &options);

        assert_eq!(spec.mark.mark_type, MarkType::Bar);
        let y = &spec.encoding[&ChannelRole::Y];
        assert_eq!(y.field, "Sales");
        assert_eq!(y.title, "sum(Sales)");
        assert_eq!(y.aggregate, Some(Aggregation::Sum));
        assert_eq!(y.field_type, SemanticType::Quantitative);
        let x = &spec.encoding[&ChannelRole::X];
        assert_eq!(x.field, "Region");
        assert_eq!(x.field_type, SemanticType::Nominal);
        assert_eq!(x.aggregate, None);
    }

    #[test]
    fn test_empty_binding_compiles_to_minimal_spec() {
        let spec = build_single_view(&ChannelBinding::default(), &ChartOptions::default());
        assert_eq!(spec.mark.mark_type, MarkType::Point);
        assert!(spec.encoding.is_empty());
    }

    #[test]
    fn test_aggregation_off_is_a_no_op() {
        let options = ChartOptions {
            default_aggregated: false,
            ..ChartOptions::default()
        };
        let spec = build_single_view(&region_sales_binding(), &options);
        assert_eq!(spec.encoding[&ChannelRole::Y].aggregate, None);
        assert_eq!(spec.encoding[&ChannelRole::Y].title, "Sales");
    }

    #[test]
    fn test_stack_override_only_touches_quantitative_axes() {
        use crate::encoding::Stacking;
        let binding = ChannelBinding {
            x: FieldDescriptor::dimension("date", "Date", SemanticType::Temporal),
            y: FieldDescriptor::measure("profit", "Profit", SemanticType::Quantitative, Aggregation::Mean),
            ..ChannelBinding::default()
        };
        let options = ChartOptions {
            default_stack: false,
            ..ChartOptions::default()
        };
        let spec = build_single_view(&binding, &options);
        assert_eq!(spec.encoding[&ChannelRole::X].stack, Stacking::Default);
        assert_eq!(spec.encoding[&ChannelRole::Y].stack, Stacking::Disabled);
    }

    #[test]
    fn test_explicit_geom_bypasses_inference() {
        let options = ChartOptions {
            geom: GeomChoice::Mark(MarkType::Area),
            ..ChartOptions::default()
        };
        let spec = build_single_view(&region_sales_binding(), &options);
        assert_eq!(spec.mark.mark_type, MarkType::Area);
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let binding = region_sales_binding();
        let options = ChartOptions {
            default_stack: false,
            ..ChartOptions::default()
        };
        assert_eq!(
            build_single_view(&binding, &options),
            build_single_view(&binding, &options)
        );
    }

    #[test]
    fn test_mark_opacity_and_tooltip_are_fixed() {
        let spec = build_single_view(&region_sales_binding(), &ChartOptions::default());
        assert_eq!(spec.mark.opacity, MARK_OPACITY);
        assert!(spec.mark.tooltip);
    }
}
