//! Automatic mark-type inference

use vg_core::{MarkType, SemanticType};

/// Mark used when fewer than two axes are bound or no table entry matches
const DEFAULT_MARK: MarkType = MarkType::Point;

/// Infer a mark type from the semantic types of the bound positional axes
///
/// `types` holds the x then y semantic types, with unused axes skipped. The
/// pair lookup is order-insensitive; every input has a defined output.
pub fn auto_mark(types: &[SemanticType]) -> MarkType {
    let (first, second) = match types {
        [a, b, ..] => (*a, *b),
        _ => return DEFAULT_MARK,
    };
    pair_mark(first, second)
        .or_else(|| pair_mark(second, first))
        .unwrap_or(DEFAULT_MARK)
}

fn pair_mark(a: SemanticType, b: SemanticType) -> Option<MarkType> {
    use SemanticType::*;
    match (a, b) {
        (Quantitative, Quantitative) => Some(MarkType::Point),
        (Temporal, Quantitative) => Some(MarkType::Line),
        (Ordinal, Quantitative) => Some(MarkType::Line),
        (Nominal, Quantitative) => Some(MarkType::Bar),
        (Nominal, Nominal) => Some(MarkType::Tick),
        (Nominal, Ordinal) => Some(MarkType::Tick),
        (Ordinal, Ordinal) => Some(MarkType::Tick),
        _ => None,
    }
}
