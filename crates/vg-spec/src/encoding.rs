//! Channel encoding assembly and option post-passes

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use vg_core::{Aggregation, ChannelBinding, ChannelRole, FieldCatalog, SemanticType};

/// Stacking behavior for a positional channel
///
/// The rendering grammar stacks quantitative positional channels by
/// default; disabling requires serializing an explicit `null` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// Grammar default, omitted from the serialized spec
    Default,
    /// Explicit `stack: null` override
    Disabled,
}

impl Stacking {
    pub fn is_default(&self) -> bool {
        *self == Stacking::Default
    }
}

fn serialize_stacking<S: Serializer>(_: &Stacking, serializer: S) -> Result<S::Ok, S::Error> {
    // only reached for Disabled, which is `null` on the wire
    serializer.serialize_none()
}

/// One channel's encoding descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelEncoding {
    pub field: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: SemanticType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregation>,
    #[serde(skip_serializing_if = "Stacking::is_default", serialize_with = "serialize_stacking")]
    pub stack: Stacking,
}

/// Channel-role keyed encoding map; insertion order follows
/// `ChannelRole::ALL`
pub type EncodingMap = IndexMap<ChannelRole, ChannelEncoding>;

/// Assemble the encoding map for one view
///
/// Roles bound to the null field are omitted entirely; a field without a
/// display name falls back to its id as the title.
pub fn encode_channels(binding: &ChannelBinding) -> EncodingMap {
    let mut encoding = EncodingMap::new();
    for role in ChannelRole::ALL {
        let field = binding.field(role);
        if field.is_null() {
            continue;
        }
        let title = if field.name.is_empty() {
            field.fid.clone()
        } else {
            field.name.clone()
        };
        encoding.insert(
            role,
            ChannelEncoding {
                field: field.fid.clone(),
                title,
                field_type: field.semantic_type,
                aggregate: None,
                stack: Stacking::Default,
            },
        );
    }
    encoding
}

/// Attach aggregation to every encoding entry bound to a measure
///
/// Entries whose fid does not resolve through the catalog are left
/// untouched. A measure without an aggregation name falls back to sum.
pub fn inject_aggregates(encoding: &mut EncodingMap, catalog: &FieldCatalog) {
    for entry in encoding.values_mut() {
        let Some(field) = catalog.get(&entry.field) else {
            continue;
        };
        if field.is_measure() {
            let agg = field.agg.unwrap_or(Aggregation::Sum);
            entry.aggregate = Some(agg);
            entry.title = format!("{}({})", agg, field.name);
        }
    }
}

/// Explicitly disable stacking on quantitative positional channels
pub fn disable_stacking(encoding: &mut EncodingMap) {
    for role in [ChannelRole::X, ChannelRole::Y] {
        if let Some(entry) = encoding.get_mut(&role) {
            if entry.field_type == SemanticType::Quantitative {
                entry.stack = Stacking::Disabled;
            }
        }
    }
}
