use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Semantic type of a field, following the grammar's type system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Continuous numeric values
    Quantitative,
    /// Unordered categories
    Nominal,
    /// Ordered categories
    Ordinal,
    /// Dates and times
    Temporal,
}

/// Whether a field partitions the data or is summarized over it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticType {
    Dimension,
    Measure,
}

/// Aggregation functions available for measure fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Mean,
    Median,
    Count,
    Min,
    Max,
    Variance,
    Stdev,
}

impl Aggregation {
    /// Name used in spec output and rewritten titles
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Variance => "variance",
            Aggregation::Stdev => "stdev",
        }
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that can be bound to a visual channel
///
/// The empty-fid descriptor is the null-field sentinel meaning "channel
/// unused"; it never produces an encoding entry and is excluded from every
/// fan-out list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique field id, used as the column key into dataset rows
    pub fid: String,

    /// Display name
    pub name: String,

    /// Semantic type driving mark inference and encoding types
    pub semantic_type: SemanticType,

    /// Dimension or measure
    pub analytic_type: AnalyticType,

    /// Aggregation function, meaningful only for measures
    pub agg: Option<Aggregation>,
}

impl FieldDescriptor {
    /// Create a dimension field
    pub fn dimension(fid: impl Into<String>, name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            fid: fid.into(),
            name: name.into(),
            semantic_type,
            analytic_type: AnalyticType::Dimension,
            agg: None,
        }
    }

    /// Create a measure field
    pub fn measure(
        fid: impl Into<String>,
        name: impl Into<String>,
        semantic_type: SemanticType,
        agg: Aggregation,
    ) -> Self {
        Self {
            fid: fid.into(),
            name: name.into(),
            semantic_type,
            analytic_type: AnalyticType::Measure,
            agg: Some(agg),
        }
    }

    /// The null-field sentinel for an unused channel
    pub fn null() -> Self {
        Self {
            fid: String::new(),
            name: String::new(),
            semantic_type: SemanticType::Quantitative,
            analytic_type: AnalyticType::Measure,
            agg: Some(Aggregation::Sum),
        }
    }

    pub fn is_null(&self) -> bool {
        self.fid.is_empty()
    }

    pub fn is_measure(&self) -> bool {
        self.analytic_type == AnalyticType::Measure
    }

    pub fn is_dimension(&self) -> bool {
        self.analytic_type == AnalyticType::Dimension
    }
}

/// Explicit field-id to descriptor mapping
///
/// Aggregation injection resolves bound fids through this catalog; a miss
/// leaves the encoding entry untouched, which is the documented fallback for
/// the null field and for ids absent from the authoritative field list.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: AHashMap<String, FieldDescriptor>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a field list, ignoring null sentinels
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a FieldDescriptor>) -> Self {
        let mut catalog = Self::new();
        for field in fields {
            catalog.insert(field.clone());
        }
        catalog
    }

    pub fn insert(&mut self, field: FieldDescriptor) {
        if !field.is_null() {
            self.fields.insert(field.fid.clone(), field);
        }
    }

    pub fn get(&self, fid: &str) -> Option<&FieldDescriptor> {
        self.fields.get(fid)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
