//! Chart-specification compiler
//!
//! Translates a declarative field assignment into renderable view
//! specifications: mark inference, channel encoding assembly, aggregation
//! and stacking policy, trellis expansion of repeated measures, and the
//! root specification shared by all views of one chart.

pub mod encoding;
pub mod mark;
pub mod root;
pub mod trellis;
pub mod view;

pub use encoding::{disable_stacking, encode_channels, inject_aggregates, ChannelEncoding, EncodingMap, Stacking};
pub use mark::auto_mark;
pub use root::{compose, ChartSpec, DataBlock, RootSpec, SelectionParam, SCALE_PARAM, SELECTION_PARAM};
pub use trellis::{plan_trellis, TrellisPlan};
pub use view::{build_single_view, MarkDef, ViewSpec, MARK_OPACITY};
