use serde::{Serialize, Serializer};

use crate::field::FieldDescriptor;

/// Visual channel roles a field can be bound to
///
/// `ALL` fixes the deterministic order used when assembling encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    X,
    Y,
    Color,
    Opacity,
    Size,
    Row,
    Column,
    XOffset,
    YOffset,
}

impl ChannelRole {
    pub const ALL: [ChannelRole; 9] = [
        ChannelRole::X,
        ChannelRole::Y,
        ChannelRole::Color,
        ChannelRole::Opacity,
        ChannelRole::Size,
        ChannelRole::Row,
        ChannelRole::Column,
        ChannelRole::XOffset,
        ChannelRole::YOffset,
    ];

    /// Channel key as it appears in the serialized encoding map
    pub fn key(&self) -> &'static str {
        match self {
            ChannelRole::X => "x",
            ChannelRole::Y => "y",
            ChannelRole::Color => "color",
            ChannelRole::Opacity => "opacity",
            ChannelRole::Size => "size",
            ChannelRole::Row => "row",
            ChannelRole::Column => "column",
            ChannelRole::XOffset => "xOffset",
            ChannelRole::YOffset => "yOffset",
        }
    }
}

impl Serialize for ChannelRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// The full role-to-field binding for one compiled view
///
/// Unused roles hold the null-field sentinel rather than an `Option`, so a
/// binding is always total over the nine roles.
#[derive(Debug, Clone)]
pub struct ChannelBinding {
    pub x: FieldDescriptor,
    pub y: FieldDescriptor,
    pub color: FieldDescriptor,
    pub opacity: FieldDescriptor,
    pub size: FieldDescriptor,
    pub row: FieldDescriptor,
    pub column: FieldDescriptor,
    pub x_offset: FieldDescriptor,
    pub y_offset: FieldDescriptor,
}

impl Default for ChannelBinding {
    fn default() -> Self {
        Self {
            x: FieldDescriptor::null(),
            y: FieldDescriptor::null(),
            color: FieldDescriptor::null(),
            opacity: FieldDescriptor::null(),
            size: FieldDescriptor::null(),
            row: FieldDescriptor::null(),
            column: FieldDescriptor::null(),
            x_offset: FieldDescriptor::null(),
            y_offset: FieldDescriptor::null(),
        }
    }
}

impl ChannelBinding {
    pub fn field(&self, role: ChannelRole) -> &FieldDescriptor {
        match role {
            ChannelRole::X => &self.x,
            ChannelRole::Y => &self.y,
            ChannelRole::Color => &self.color,
            ChannelRole::Opacity => &self.opacity,
            ChannelRole::Size => &self.size,
            ChannelRole::Row => &self.row,
            ChannelRole::Column => &self.column,
            ChannelRole::XOffset => &self.x_offset,
            ChannelRole::YOffset => &self.y_offset,
        }
    }

    /// All nine bound fields in role order, nulls included
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        ChannelRole::ALL.iter().map(|role| self.field(*role).clone()).collect()
    }
}

/// The row or column shelf of the chart assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisChannel {
    Rows,
    Columns,
}

/// User-facing field assignment driving one compilation pass
///
/// The ordered `rows`/`columns` lists are the trellis engine's input; the
/// last element of each is the primary positional axis. Visual channels
/// carry at most one field each.
#[derive(Debug, Clone, Default)]
pub struct ChartAssignment {
    pub rows: Vec<FieldDescriptor>,
    pub columns: Vec<FieldDescriptor>,
    pub color: Option<FieldDescriptor>,
    pub opacity: Option<FieldDescriptor>,
    pub size: Option<FieldDescriptor>,
}

impl ChartAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the rows or columns shelf
    pub fn add_field(&mut self, channel: AxisChannel, field: FieldDescriptor) {
        if field.is_null() {
            return;
        }
        match channel {
            AxisChannel::Rows => self.rows.push(field),
            AxisChannel::Columns => self.columns.push(field),
        }
    }

    /// Remove every occurrence of a field id from the given shelf
    pub fn remove_field(&mut self, channel: AxisChannel, fid: &str) {
        let list = match channel {
            AxisChannel::Rows => &mut self.rows,
            AxisChannel::Columns => &mut self.columns,
        };
        list.retain(|f| f.fid != fid);
    }

    /// Every non-null field id bound anywhere in the assignment, in shelf
    /// order, used to scope the shared point-selection parameter
    pub fn bound_field_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .chain(self.columns.iter())
            .chain(self.color.iter())
            .chain(self.opacity.iter())
            .chain(self.size.iter())
            .filter(|f| !f.is_null())
            .map(|f| f.fid.clone())
            .collect()
    }
}
