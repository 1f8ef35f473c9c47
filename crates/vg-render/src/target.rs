//! Rendering targets
//!
//! One addressable surface per planned view. The target list is resized
//! whenever the view count changes; positions that survive a resize keep
//! their target, so unchanged views are not torn down and recreated.

use uuid::Uuid;

/// An addressable rendering surface for one view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub id: Uuid,
}

impl RenderTarget {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new()
    }
}

/// Resize the target list to `count`, reusing existing targets by position
pub fn sync_targets(targets: &mut Vec<RenderTarget>, count: usize) {
    if targets.len() > count {
        targets.truncate(count);
    } else {
        while targets.len() < count {
            targets.push(RenderTarget::new());
        }
    }
}
