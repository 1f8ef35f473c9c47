//! Shared interaction event pipeline
//!
//! One `InteractionBus` outlives any individual rendered view. Every view
//! pushes its raw clicks and selection-parameter changes here; consumers
//! subscribe to the raw channels or to the filtered geom-click stream. The
//! bus is owned by whoever drives the orchestrator and injected into
//! consumers, so independent chart instances never cross-talk.

use ahash::AHashMap;
use serde_json::Value;
use tokio::sync::{broadcast, watch};

const CHANNEL_CAPACITY: usize = 64;

/// A raw pointer click inside a rendered view
///
/// The payload is the rendering engine's own event object, passed through
/// opaquely.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    /// Row-major index of the view the click landed in
    pub view: usize,

    /// Pointer position, when the engine reports one
    pub position: Option<(f64, f64)>,

    /// Engine-specific event payload
    pub payload: Value,
}

impl ClickEvent {
    pub fn new(view: usize) -> Self {
        Self {
            view,
            position: None,
            payload: Value::Null,
        }
    }
}

/// A selection-parameter change: selected field ids mapped to the selected
/// values, empty when the selection was cleared
#[derive(Debug, Clone, Default)]
pub struct SelectionEvent {
    pub values: AHashMap<String, Vec<Value>>,
}

impl SelectionEvent {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selection over a single field
    pub fn single(fid: impl Into<String>, value: Value) -> Self {
        let mut values = AHashMap::new();
        values.insert(fid.into(), vec![value]);
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The process-shared event bus merging events from all rendered views
pub struct InteractionBus {
    clicks: broadcast::Sender<ClickEvent>,
    selections: broadcast::Sender<SelectionEvent>,
    geom: broadcast::Sender<(SelectionEvent, ClickEvent)>,
    latest_click: watch::Sender<Option<ClickEvent>>,
}

impl InteractionBus {
    pub fn new() -> Self {
        let (clicks, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (selections, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (geom, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (latest_click, _) = watch::channel(None);
        Self {
            clicks,
            selections,
            geom,
            latest_click,
        }
    }

    /// Push a raw click from any view
    pub fn push_click(&self, event: ClickEvent) {
        // send() only fails with zero subscribers, which is fine here
        self.latest_click.send_replace(Some(event.clone()));
        let _ = self.clicks.send(event);
    }

    /// Push a selection-parameter change from any view
    ///
    /// The geom pairing is snapshotted here, at push time: the selection
    /// pairs with the click most recently seen before it. A selection that
    /// precedes the first click is never paired, even if a click arrives
    /// before a consumer reads the stream.
    pub fn push_selection(&self, event: SelectionEvent) {
        let latest = self.latest_click.borrow().clone();
        if let Some(click) = latest {
            let _ = self.geom.send((event.clone(), click));
        }
        let _ = self.selections.send(event);
    }

    /// Subscribe to the unfiltered click channel
    pub fn clicks(&self) -> broadcast::Receiver<ClickEvent> {
        self.clicks.subscribe()
    }

    /// Subscribe to the unfiltered selection channel
    pub fn selections(&self) -> broadcast::Receiver<SelectionEvent> {
        self.selections.subscribe()
    }

    /// Subscribe to non-empty selections paired with the latest click
    pub fn geom_clicks(&self) -> GeomClickStream {
        GeomClickStream {
            pairs: self.geom.subscribe(),
        }
    }
}

impl Default for InteractionBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Filtered stream of `(selection, click)` pairs
///
/// Each selection was paired with the most recent click when it was
/// pushed; empty selections (the user clicked empty space) are dropped,
/// and selections pushed before the first click are never delivered.
/// Dropping the stream releases the subscription.
pub struct GeomClickStream {
    pairs: broadcast::Receiver<(SelectionEvent, ClickEvent)>,
}

impl GeomClickStream {
    /// Receive the next non-empty selection pair, or `None` once the bus
    /// has been dropped
    pub async fn recv(&mut self) -> Option<(SelectionEvent, ClickEvent)> {
        loop {
            match self.pairs.recv().await {
                Ok((selection, click)) => {
                    if selection.is_empty() {
                        continue;
                    }
                    return Some((selection, click));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "geom click subscriber lagged behind selections");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_geom_click_pairs_selection_with_latest_click() {
        let bus = InteractionBus::new();
        let mut stream = bus.geom_clicks();

        bus.push_click(ClickEvent::new(0));
        bus.push_click(ClickEvent::new(1));
        bus.push_selection(SelectionEvent::single("region", json!("East")));

        let (selection, click) = stream.recv().await.expect("bus is open");
        assert_eq!(selection.values["region"], vec![json!("East")]);
        assert_eq!(click.view, 1);
    }

    #[tokio::test]
    async fn test_empty_selection_never_emitted() {
        let bus = InteractionBus::new();
        let mut stream = bus.geom_clicks();

        bus.push_click(ClickEvent::new(0));
        bus.push_selection(SelectionEvent::empty());
        bus.push_selection(SelectionEvent::single("sales", json!(42)));

        let (selection, _) = stream.recv().await.expect("bus is open");
        assert!(selection.values.contains_key("sales"));
    }

    #[tokio::test]
    async fn test_selection_before_any_click_is_skipped() {
        let bus = InteractionBus::new();
        let mut stream = bus.geom_clicks();

        bus.push_selection(SelectionEvent::single("sales", json!(1)));
        bus.push_click(ClickEvent::new(3));
        bus.push_selection(SelectionEvent::single("sales", json!(2)));

        let (selection, click) = stream.recv().await.expect("bus is open");
        assert_eq!(selection.values["sales"], vec![json!(2)]);
        assert_eq!(click.view, 3);
    }

    #[tokio::test]
    async fn test_pre_click_selection_not_paired_with_later_click() {
        let bus = InteractionBus::new();
        let mut stream = bus.geom_clicks();

        // pairing happens when the selection is pushed, so a click arriving
        // afterwards must not resurrect it for a late reader
        bus.push_selection(SelectionEvent::single("sales", json!(1)));
        bus.push_click(ClickEvent::new(0));
        drop(bus);

        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_ends_when_bus_dropped() {
        let bus = InteractionBus::new();
        let mut stream = bus.geom_clicks();
        drop(bus);
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_raw_channels_are_unfiltered() {
        let bus = InteractionBus::new();
        let mut selections = bus.selections();

        bus.push_selection(SelectionEvent::empty());
        let received = selections.recv().await.expect("bus is open");
        assert!(received.is_empty());
    }
}
