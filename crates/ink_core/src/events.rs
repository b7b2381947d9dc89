//! Reveal event dispatch
//!
//! Hosts subscribe to lifecycle events of a reveal instance. Events are
//! delivered synchronously, in registration order, from inside the frame
//! that produced them.

use rustc_hash::FxHashMap;

/// Event kind, used as the subscription key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadStart,
    Load,
    RevealStart,
    Progress,
    RevealComplete,
    Error,
}

/// A lifecycle event emitted by a reveal instance
#[derive(Clone, Debug, PartialEq)]
pub enum RevealEvent {
    /// The host started fetching the source image
    LoadStart,
    /// The source image finished decoding (natural size in pixels)
    Load { width: u32, height: u32 },
    /// The timeline entered `Running`
    RevealStart,
    /// Normalized timeline progress in `[0, 1]`
    Progress(f32),
    /// The timeline reached 1.0; delivered at most once per lifetime
    RevealComplete,
    /// The source image could not be loaded
    Error(String),
}

impl RevealEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RevealEvent::LoadStart => EventKind::LoadStart,
            RevealEvent::Load { .. } => EventKind::Load,
            RevealEvent::RevealStart => EventKind::RevealStart,
            RevealEvent::Progress(_) => EventKind::Progress,
            RevealEvent::RevealComplete => EventKind::RevealComplete,
            RevealEvent::Error(_) => EventKind::Error,
        }
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&RevealEvent) + Send + Sync>;

/// Dispatches reveal events to registered handlers
pub struct RevealListeners {
    handlers: FxHashMap<EventKind, Vec<EventHandler>>,
    catch_all: Vec<EventHandler>,
}

impl RevealListeners {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
            catch_all: Vec::new(),
        }
    }

    /// Register a handler for one event kind
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Register a handler that sees every event
    pub fn on_any<F>(&mut self, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.catch_all.push(Box::new(handler));
    }

    /// Dispatch an event to all registered handlers
    pub fn dispatch(&self, event: &RevealEvent) {
        if let Some(handlers) = self.handlers.get(&event.kind()) {
            for handler in handlers {
                handler(event);
            }
        }
        for handler in &self.catch_all {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.catch_all.is_empty() && self.handlers.values().all(Vec::is_empty)
    }
}

impl Default for RevealListeners {
    fn default() -> Self {
        Self::new()
    }
}
