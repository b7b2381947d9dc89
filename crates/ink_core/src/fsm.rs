//! State Machine Runtime
//!
//! A flat, table-driven state machine. States and events are any small
//! `Copy` types (usually fieldless enums). Transitions are looked up by
//! `(state, event)`; a state may carry entry callbacks.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A callback run when a state is entered
pub type Action = Box<dyn FnMut() + Send>;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            entry_callbacks: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition {
            from_state: from,
            event,
            to_state: to,
        });
        self
    }

    /// Add the same event transition from several source states
    pub fn on_any(mut self, from: &[S], event: E, to: S) -> Self {
        for state in from {
            self = self.on(*state, event, to);
        }
        self
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            entry_callbacks: self.entry_callbacks,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, Vec<Action>>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Send an event to the state machine, potentially triggering a transition.
    ///
    /// Returns the state after the event. Events with no matching transition
    /// leave the machine where it is.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;

        let Some(to_state) = self
            .transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
            .map(|t| t.to_state)
        else {
            tracing::trace!(?current, ?event, "no transition");
            return current;
        };

        self.current_state = to_state;
        tracing::trace!(from = ?current, ?event, to = ?to_state, "transition");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        to_state
    }
}
