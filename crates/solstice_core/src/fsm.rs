//! State Machine Runtime
//!
//! Typed flat state machines for interaction phases.
//! Supports:
//! - Typed states and events (any `Copy + Eq` enum)
//! - Wildcard transitions that fire from every state
//! - A bounded history for debugging

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Number of transitions remembered by [`StateMachine::history`]
pub const HISTORY_LIMIT: usize = 64;

/// Targets for one event: `(source, target)`, `None` source matches every state
type Targets<S> = SmallVec<[(Option<S>, S); 4]>;

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: FxHashMap<E, Targets<S>>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: FxHashMap::default(),
        }
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.entry(event).or_default().push((Some(from), to));
        self
    }

    /// Add a transition that fires from every state
    ///
    /// Transitions for an event are matched in the order they were added, so
    /// specific ones registered first take precedence.
    pub fn on_any(mut self, event: E, to: S) -> Self {
        self.transitions.entry(event).or_default().push((None, to));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: FxHashMap<E, Targets<S>>,
    /// Most recent transitions, oldest first
    history: Vec<(S, E, S)>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Hash + Debug,
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

    /// Get transition history
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    /// Send an event to the state machine, potentially triggering a transition
    ///
    /// Returns the state after the event. Unmatched events leave the state
    /// and history untouched.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;

        let Some(to_state) = self.transitions.get(&event).and_then(|targets| {
            targets
                .iter()
                .find(|(from, _)| from.map_or(true, |from| from == current))
                .map(|(_, to)| *to)
        }) else {
            tracing::trace!("fsm: {:?} ignored in {:?}", event, current);
            return current;
        };

        self.current_state = to_state;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((current, event, to_state));

        tracing::trace!("fsm: {:?} --{:?}--> {:?}", current, event, to_state);
        to_state
    }
}
