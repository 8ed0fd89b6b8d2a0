//! Prioritized state machine component for driving entity behavior.
//!
//! A [`StateGraph`] is a directed graph of states connected by
//! [`Transition`]s. Each transition carries a priority and a guard. Once per
//! tick, [`state_machine_system`](crate::systems::statemachine::state_machine_system)
//! looks at the outgoing transitions of the current state and fires the
//! highest-priority one whose guard returns `Ok(true)`.
//!
//! # Architecture
//!
//! - **States are string labels** – wrapped in [`StateId`]
//! - **Graphs are immutable** – built once with [`StateGraphBuilder`] and
//!   shared between entities through an `Arc`
//! - **Ties are deterministic** – equal priorities resolve by declaration
//!   order, never by evaluation order
//! - **Hooks** – optional `on_exit` / `on_enter` per state, run with mutable
//!   world access so they can reconfigure movement
//! - **One hop per tick** – a machine moves at most one edge per tick
//!
//! # Example
//!
//! ```ignore
//! let graph = StateGraph::builder("idle")
//!     .state("idle")
//!     .state("chase")
//!     .transition(Transition::new("idle", "chase", 5, |ctx| Ok(ctx.time_in_state > 2.0)))
//!     .on_enter("chase", |hook| { /* set a destination */ })
//!     .build()?;
//!
//! world.spawn(StateMachine::new(Arc::new(graph)));
//! ```

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{GraphError, GuardError};

/// Identifier of a state within a graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(String);

impl StateId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl From<String> for StateId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Read-only view handed to guards.
pub struct GuardContext<'w> {
    pub world: &'w World,
    /// The entity that owns the state machine.
    pub entity: Entity,
    pub state: &'w StateId,
    /// Seconds spent in `state` so far.
    pub time_in_state: f32,
}

/// Mutable view handed to `on_exit` / `on_enter` hooks.
pub struct HookContext<'w> {
    pub world: &'w mut World,
    pub entity: Entity,
    pub from: &'w StateId,
    pub to: &'w StateId,
}

/// Guard predicate. Must be side-effect free: evaluating it twice against
/// the same data gives the same answer.
pub type Guard = Arc<dyn Fn(&GuardContext<'_>) -> Result<bool, GuardError> + Send + Sync>;

/// Entry/exit hook.
pub type StateHook = Arc<dyn Fn(&mut HookContext<'_>) + Send + Sync>;

/// Directed, prioritized edge between two states.
#[derive(Clone)]
pub struct Transition {
    from: StateId,
    to: StateId,
    priority: i32,
    guard: Guard,
}

impl Transition {
    pub fn new(
        from: impl Into<StateId>,
        to: impl Into<StateId>,
        priority: i32,
        guard: impl Fn(&GuardContext<'_>) -> Result<bool, GuardError> + Send + Sync + 'static,
    ) -> Self {
        Self::from_guard(from, to, priority, Arc::new(guard))
    }

    pub fn from_guard(
        from: impl Into<StateId>,
        to: impl Into<StateId>,
        priority: i32,
        guard: Guard,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            priority,
            guard,
        }
    }

    pub fn from(&self) -> &StateId {
        &self.from
    }

    pub fn to(&self) -> &StateId {
        &self.to
    }

    /// Higher value wins among transitions firing in the same tick.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn fires(&self, ctx: &GuardContext<'_>) -> Result<bool, GuardError> {
        (self.guard)(ctx)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct StateNode {
    /// Indices into `StateGraph::transitions`, highest priority first,
    /// declaration order among equals.
    outgoing: SmallVec<[usize; 4]>,
    on_enter: Option<StateHook>,
    on_exit: Option<StateHook>,
}

/// Immutable state graph. Build with [`StateGraph::builder`].
pub struct StateGraph {
    initial: StateId,
    states: FxHashMap<StateId, StateNode>,
    /// In declaration order.
    transitions: Vec<Transition>,
}

impl StateGraph {
    pub fn builder(initial: impl Into<StateId>) -> StateGraphBuilder {
        StateGraphBuilder::new(initial)
    }

    pub fn initial(&self) -> &StateId {
        &self.initial
    }

    pub fn contains(&self, state: &StateId) -> bool {
        self.states.contains_key(state)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Outgoing transitions of `state` in evaluation order.
    pub fn outgoing<'a>(
        &'a self,
        state: &StateId,
    ) -> impl Iterator<Item = &'a Transition> + use<'a> {
        self.states
            .get(state)
            .into_iter()
            .flat_map(|node| node.outgoing.iter())
            .map(|&index| &self.transitions[index])
    }

    pub fn on_enter(&self, state: &StateId) -> Option<StateHook> {
        self.states.get(state).and_then(|n| n.on_enter.clone())
    }

    pub fn on_exit(&self, state: &StateId) -> Option<StateHook> {
        self.states.get(state).and_then(|n| n.on_exit.clone())
    }
}

impl fmt::Debug for StateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&StateId> = self.states.keys().collect();
        states.sort();
        f.debug_struct("StateGraph")
            .field("initial", &self.initial)
            .field("states", &states)
            .field("transitions", &self.transitions)
            .finish()
    }
}

/// Builder for [`StateGraph`]. Validation happens in [`build`](Self::build).
pub struct StateGraphBuilder {
    initial: StateId,
    states: Vec<StateId>,
    transitions: Vec<Transition>,
    on_enter: Vec<(StateId, StateHook)>,
    on_exit: Vec<(StateId, StateHook)>,
}

impl StateGraphBuilder {
    pub fn new(initial: impl Into<StateId>) -> Self {
        Self {
            initial: initial.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
        }
    }

    pub fn state(mut self, state: impl Into<StateId>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Add a transition. Declaration order breaks priority ties.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn on_enter(
        mut self,
        state: impl Into<StateId>,
        hook: impl Fn(&mut HookContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_enter.push((state.into(), Arc::new(hook)));
        self
    }

    pub fn on_exit(
        mut self,
        state: impl Into<StateId>,
        hook: impl Fn(&mut HookContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_exit.push((state.into(), Arc::new(hook)));
        self
    }

    pub fn build(self) -> Result<StateGraph, GraphError> {
        let mut states: FxHashMap<StateId, StateNode> = FxHashMap::default();
        for state in self.states {
            if states.contains_key(&state) {
                return Err(GraphError::DuplicateState(state));
            }
            states.insert(state, StateNode::default());
        }

        if !states.contains_key(&self.initial) {
            return Err(GraphError::UnknownInitialState(self.initial));
        }

        for (index, transition) in self.transitions.iter().enumerate() {
            if !states.contains_key(&transition.to) {
                return Err(GraphError::UnknownState {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                });
            }
            match states.get_mut(&transition.from) {
                Some(node) => node.outgoing.push(index),
                None => {
                    return Err(GraphError::UnknownState {
                        from: transition.from.clone(),
                        to: transition.to.clone(),
                    });
                }
            }
        }

        let transitions = self.transitions;
        for node in states.values_mut() {
            // stable sort keeps declaration order among equal priorities
            node.outgoing
                .sort_by_key(|&index| Reverse(transitions[index].priority));
        }

        for (state, hook) in self.on_enter {
            match states.get_mut(&state) {
                Some(node) => node.on_enter = Some(hook),
                None => return Err(GraphError::UnknownHookState(state)),
            }
        }
        for (state, hook) in self.on_exit {
            match states.get_mut(&state) {
                Some(node) => node.on_exit = Some(hook),
                None => return Err(GraphError::UnknownHookState(state)),
            }
        }

        Ok(StateGraph {
            initial: self.initial,
            states,
            transitions,
        })
    }
}

/// Per-entity state machine instance.
///
/// # Fields
///
/// - `current` – the active state
/// - `previous` – the state before the last transition, if any
/// - `time_in_state` – seconds since entering `current`
///
/// The machine starts in the graph's initial state without running its
/// `on_enter` hook and never terminates.
#[derive(Component, Clone)]
pub struct StateMachine {
    graph: Arc<StateGraph>,
    current: StateId,
    previous: Option<StateId>,
    time_in_state: f32,
}

impl StateMachine {
    pub fn new(graph: Arc<StateGraph>) -> Self {
        let current = graph.initial().clone();
        Self {
            graph,
            current,
            previous: None,
            time_in_state: 0.0,
        }
    }

    pub fn graph(&self) -> &Arc<StateGraph> {
        &self.graph
    }

    pub fn current(&self) -> &StateId {
        &self.current
    }

    pub fn previous(&self) -> Option<&StateId> {
        self.previous.as_ref()
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub(crate) fn advance_time(&mut self, seconds: f32) {
        self.time_in_state += seconds;
    }

    /// Switch to `next`, returning the state that was left.
    pub(crate) fn switch_to(&mut self, next: StateId) -> StateId {
        let left = std::mem::replace(&mut self.current, next);
        self.previous = Some(left.clone());
        self.time_in_state = 0.0;
        left
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("time_in_state", &self.time_in_state)
            .finish()
    }
}
