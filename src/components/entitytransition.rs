//! Transitions bound to a specific entity.
//!
//! An [`EntityTransition<T>`] is a [`Transition`] whose guard inspects the
//! component `T` of one bound entity (typically the mobile entity the state
//! machine drives, or a target it watches). The entity is fixed at
//! construction; constructing without one is a configuration error.
//!
//! Before every evaluation the bound entity is checked for liveness. A
//! despawned entity or a missing `T` makes the guard report an error, which
//! the evaluation loop logs and treats as "did not fire".

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use bevy_ecs::prelude::*;

use crate::components::statemachine::{GuardContext, StateId, Transition};
use crate::error::{GraphError, GuardError};

type EntityGuard<T> =
    Arc<dyn Fn(&T, &GuardContext<'_>) -> Result<bool, GuardError> + Send + Sync>;

pub struct EntityTransition<T: Component> {
    entity: Entity,
    from: StateId,
    to: StateId,
    priority: i32,
    guard: EntityGuard<T>,
    _component: PhantomData<fn() -> T>,
}

impl<T: Component> EntityTransition<T> {
    /// Bind a guard to `entity`.
    ///
    /// Fails with [`GraphError::MissingEntity`] when `entity` is `None` or
    /// the placeholder entity.
    pub fn new(
        entity: Option<Entity>,
        from: impl Into<StateId>,
        to: impl Into<StateId>,
        priority: i32,
        guard: impl Fn(&T, &GuardContext<'_>) -> Result<bool, GuardError> + Send + Sync + 'static,
    ) -> Result<Self, GraphError> {
        let from = from.into();
        let to = to.into();
        let entity = match entity {
            Some(e) if e != Entity::PLACEHOLDER => e,
            _ => return Err(GraphError::MissingEntity { from, to }),
        };
        Ok(Self {
            entity,
            from,
            to,
            priority,
            guard: Arc::new(guard),
            _component: PhantomData,
        })
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Read the bound component from `world`, checking liveness first.
    pub fn component<'w>(&self, world: &'w World) -> Result<&'w T, GuardError> {
        bound_component::<T>(world, self.entity)
    }

    /// Evaluate the guard against the bound entity.
    pub fn fires(&self, ctx: &GuardContext<'_>) -> Result<bool, GuardError> {
        let component = self.component(ctx.world)?;
        (self.guard)(component, ctx)
    }

    /// Erase the binding into a plain [`Transition`] for a graph.
    pub fn into_transition(self) -> Transition {
        let entity = self.entity;
        let guard = self.guard;
        Transition::new(self.from, self.to, self.priority, move |ctx| {
            let component = bound_component::<T>(ctx.world, entity)?;
            guard(component, ctx)
        })
    }
}

impl<T: Component> From<EntityTransition<T>> for Transition {
    fn from(transition: EntityTransition<T>) -> Self {
        transition.into_transition()
    }
}

fn bound_component<T: Component>(world: &World, entity: Entity) -> Result<&T, GuardError> {
    let entity_ref = world
        .get_entity(entity)
        .map_err(|_| GuardError::EntityGone(entity))?;
    entity_ref
        .get::<T>()
        .ok_or(GuardError::MissingComponent {
            entity,
            component: type_name::<T>(),
        })
}
