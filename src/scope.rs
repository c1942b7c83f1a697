use std::any::type_name;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;

use generational_box::GenerationalBox;
use tracing::trace;

use crate::composer::{invoke, Body, Placement};
use crate::map::fx_hash;
use crate::{Composer, Loc, RenderCount, RenderCounter, State};

/// Handle passed to a unit's body on every invocation.
///
/// `S` is a marker naming the kind of unit; it only shows up in diagnostics.
pub struct Scope<S> {
    pub id: ScopeId,
    composer: GenerationalBox<Composer>,
    ty: PhantomData<S>,
}

impl<S> Clone for Scope<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Scope<S> {}

impl<S> Scope<S>
where
    S: 'static,
{
    #[inline(always)]
    pub(crate) fn new(id: ScopeId, composer: GenerationalBox<Composer>) -> Self {
        Self {
            id,
            composer,
            ty: PhantomData,
        }
    }

    /// Declare a child that is invoked every time this unit is.
    #[track_caller]
    pub fn component<T, C>(&self, content: C)
    where
        T: 'static,
        C: Fn(Scope<T>) + 'static,
    {
        let loc = Loc::new();
        if let Some(placement) = self.place::<T, C>(loc, content) {
            invoke(self.composer, placement.id);
        }
    }

    /// Declare a child that is skipped while `deps` stays equal and it has no pending update.
    #[track_caller]
    pub fn memo<T, D, C>(&self, deps: D, content: C)
    where
        T: 'static,
        D: PartialEq + 'static,
        C: Fn(Scope<T>) + 'static,
    {
        let loc = Loc::new();
        let Some(placement) = self.place::<T, C>(loc, content) else {
            return;
        };
        let skip = self.composer.write().refresh_deps(&placement, deps);
        if skip {
            trace!(scope = ?placement.id, "memo hit");
            return;
        }
        invoke(self.composer, placement.id);
    }

    /// Children declared inside `content` are identified by `key` rather than by position.
    pub fn key<K, C>(&self, key: K, content: C)
    where
        K: Hash,
        C: FnOnce(Self),
    {
        self.composer.write().push_key(fx_hash(&key));
        content(*self);
        self.composer.write().pop_key();
    }

    #[track_caller]
    pub fn use_state<T, F>(&self, init: F) -> State<T>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        let loc = Loc::new();
        let cell = self.composer.write().slot(self.id, loc, init);
        State::new(self.id, cell, self.composer)
    }

    /// Value computed by `compute`, recomputed only when `deps` changes.
    ///
    /// Wrapping the result in [`Shared`](crate::Shared) gives it an identity
    /// that stays equal across invocations, which keeps memoized children
    /// that take it as deps from re-rendering.
    #[track_caller]
    pub fn use_memo<T, D, F>(&self, deps: D, compute: F) -> T
    where
        T: Clone + 'static,
        D: PartialEq + 'static,
        F: FnOnce() -> T,
    {
        let loc = Loc::new();
        let cell = self
            .composer
            .write()
            .slot(self.id, loc, || None::<(D, T)>);
        let cached = cell.try_read().ok().and_then(|memo| match &*memo {
            Some((prev, value)) if *prev == deps => Some(value.clone()),
            _ => None,
        });
        if let Some(value) = cached {
            return value;
        }
        let value = compute();
        if let Ok(mut memo) = cell.try_write() {
            *memo = Some((deps, value.clone()));
        }
        value
    }

    /// Make `value` readable by descendants through [`Scope::use_context`].
    ///
    /// Call it before declaring children. When the value differs from the one
    /// provided last time, only the units that read it are re-invoked.
    pub fn provide<T>(&self, value: T)
    where
        T: PartialEq + 'static,
    {
        self.composer.write().provide(self.id, value);
    }

    /// Nearest value of type `T` provided by this unit or an ancestor.
    ///
    /// Reading subscribes this unit to later changes of that value.
    pub fn use_context<T>(&self) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.composer.write().context(self.id)
    }

    /// Counter stored in this unit; call `render` on it once per invocation.
    #[track_caller]
    pub fn use_render_counter(&self) -> RenderCounter {
        let loc = Loc::new();
        let cell = self
            .composer
            .write()
            .slot(self.id, loc, || RenderCount::ZERO);
        RenderCounter::from_cell(cell)
    }

    /// Declare a render counter child and return its label for this invocation.
    ///
    /// Called outside of this unit's invocation nothing is declared and the
    /// returned label is empty (`""`).
    #[track_caller]
    pub fn render_counter<L>(&self, name: L) -> String
    where
        L: Into<String>,
    {
        let loc = Loc::new();
        let name = name.into();
        let composer = self.composer;
        let placement = self.place::<Counter, _>(loc, move |scope: Scope<Counter>| {
            let label = scope.use_render_counter().render(&name);
            composer.write().set_probe(scope.id, &name, label);
        });
        let Some(placement) = placement else {
            return String::new();
        };
        invoke(self.composer, placement.id);
        self.composer
            .read()
            .probe_label(placement.id)
            .unwrap_or_default()
    }

    fn place<T, C>(&self, loc: Loc, content: C) -> Option<Placement>
    where
        T: 'static,
        C: Fn(Scope<T>) + 'static,
    {
        let composer = self.composer;
        let body: Body = Rc::new(move |id: ScopeId| content(Scope::new(id, composer)));
        self.composer
            .write()
            .place_child(loc, type_name::<T>(), body)
    }
}

impl<S> Debug for Scope<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("ty", &type_name::<S>())
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) u64);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline(always)]
    pub(crate) fn child(parent: ScopeId, loc: Loc, key: Option<u64>, occurrence: u32) -> Self {
        Self(fx_hash(&(parent.0, loc, key, occurrence)))
    }
}

impl From<ScopeId> for u64 {
    fn from(id: ScopeId) -> Self {
        id.0
    }
}

impl Debug for ScopeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({:016x})", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Root;

/// Marker for the units created by [`Scope::render_counter`].
#[derive(Debug, Clone, Copy)]
pub struct Counter;
