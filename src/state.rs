use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::rc::Rc;

use generational_box::GenerationalBox;
use tracing::warn;

use crate::{Composer, Error, ScopeId};

/// Mutable cell owned by one instance.
///
/// Writing the cell schedules the owning instance for the next recompose. The
/// cell is released when the owner unmounts; later writes are ignored.
pub struct State<T> {
    pub scope: ScopeId,
    cell: GenerationalBox<T>,
    composer: GenerationalBox<Composer>,
    ty: PhantomData<T>,
}

impl<T> State<T>
where
    T: 'static,
{
    #[inline(always)]
    pub(crate) fn new(
        scope: ScopeId,
        cell: GenerationalBox<T>,
        composer: GenerationalBox<Composer>,
    ) -> Self {
        Self {
            scope,
            cell,
            composer,
            ty: PhantomData,
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.read().clone()
    }

    pub fn try_get(&self) -> Result<T, Error>
    where
        T: Clone,
    {
        self.cell
            .try_read()
            .map(|value| value.clone())
            .map_err(|_| Error::StateReleased(self.scope))
    }

    pub fn set(&self, value: T) {
        self.update(move |current| *current = value);
    }

    pub fn update<F>(&self, func: F)
    where
        F: FnOnce(&mut T),
    {
        match self.cell.try_write() {
            Ok(mut value) => func(&mut *value),
            Err(_) => {
                warn!(scope = ?self.scope, "write to released state ignored");
                return;
            }
        }
        if let Ok(mut c) = self.composer.try_write() {
            c.dirty.insert(self.scope);
        }
    }
}

impl<T> Debug for State<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("scope", &self.scope)
            .field("ty", &self.ty)
            .finish()
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for State<T> {}

/// Shared place where a unit publishes one of its [`State`]s, so code outside
/// the pass can write it later the way an event handler would.
pub struct StateHandle<T> {
    state: Rc<Cell<Option<State<T>>>>,
}

impl<T> StateHandle<T>
where
    T: 'static,
{
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(None)),
        }
    }

    pub fn publish(&self, state: State<T>) {
        self.state.set(Some(state));
    }

    pub fn get(&self) -> Option<State<T>> {
        self.state.get()
    }

    /// Write the published state; fails when nothing has been published yet.
    pub fn update<F>(&self, func: F) -> Result<(), Error>
    where
        F: FnOnce(&mut T),
    {
        let state = self.get().ok_or(Error::Unpublished)?;
        state.update(func);
        Ok(())
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: 'static> Default for StateHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for StateHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("state", &self.state.get())
            .finish()
    }
}
