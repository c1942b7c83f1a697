use std::fmt::{Debug, Formatter};
use std::mem;
use std::ops::Deref;

use generational_box::{GenerationalBox, Owner};
use tracing::debug;

use crate::composer::{invoke, ProbeOutput};
use crate::{utils, Composer, Error, ScopeId, State};

/// Drives passes over a composed tree; dropping it releases every instance.
pub struct Recomposer<S> {
    #[allow(dead_code)]
    pub(crate) owner: Owner,
    pub(crate) composer: GenerationalBox<Composer>,
    pub(crate) root_state: State<S>,
}

impl<S> Recomposer<S>
where
    S: 'static,
{
    /// Invoke every instance with a pending update, shallowest first.
    ///
    /// Updates requested while the pass runs are left for the next call, apart
    /// from readers of a context whose value changed: those are invoked in the
    /// same pass, even when a memoized ancestor was skipped.
    /// Returns the number of invocations performed.
    pub fn recompose(&mut self) -> u64 {
        let (mut pending, before) = {
            let mut c = self.composer.write();
            let c = &mut *c;
            let index = &c.index;
            c.dirty.retain(|id| index.contains_key(id));
            c.notified.clear();
            let ids = c.dirty.iter().copied().collect::<Vec<_>>();
            (c.by_depth(ids), c.invocations)
        };
        debug!(pending = pending.len(), "recompose");
        while !pending.is_empty() {
            for id in pending {
                let dirty = self.composer.read().dirty.contains(&id);
                if dirty {
                    invoke(self.composer, id);
                }
            }
            let mut c = self.composer.write();
            let notified = mem::take(&mut c.notified);
            pending = c.by_depth(notified);
            if !pending.is_empty() {
                debug!(pending = pending.len(), "context readers");
            }
        }
        self.composer.read().invocations - before
    }

    #[inline(always)]
    pub fn recompose_with(&mut self, value: S) -> u64 {
        self.root_state.set(value);
        self.recompose()
    }

    #[inline(always)]
    pub fn update_root_state<F>(&mut self, func: F) -> u64
    where
        F: FnOnce(&mut S),
    {
        self.root_state.update(func);
        self.recompose()
    }

    #[inline(always)]
    pub fn root_state(&self) -> S
    where
        S: Clone,
    {
        self.root_state.get()
    }

    /// Schedule `id` for the next pass, as if its own state had changed.
    pub fn invalidate(&mut self, id: ScopeId) -> Result<(), Error> {
        let mut c = self.composer.write();
        if !c.is_mounted(id) {
            return Err(Error::NotMounted(id));
        }
        c.dirty.insert(id);
        Ok(())
    }

    /// Re-invoke the whole tree apart from memoized units whose deps are unchanged.
    pub fn force_update(&mut self) -> u64 {
        self.composer.write().dirty.insert(ScopeId::ROOT);
        self.recompose()
    }

    pub fn probes(&self) -> Vec<ProbeOutput> {
        self.composer.read().probes()
    }

    pub fn labels(&self) -> Vec<String> {
        self.probes().into_iter().map(|probe| probe.label).collect()
    }

    /// Label of the first mounted render counter called `name`.
    pub fn label(&self, name: &str) -> Option<String> {
        self.probes()
            .into_iter()
            .find(|probe| probe.name == name)
            .map(|probe| probe.label)
    }

    /// The unit that declared the render counter called `name`.
    pub fn find_probe(&self, name: &str) -> Option<ScopeId> {
        let c = self.composer.read();
        let probe = c.probes().into_iter().find(|probe| probe.name == name)?;
        c.parent(probe.scope)
    }

    #[inline(always)]
    pub fn is_mounted(&self, id: ScopeId) -> bool {
        self.composer.read().is_mounted(id)
    }

    #[inline(always)]
    pub fn with_composer<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&Composer) -> T,
    {
        let c = self.composer.read();
        func(c.deref())
    }

    pub fn print_tree(&self) {
        let c = self.composer.read();
        utils::print_tree(&c, ScopeId::ROOT);
    }
}

impl<S> Debug for Recomposer<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let c = self.composer.read();
        f.debug_struct("Recomposer")
            .field("composer", c.deref())
            .field("root_state", &self.root_state)
            .finish()
    }
}
