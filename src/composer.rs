use std::any::{type_name, Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::mem;
use std::rc::Rc;

use generational_box::{AnyStorage, GenerationalBox, Owner, UnsyncStorage};
use slab::Slab;
use tracing::{debug, trace, warn};

use crate::map::{HashMapExt, HashSetExt, Map, Set};
use crate::{Loc, Recomposer, Root, Scope, ScopeId, State};

pub(crate) type Body = Rc<dyn Fn(ScopeId)>;

/// Label most recently produced by a mounted render counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub scope: ScopeId,
    pub name: String,
    pub label: String,
}

pub(crate) struct Instance {
    pub(crate) kind: &'static str,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    pub(crate) depth: usize,
    pub(crate) body: Body,
    pub(crate) deps: Option<Box<dyn Any>>,
    pub(crate) slots: Map<(Loc, u32), Box<dyn Any>>,
    pub(crate) probe: Option<(String, String)>,
    contexts: Map<TypeId, Box<dyn Any>>,
    subscribers: Map<TypeId, Set<ScopeId>>,
    pub(crate) owner: Owner,
}

impl Instance {
    fn new(kind: &'static str, parent: Option<ScopeId>, depth: usize, body: Body) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            depth,
            body,
            deps: None,
            slots: Map::new(),
            probe: None,
            contexts: Map::new(),
            subscribers: Map::new(),
            owner: UnsyncStorage::owner(),
        }
    }
}

struct Frame {
    scope: ScopeId,
    keys: Vec<u64>,
    occurrences: Map<(Loc, Option<u64>), u32>,
    hooks: Map<Loc, u32>,
    placed: Vec<ScopeId>,
}

impl Frame {
    fn new(scope: ScopeId) -> Self {
        Self {
            scope,
            keys: Vec::new(),
            occurrences: Map::new(),
            hooks: Map::new(),
            placed: Vec::new(),
        }
    }
}

pub(crate) struct Placement {
    pub(crate) id: ScopeId,
    pub(crate) mounted: bool,
}

pub struct Composer {
    pub(crate) instances: Slab<Instance>,
    pub(crate) index: Map<ScopeId, usize>,
    pub(crate) dirty: Set<ScopeId>,
    pub(crate) invocations: u64,
    pub(crate) notified: Vec<ScopeId>,
    frames: Vec<Frame>,
    detached: Owner,
}

impl Composer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Slab::with_capacity(capacity),
            index: Map::with_capacity(capacity),
            dirty: Set::new(),
            invocations: 0,
            notified: Vec::new(),
            frames: Vec::new(),
            detached: UnsyncStorage::owner(),
        }
    }

    #[track_caller]
    pub fn compose<F>(root: F) -> Recomposer<()>
    where
        F: Fn(Scope<Root>) + 'static,
    {
        Self::compose_with(move |scope, _| root(scope), || ())
    }

    /// Mount `root` with a root state built by `init` and run the first pass.
    #[track_caller]
    pub fn compose_with<S, F, I>(root: F, init: I) -> Recomposer<S>
    where
        S: 'static,
        F: Fn(Scope<Root>, State<S>) + 'static,
        I: FnOnce() -> S,
    {
        let loc = Loc::new();
        let owner = UnsyncStorage::owner();
        let composer = owner.insert(Composer::with_capacity(1024));
        let root_state = {
            let mut c = composer.write();
            let body: Body = Rc::new(|_: ScopeId| {});
            c.insert(ScopeId::ROOT, Instance::new(type_name::<Root>(), None, 0, body));
            State::new(ScopeId::ROOT, c.slot(ScopeId::ROOT, loc, init), composer)
        };
        let body: Body = Rc::new(move |id: ScopeId| root(Scope::new(id, composer), root_state));
        if let Some(instance) = composer.write().instance_mut(ScopeId::ROOT) {
            instance.body = body;
        }
        invoke(composer, ScopeId::ROOT);
        Recomposer {
            owner,
            composer,
            root_state,
        }
    }

    pub fn is_mounted(&self, id: ScopeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.instances.len()
    }

    pub fn kind(&self, id: ScopeId) -> Option<&'static str> {
        self.instance(id).map(|instance| instance.kind)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.instance(id).and_then(|instance| instance.parent)
    }

    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        self.instance(id)
            .map(|instance| instance.children.as_slice())
            .unwrap_or_default()
    }

    /// Every mounted render counter, in tree pre-order.
    pub fn probes(&self) -> Vec<ProbeOutput> {
        let mut probes = Vec::new();
        self.visit(ScopeId::ROOT, &mut |id: ScopeId, instance: &Instance| {
            if let Some((name, label)) = &instance.probe {
                probes.push(ProbeOutput {
                    scope: id,
                    name: name.clone(),
                    label: label.clone(),
                });
            }
        });
        probes
    }

    pub(crate) fn visit<F>(&self, id: ScopeId, func: &mut F)
    where
        F: FnMut(ScopeId, &Instance),
    {
        if let Some(instance) = self.instance(id) {
            func(id, instance);
            for child in &instance.children {
                self.visit(*child, &mut *func);
            }
        }
    }

    /// Mounted ids among `ids` without repeats, shallowest first.
    pub(crate) fn by_depth(&self, ids: Vec<ScopeId>) -> Vec<ScopeId> {
        let mut ordered = ids
            .into_iter()
            .filter_map(|id| self.instance(id).map(|instance| (instance.depth, id)))
            .collect::<Vec<_>>();
        ordered.sort();
        ordered.dedup();
        ordered.into_iter().map(|(_, id)| id).collect()
    }

    #[inline(always)]
    pub(crate) fn instance(&self, id: ScopeId) -> Option<&Instance> {
        self.index.get(&id).map(|slot| &self.instances[*slot])
    }

    #[inline(always)]
    pub(crate) fn instance_mut(&mut self, id: ScopeId) -> Option<&mut Instance> {
        let slot = *self.index.get(&id)?;
        self.instances.get_mut(slot)
    }

    fn insert(&mut self, id: ScopeId, instance: Instance) {
        debug!(scope = ?id, kind = instance.kind, "mount");
        let slot = self.instances.insert(instance);
        self.index.insert(id, slot);
    }

    /// Declare a child of the instance currently being invoked.
    ///
    /// Identity is the parent, the call site, the innermost key and the number
    /// of earlier declarations with the same call site and key in this invocation.
    pub(crate) fn place_child(
        &mut self,
        loc: Loc,
        kind: &'static str,
        body: Body,
    ) -> Option<Placement> {
        let Some(frame) = self.frames.last_mut() else {
            warn!(%loc, "child declared outside of an invocation");
            return None;
        };
        let parent = frame.scope;
        let key = frame.keys.last().copied();
        let occurrence = frame.occurrences.entry((loc, key)).or_insert(0);
        let id = ScopeId::child(parent, loc, key, *occurrence);
        *occurrence += 1;
        frame.placed.push(id);

        if let Some(instance) = self.instance_mut(id) {
            instance.body = body;
            return Some(Placement { id, mounted: false });
        }
        let depth = self.instance(parent).map_or(0, |p| p.depth + 1);
        self.insert(id, Instance::new(kind, Some(parent), depth, body));
        Some(Placement { id, mounted: true })
    }

    /// Store `deps` for a memoized child, returning true when its invocation can be skipped.
    pub(crate) fn refresh_deps<D>(&mut self, placement: &Placement, deps: D) -> bool
    where
        D: PartialEq + 'static,
    {
        let dirty = self.dirty.contains(&placement.id);
        let Some(instance) = self.instance_mut(placement.id) else {
            return false;
        };
        let unchanged = !placement.mounted
            && !dirty
            && instance
                .deps
                .as_ref()
                .and_then(|prev| prev.downcast_ref::<D>())
                .is_some_and(|prev| *prev == deps);
        if !unchanged {
            instance.deps = Some(Box::new(deps));
        }
        unchanged
    }

    /// Cell for a hook of instance `id`, created by `init` on first use.
    ///
    /// A hook is identified by its call site and by how many hooks at that call
    /// site ran before it in the current invocation, so a hook called in a loop
    /// or through a shared helper gets one cell per call.
    pub(crate) fn slot<T, F>(&mut self, id: ScopeId, loc: Loc, init: F) -> GenerationalBox<T>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        let occurrence = match self.frames.last_mut() {
            Some(frame) if frame.scope == id => {
                let count = frame.hooks.entry(loc).or_insert(0);
                *count += 1;
                *count - 1
            }
            _ => 0,
        };
        let Some(instance) = self.instance_mut(id) else {
            warn!(scope = ?id, %loc, "hook used outside of a mounted instance");
            return self.detached.insert(init());
        };
        if let Some(cell) = instance
            .slots
            .get(&(loc, occurrence))
            .and_then(|slot| slot.downcast_ref::<GenerationalBox<T>>())
        {
            return *cell;
        }
        let cell = instance.owner.insert(init());
        instance.slots.insert((loc, occurrence), Box::new(cell));
        cell
    }

    /// Make `value` visible to the descendants of `id`.
    ///
    /// When it differs from the value provided on the previous invocation,
    /// every unit that read it is scheduled for the current pass.
    pub(crate) fn provide<T>(&mut self, id: ScopeId, value: T)
    where
        T: PartialEq + 'static,
    {
        let Some(instance) = self.instance_mut(id) else {
            warn!(scope = ?id, "context provided outside of a mounted instance");
            return;
        };
        let ty = TypeId::of::<T>();
        let changed = instance
            .contexts
            .get(&ty)
            .and_then(|prev| prev.downcast_ref::<T>())
            .is_some_and(|prev| *prev != value);
        instance.contexts.insert(ty, Box::new(value));
        if !changed {
            return;
        }
        let readers = instance
            .subscribers
            .get(&ty)
            .map(|readers| readers.iter().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        debug!(scope = ?id, context = type_name::<T>(), readers = readers.len(), "context changed");
        for reader in readers {
            if self.is_mounted(reader) {
                self.dirty.insert(reader);
                self.notified.push(reader);
            }
        }
    }

    /// Nearest value of type `T` provided by `id` or one of its ancestors.
    ///
    /// `id` is recorded as a reader of that provider.
    pub(crate) fn context<T>(&mut self, id: ScopeId) -> Option<T>
    where
        T: Clone + 'static,
    {
        let ty = TypeId::of::<T>();
        let mut current = Some(id);
        while let Some(scope) = current {
            let instance = self.instance_mut(scope)?;
            let value = instance
                .contexts
                .get(&ty)
                .and_then(|value| value.downcast_ref::<T>())
                .cloned();
            if let Some(value) = value {
                instance.subscribers.entry(ty).or_default().insert(id);
                return Some(value);
            }
            current = instance.parent;
        }
        trace!(scope = ?id, context = type_name::<T>(), "no provider");
        None
    }

    pub(crate) fn set_probe(&mut self, id: ScopeId, name: &str, label: String) {
        if let Some(instance) = self.instance_mut(id) {
            instance.probe = Some((name.to_owned(), label));
        }
    }

    pub(crate) fn probe_label(&self, id: ScopeId) -> Option<String> {
        self.instance(id)
            .and_then(|instance| instance.probe.as_ref())
            .map(|(_, label)| label.clone())
    }

    pub(crate) fn push_key(&mut self, key: u64) {
        if let Some(frame) = self.frames.last_mut() {
            frame.keys.push(key);
        }
    }

    pub(crate) fn pop_key(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.keys.pop();
        }
    }

    fn begin(&mut self, id: ScopeId) -> Option<Body> {
        let body = self.instance(id)?.body.clone();
        self.dirty.remove(&id);
        self.invocations += 1;
        self.frames.push(Frame::new(id));
        trace!(scope = ?id, "invoke");
        Some(body)
    }

    fn end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let retained = frame.placed.iter().copied().collect::<Set<_>>();
        let Some(instance) = self.instance_mut(frame.scope) else {
            return;
        };
        let previous = mem::replace(&mut instance.children, frame.placed);
        for child in previous {
            if !retained.contains(&child) {
                self.unmount(child);
            }
        }
    }

    pub(crate) fn unmount(&mut self, id: ScopeId) {
        let Some(slot) = self.index.remove(&id) else {
            return;
        };
        let instance = self.instances.remove(slot);
        self.dirty.remove(&id);
        debug!(scope = ?id, kind = instance.kind, "unmount");
        for child in &instance.children {
            self.unmount(*child);
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the body of `id`, then unmount whatever it no longer declares.
pub(crate) fn invoke(composer: GenerationalBox<Composer>, id: ScopeId) {
    let body = composer.write().begin(id);
    let Some(body) = body else {
        return;
    };
    body(id);
    composer.write().end();
}

impl Debug for Composer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("mounted", &self.instances.len())
            .field("dirty", &self.dirty)
            .field("invocations", &self.invocations)
            .finish()
    }
}
