//! A grandparent holding two values and passing them down through a parent.
//!
//! Changing either value re-renders the whole subtree, including the child
//! that takes no props at all.

use tracing::trace;

use crate::{Error, Root, Scope, StateHandle};

pub struct GrandParent;
pub struct Parent;
pub struct ChildWithCount;
pub struct ChildWithName;
pub struct ChildWithNoProps;

/// The grandparent's two states, published on every invocation.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub count: StateHandle<u32>,
    pub name: StateHandle<String>,
}

impl Controls {
    pub fn update_count(&self) -> Result<(), Error> {
        self.count.update(|count| *count += 1)
    }

    pub fn toggle_name(&self) -> Result<(), Error> {
        self.name.update(|name| {
            let next = if name == "Alice" { "Bob" } else { "Alice" };
            *name = next.to_owned();
        })
    }
}

pub fn app(controls: Controls) -> impl Fn(Scope<Root>) + 'static {
    move |s: Scope<Root>| {
        let controls = controls.clone();
        s.component(move |s: Scope<GrandParent>| {
            let count = s.use_state(|| 0u32);
            let name = s.use_state(|| String::from("Alice"));
            controls.count.publish(count);
            controls.name.publish(name);
            s.render_counter("GrandParent");
            parent(s, count.get(), name.get());
        });
    }
}

fn parent(s: Scope<GrandParent>, count: u32, name: String) {
    s.component(move |s: Scope<Parent>| {
        s.render_counter("Parent");
        trace!(count, %name, "parent props");
        s.component(move |s: Scope<ChildWithCount>| {
            s.render_counter("Child 1");
            trace!(count, "child 1 props");
        });
        let name = name.clone();
        s.component(move |s: Scope<ChildWithName>| {
            s.render_counter("Child 2");
            trace!(%name, "child 2 props");
        });
        s.component(|s: Scope<ChildWithNoProps>| {
            s.render_counter("Child 3");
        });
    });
}
