//! Memoized children that take a style and a callback as props.
//!
//! Rebuilt on every render, both props get a new identity each time and the
//! memo boundaries never hold. Built through `use_memo`, they keep their
//! identity and the children only re-render when their own props change.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use crate::{Error, Root, Scope, Shared, State, StateHandle};

pub struct Parent;
pub struct ExpensiveChild;
pub struct ListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Style and callback are rebuilt on every render.
    Pitfall,
    /// Style and callback come from `use_memo`.
    Optimized,
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pitfall" => Ok(Variant::Pitfall),
            "optimized" => Ok(Variant::Optimized),
            other => Err(Error::UnknownVariant(other.to_owned())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Style {
    pub color: &'static str,
    pub font_size: u32,
}

pub type OnRemove = Shared<dyn Fn(&str)>;

/// The parent's count, and the remove callback its items were given last.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub count: StateHandle<u32>,
    on_remove: Rc<RefCell<Option<OnRemove>>>,
}

impl Controls {
    pub fn increment(&self) -> Result<(), Error> {
        self.count.update(|count| *count += 1)
    }

    /// Call the callback handed to the items, as an item's remove button would.
    pub fn remove(&self, item: &str) -> Result<(), Error> {
        let on_remove = self.on_remove.borrow().clone().ok_or(Error::Unpublished)?;
        (*on_remove)(item);
        Ok(())
    }
}

fn style() -> Shared<Style> {
    Shared::new(Style {
        color: "blue",
        font_size: 16,
    })
}

fn remover(items: State<Vec<String>>) -> OnRemove {
    let remove: Rc<dyn Fn(&str)> = Rc::new(move |item: &str| {
        items.update(|items| items.retain(|current| current != item));
    });
    Shared::from(remove)
}

pub fn app(variant: Variant, controls: Controls) -> impl Fn(Scope<Root>) + 'static {
    move |s: Scope<Root>| {
        let controls = controls.clone();
        s.component(move |s: Scope<Parent>| {
            let count = s.use_state(|| 0u32);
            let items = s.use_state(|| {
                ["Apple", "Banana", "Cherry"]
                    .map(String::from)
                    .to_vec()
            });
            controls.count.publish(count);
            s.render_counter("Parent");

            let (style, on_remove) = match variant {
                Variant::Pitfall => (style(), remover(items)),
                Variant::Optimized => (
                    s.use_memo((), style),
                    s.use_memo((), move || remover(items)),
                ),
            };
            *controls.on_remove.borrow_mut() = Some(on_remove.clone());
            debug!(count = count.get(), ?style, "parent");

            s.memo(style, |s: Scope<ExpensiveChild>| {
                s.render_counter("Child");
            });
            for item in items.get() {
                let on_remove = on_remove.clone();
                s.key(item.clone(), move |s| {
                    s.memo((item.clone(), on_remove), move |s: Scope<ListItem>| {
                        s.render_counter(format!("Item-{item}"));
                    });
                });
            }
        });
    }
}
