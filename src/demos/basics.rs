//! A parent holding a count, with plain and memoized children underneath.
//!
//! Every child without a memo boundary re-renders with the parent, whether or
//! not it reads the count. Memoized children only re-render when their deps change.

use tracing::trace;

use crate::{Root, Scope, State, StateHandle};

pub struct Parent;
pub struct PropChild;
pub struct PlainChild;
pub struct MemoChild;
pub struct MemoPropChild;

/// The page, with the first child's own click count published to `clicks`.
pub fn app(clicks: StateHandle<u32>) -> impl Fn(Scope<Root>, State<u32>) + 'static {
    move |s: Scope<Root>, count: State<u32>| {
        let count = count.get();
        let clicks = clicks.clone();
        s.component(move |s: Scope<Parent>| {
            s.render_counter("Parent");
            let clicks = clicks.clone();
            s.component(move |s: Scope<PropChild>| {
                let own = s.use_state(|| 0u32);
                clicks.publish(own);
                s.render_counter("Child 1");
                trace!(count, clicks = own.get(), "child 1");
            });
            s.component(|s: Scope<PlainChild>| {
                s.render_counter("Child 2");
            });
            s.memo((), |s: Scope<MemoChild>| {
                s.render_counter("Child 3");
            });
            s.memo(count, |s: Scope<MemoPropChild>| {
                s.render_counter("Child 4");
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Composer;

    #[test]
    fn first_pass_renders_everyone_once() {
        let recomposer = Composer::compose_with(app(StateHandle::new()), || 0);
        assert_eq!(
            recomposer.labels(),
            [
                "Parent: 1 render",
                "Child 1: 1 render",
                "Child 2: 1 render",
                "Child 3: 1 render",
                "Child 4: 1 render",
            ]
        );
    }

    #[test]
    fn increment_skips_memo_without_props() {
        let mut recomposer = Composer::compose_with(app(StateHandle::new()), || 0);
        recomposer.update_root_state(|count| *count += 1);
        assert_eq!(
            recomposer.labels(),
            [
                "Parent: 2 renders",
                "Child 1: 2 renders",
                "Child 2: 2 renders",
                "Child 3: 1 render",
                "Child 4: 2 renders",
            ]
        );
    }

    #[test]
    fn child_state_update_only_touches_that_child() {
        let clicks = StateHandle::new();
        let mut recomposer = Composer::compose_with(app(clicks.clone()), || 0);
        clicks.update(|clicks| *clicks += 1).unwrap();
        // the child and its counter
        assert_eq!(recomposer.recompose(), 2);
        assert_eq!(clicks.get().unwrap().get(), 1);
        assert_eq!(recomposer.label("Child 1").unwrap(), "Child 1: 2 renders");
        assert_eq!(recomposer.label("Parent").unwrap(), "Parent: 1 render");
        assert_eq!(recomposer.label("Child 2").unwrap(), "Child 2: 1 render");
        assert_eq!(recomposer.label("Child 4").unwrap(), "Child 4: 1 render");
    }

    #[test]
    fn child_state_survives_parent_updates() {
        let clicks = StateHandle::new();
        let mut recomposer = Composer::compose_with(app(clicks.clone()), || 0);
        clicks.update(|clicks| *clicks += 2).unwrap();
        recomposer.recompose();
        recomposer.update_root_state(|count| *count += 1);
        assert_eq!(clicks.get().unwrap().get(), 2);
        assert_eq!(recomposer.label("Child 1").unwrap(), "Child 1: 3 renders");
    }

    #[test]
    fn forced_update_with_same_count_skips_both_memos() {
        let mut recomposer = Composer::compose_with(app(StateHandle::new()), || 5);
        recomposer.force_update();
        assert_eq!(recomposer.label("Parent").unwrap(), "Parent: 2 renders");
        assert_eq!(recomposer.label("Child 3").unwrap(), "Child 3: 1 render");
        assert_eq!(recomposer.label("Child 4").unwrap(), "Child 4: 1 render");
    }
}
