use std::fmt::{self, Debug, Formatter};

use generational_box::{GenerationalBox, Owner};
use tracing::{trace, warn};

use crate::counter::advance;
use crate::{Error, RenderCount};

/// Handle to one instance's invocation counter.
///
/// The cell lives in the owner it was allocated from, so it is released together
/// with that owner. A counter created for a new instance always starts from zero.
pub struct RenderCounter {
    cell: GenerationalBox<RenderCount>,
}

impl RenderCounter {
    pub fn new_in(owner: &Owner) -> Self {
        Self::from_cell(owner.insert(RenderCount::ZERO))
    }

    #[inline(always)]
    pub(crate) fn from_cell(cell: GenerationalBox<RenderCount>) -> Self {
        Self { cell }
    }

    /// Record one invocation and return the label for it.
    ///
    /// Once the owner is gone the count starts over from zero; the released
    /// cell is never written.
    pub fn render(&self, name: &str) -> String {
        let Ok(mut count) = self.cell.try_write() else {
            warn!(name, "render counter storage was released, starting over");
            return advance(RenderCount::ZERO, name).1;
        };
        let (next, label) = advance(*count, name);
        *count = next;
        trace!(%label, "render");
        label
    }

    /// Invocations recorded so far, or zero once the owner is gone.
    pub fn count(&self) -> RenderCount {
        self.try_count().unwrap_or_default()
    }

    pub fn try_count(&self) -> Result<RenderCount, Error> {
        self.cell
            .try_read()
            .map(|count| *count)
            .map_err(|_| Error::CounterReleased)
    }
}

impl Clone for RenderCounter {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for RenderCounter {}

impl Debug for RenderCounter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCounter")
            .field("count", &self.try_count().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use generational_box::{AnyStorage, UnsyncStorage};
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn counts_each_render() {
        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        assert_eq!(counter.count(), RenderCount::ZERO);
        assert_eq!(counter.render("Child"), "Child: 1 render");
        assert_eq!(counter.render("Child"), "Child: 2 renders");
        assert_eq!(counter.render("Child"), "Child: 3 renders");
        assert_eq!(counter.count().get(), 3);
    }

    #[test]
    fn instances_are_independent() {
        let owner = UnsyncStorage::owner();
        let a = RenderCounter::new_in(&owner);
        let b = RenderCounter::new_in(&owner);
        a.render("A");
        let a_label = a.render("A");
        let b_label = b.render("B");
        assert_eq!(a_label, "A: 2 renders");
        assert_eq!(b_label, "B: 1 render");
    }

    #[test]
    fn copies_share_the_cell() {
        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        let copy = counter;
        counter.render("x");
        assert_eq!(copy.render("x"), "x: 2 renders");
    }

    #[test]
    fn label_may_change_between_renders() {
        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        assert_eq!(counter.render("first"), "first: 1 render");
        assert_eq!(counter.render("second"), "second: 2 renders");
    }

    #[test]
    fn recreated_counter_starts_over() {
        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        counter.render("Child");
        counter.render("Child");
        drop(owner);
        assert_eq!(counter.try_count(), Err(Error::CounterReleased));

        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        assert_eq!(counter.render("Child"), "Child: 1 render");
    }

    #[test]
    #[traced_test]
    fn render_after_owner_dropped_starts_over() {
        let owner = UnsyncStorage::owner();
        let counter = RenderCounter::new_in(&owner);
        counter.render("Child");
        counter.render("Child");
        drop(owner);
        assert_eq!(counter.render("Child"), "Child: 1 render");
        assert_eq!(counter.render("Child"), "Child: 1 render");
        assert_eq!(counter.count(), RenderCount::ZERO);
        assert!(logs_contain("starting over"));
    }
}
