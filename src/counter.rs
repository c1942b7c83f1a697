use std::fmt::{self, Display, Formatter};

/// Number of times one instance has been invoked since it was mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderCount(u64);

impl RenderCount {
    pub const ZERO: RenderCount = RenderCount(0);

    #[inline(always)]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[inline(always)]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    #[inline(always)]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// `"render"` for exactly one invocation, `"renders"` otherwise.
    #[inline(always)]
    pub const fn unit(self) -> &'static str {
        if self.0 == 1 {
            "render"
        } else {
            "renders"
        }
    }
}

impl Display for RenderCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.unit())
    }
}

impl From<RenderCount> for u64 {
    fn from(count: RenderCount) -> Self {
        count.0
    }
}

pub fn render_label(name: &str, count: RenderCount) -> String {
    format!("{name}: {count}")
}

/// One invocation: bump the stored count and produce the label for the bumped value.
pub fn advance(current: RenderCount, name: &str) -> (RenderCount, String) {
    let next = current.next();
    (next, render_label(name, next))
}
