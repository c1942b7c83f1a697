use std::fmt::{Debug, Display, Formatter, Result};
use std::panic::Location;

/// Source location of a declaration, used as the positional part of an identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Loc {
    location: &'static Location<'static>,
}

impl Loc {
    #[track_caller]
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            location: Location::caller(),
        }
    }
}

impl Default for Loc {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Loc {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.location)
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.location)
    }
}
