mod loc;
pub use loc::Loc;

mod counter;
pub use counter::{advance, render_label, RenderCount};

mod probe;
pub use probe::RenderCounter;

mod error;
pub use error::Error;

mod composer;
pub use composer::{Composer, ProbeOutput};

mod recomposer;
pub use recomposer::Recomposer;

mod state;
pub use state::{State, StateHandle};

mod shared;
pub use shared::Shared;

mod scope;
pub use scope::{Counter, Root, Scope, ScopeId};

pub mod demos;
pub mod utils;

mod map;
