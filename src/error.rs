use thiserror::Error;

use crate::ScopeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0:?} is not mounted")]
    NotMounted(ScopeId),

    #[error("state owned by {0:?} was released when it unmounted")]
    StateReleased(ScopeId),

    #[error("render counter storage was released")]
    CounterReleased,

    #[error("no state has been published to this handle yet")]
    Unpublished,

    #[error("unknown demo `{0}`, expected `basics`, `props`, `context`, `memo` or `keys`")]
    UnknownDemo(String),

    #[error("unknown memo variant `{0}`, expected `pitfall` or `optimized`")]
    UnknownVariant(String),

    #[error("unknown key strategy `{0}`, expected `index`, `stable`, `fresh` or `missing`")]
    UnknownStrategy(String),
}
