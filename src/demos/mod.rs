//! Pages that put render counters next to common re-render patterns.

pub mod basics;
pub mod context;
pub mod keys;
pub mod memo;
pub mod props;

use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Basics,
    Props,
    Context,
    Memo,
    Keys,
}

impl FromStr for Demo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basics" => Ok(Demo::Basics),
            "props" => Ok(Demo::Props),
            "context" => Ok(Demo::Context),
            "memo" => Ok(Demo::Memo),
            "keys" => Ok(Demo::Keys),
            other => Err(Error::UnknownDemo(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_names() {
        assert_eq!("basics".parse::<Demo>(), Ok(Demo::Basics));
        assert_eq!("keys".parse::<Demo>(), Ok(Demo::Keys));
        assert_eq!("context".parse::<Demo>(), Ok(Demo::Context));
        assert_eq!("memo".parse::<Demo>(), Ok(Demo::Memo));
        assert_eq!(
            "profiler".parse::<Demo>(),
            Err(Error::UnknownDemo("profiler".into()))
        );
    }
}
