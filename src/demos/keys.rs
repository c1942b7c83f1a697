//! A list whose rows carry render counters, keyed four different ways.
//!
//! Keys decide which row instance survives a list update. Index keys (and no
//! keys at all) tie a counter to a position, so prepending shifts every label
//! onto the wrong count. Stable keys follow the item. Fresh keys remount every
//! row on every update.

use std::str::FromStr;

use crate::{Error, Root, Scope, State};

pub struct List;
pub struct Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    Index,
    Stable,
    Fresh,
    Missing,
}

impl FromStr for KeyStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(KeyStrategy::Index),
            "stable" => Ok(KeyStrategy::Stable),
            "fresh" => Ok(KeyStrategy::Fresh),
            "missing" => Ok(KeyStrategy::Missing),
            other => Err(Error::UnknownStrategy(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub items: Vec<Item>,
    /// Bumped on every edit; fresh keys are derived from it.
    pub generation: u64,
}

impl ListState {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let items = names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| Item {
                id,
                name: name.into(),
            })
            .collect();
        Self {
            items,
            generation: 0,
        }
    }

    /// Insert a new item at the front and return its id.
    pub fn prepend<N: Into<String>>(&mut self, name: N) -> u32 {
        let id = self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        self.items.insert(
            0,
            Item {
                id,
                name: name.into(),
            },
        );
        self.generation += 1;
        id
    }

    pub fn remove(&mut self, id: u32) -> Option<Item> {
        let position = self.items.iter().position(|item| item.id == id)?;
        self.generation += 1;
        Some(self.items.remove(position))
    }
}

pub fn app(strategy: KeyStrategy) -> impl Fn(Scope<Root>, State<ListState>) + 'static {
    move |s: Scope<Root>, list: State<ListState>| {
        let list = list.get();
        s.component(move |s: Scope<List>| {
            for (index, item) in list.items.iter().enumerate() {
                let id = item.id;
                let row = move |s: Scope<Row>| {
                    s.render_counter(format!("Item-{id}"));
                };
                match strategy {
                    KeyStrategy::Index => s.key(index, |s| s.component(row)),
                    KeyStrategy::Stable => s.key(id, |s| s.component(row)),
                    KeyStrategy::Fresh => s.key((list.generation, id), |s| s.component(row)),
                    KeyStrategy::Missing => s.component(row),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Composer, Recomposer};

    fn fruit(strategy: KeyStrategy) -> Recomposer<ListState> {
        Composer::compose_with(app(strategy), || {
            ListState::new(["Apple", "Banana", "Cherry"])
        })
    }

    #[test]
    fn parses_strategies() {
        assert_eq!("stable".parse::<KeyStrategy>(), Ok(KeyStrategy::Stable));
        assert_eq!(
            "random".parse::<KeyStrategy>(),
            Err(Error::UnknownStrategy("random".into()))
        );
    }

    #[test]
    fn stable_keys_follow_items() {
        let mut recomposer = fruit(KeyStrategy::Stable);
        recomposer.update_root_state(|list| {
            list.prepend("Date");
        });
        assert_eq!(
            recomposer.labels(),
            [
                "Item-4: 1 render",
                "Item-1: 2 renders",
                "Item-2: 2 renders",
                "Item-3: 2 renders",
            ]
        );
    }

    #[test]
    fn index_keys_follow_positions() {
        let mut recomposer = fruit(KeyStrategy::Index);
        recomposer.update_root_state(|list| {
            list.prepend("Date");
        });
        assert_eq!(
            recomposer.labels(),
            [
                "Item-4: 2 renders",
                "Item-1: 2 renders",
                "Item-2: 2 renders",
                "Item-3: 1 render",
            ]
        );
    }

    #[test]
    fn missing_keys_behave_like_index_keys() {
        let mut index = fruit(KeyStrategy::Index);
        let mut missing = fruit(KeyStrategy::Missing);
        index.update_root_state(|list| {
            list.prepend("Date");
        });
        missing.update_root_state(|list| {
            list.prepend("Date");
        });
        assert_eq!(index.labels(), missing.labels());
    }

    #[test]
    fn fresh_keys_remount_every_row() {
        let mut recomposer = fruit(KeyStrategy::Fresh);
        let mounted = recomposer.with_composer(|c| c.mounted_count());
        for _ in 0..3 {
            recomposer.update_root_state(|list| list.generation += 1);
        }
        assert!(recomposer
            .labels()
            .iter()
            .all(|label| label.ends_with(": 1 render")));
        assert_eq!(recomposer.with_composer(|c| c.mounted_count()), mounted);
    }

    #[test]
    fn stable_keys_survive_removal() {
        let mut recomposer = fruit(KeyStrategy::Stable);
        recomposer.update_root_state(|list| {
            list.remove(1);
        });
        assert_eq!(
            recomposer.labels(),
            ["Item-2: 2 renders", "Item-3: 2 renders"]
        );
    }
}
