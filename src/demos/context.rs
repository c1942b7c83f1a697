//! Two nested providers around a subtree of context readers.
//!
//! The providers' subtree is memoized, the way stable `children` are, so a
//! provider update does not re-render it by position. Only the units that read
//! the changed value re-render; `Provider` and `NoConsumer` keep their count.

use std::fmt::{self, Display, Formatter};

use crate::{Error, Root, Scope, StateHandle};

pub struct CountProvider;
pub struct ThemeProvider;
pub struct Provider;
pub struct CountConsumer;
pub struct ThemeConsumer;
pub struct BothConsumer;
pub struct NoConsumer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// The two provider states, published on every invocation.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub count: StateHandle<u32>,
    pub theme: StateHandle<Theme>,
}

impl Controls {
    pub fn increment_count(&self) -> Result<(), Error> {
        self.count.update(|count| *count += 1)
    }

    pub fn toggle_theme(&self) -> Result<(), Error> {
        self.theme.update(|theme| *theme = theme.toggled())
    }
}

pub fn app(controls: Controls) -> impl Fn(Scope<Root>) + 'static {
    move |s: Scope<Root>| {
        let controls = controls.clone();
        s.component(move |s: Scope<CountProvider>| {
            let count = s.use_state(|| 0u32);
            controls.count.publish(count);
            s.provide(Count(count.get()));
            let theme_handle = controls.theme.clone();
            s.memo((), move |s: Scope<ThemeProvider>| {
                let theme = s.use_state(|| Theme::Light);
                theme_handle.publish(theme);
                s.provide(theme.get());
                s.memo((), provider);
            });
        });
    }
}

fn provider(s: Scope<Provider>) {
    s.render_counter("Provider");
    s.component(|s: Scope<CountConsumer>| {
        let count = s.use_context::<Count>().map_or(0, |count| count.0);
        s.render_counter(format!("CountConsumer ({count})"));
    });
    s.component(|s: Scope<ThemeConsumer>| {
        let theme = s.use_context::<Theme>().unwrap_or(Theme::Light);
        s.render_counter(format!("ThemeConsumer ({theme})"));
    });
    s.component(|s: Scope<BothConsumer>| {
        let count = s.use_context::<Count>().map_or(0, |count| count.0);
        let theme = s.use_context::<Theme>().unwrap_or(Theme::Light);
        s.render_counter(format!("BothConsumer ({count}, {theme})"));
    });
    s.component(|s: Scope<NoConsumer>| {
        s.render_counter("NoConsumer");
    });
}
