use std::env;
use std::process::ExitCode;

use render_probe::demos::keys::{self, KeyStrategy, ListState};
use render_probe::demos::memo::{self, Variant};
use render_probe::demos::{basics, context, props, Demo};
use render_probe::{Composer, Error, Recomposer, StateHandle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn show<S: 'static>(step: &str, recomposer: &Recomposer<S>) {
    println!("{step}");
    for label in recomposer.labels() {
        println!("  {label}");
    }
}

fn run_basics() -> Result<(), Error> {
    let clicks = StateHandle::new();
    let mut recomposer = Composer::compose_with(basics::app(clicks.clone()), || 0);
    show("mount", &recomposer);

    recomposer.update_root_state(|count| *count += 1);
    show("increment parent count", &recomposer);

    clicks.update(|clicks| *clicks += 1)?;
    recomposer.recompose();
    show("increment child state", &recomposer);
    Ok(())
}

fn run_props() -> Result<(), Error> {
    let controls = props::Controls::default();
    let mut recomposer = Composer::compose(props::app(controls.clone()));
    show("mount", &recomposer);

    controls.update_count()?;
    recomposer.recompose();
    show("update count", &recomposer);

    controls.toggle_name()?;
    recomposer.recompose();
    show("toggle name", &recomposer);
    Ok(())
}

fn run_context() -> Result<(), Error> {
    let controls = context::Controls::default();
    let mut recomposer = Composer::compose(context::app(controls.clone()));
    show("mount", &recomposer);

    controls.increment_count()?;
    recomposer.recompose();
    show("increment count", &recomposer);

    controls.toggle_theme()?;
    recomposer.recompose();
    show("toggle theme", &recomposer);
    Ok(())
}

fn run_memo(variant: Variant) -> Result<(), Error> {
    let controls = memo::Controls::default();
    let mut recomposer = Composer::compose(memo::app(variant, controls.clone()));
    show("mount", &recomposer);

    controls.increment()?;
    recomposer.recompose();
    show("increment count", &recomposer);

    controls.remove("Banana")?;
    recomposer.recompose();
    show("remove Banana", &recomposer);
    Ok(())
}

fn run_keys(strategy: KeyStrategy) -> Result<(), Error> {
    let mut recomposer = Composer::compose_with(keys::app(strategy), || {
        ListState::new(["Apple", "Banana", "Cherry"])
    });
    show("mount", &recomposer);

    recomposer.update_root_state(|list| {
        list.prepend("Date");
    });
    show("prepend Date", &recomposer);

    recomposer.update_root_state(|list| {
        list.remove(2);
    });
    show("remove Banana", &recomposer);
    Ok(())
}

fn run() -> Result<(), Error> {
    let mut args = env::args().skip(1);
    let demo = args.next().as_deref().unwrap_or("basics").parse::<Demo>()?;
    info!(?demo, "running demo");
    match demo {
        Demo::Basics => run_basics(),
        Demo::Props => run_props(),
        Demo::Context => run_context(),
        Demo::Memo => {
            let variant = args
                .next()
                .as_deref()
                .unwrap_or("optimized")
                .parse::<Variant>()?;
            info!(?variant, "memo variant");
            run_memo(variant)
        }
        Demo::Keys => {
            let strategy = args
                .next()
                .as_deref()
                .unwrap_or("stable")
                .parse::<KeyStrategy>()?;
            info!(?strategy, "key strategy");
            run_keys(strategy)
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
