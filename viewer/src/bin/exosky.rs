use anyhow::{Context, Result};
use catalogs::search_planets;
use clap::Parser;
use log::info;
use skyview::Session;
use viewer::app;
use viewer::cli::{Cli, Command, ViewArgs};
use viewer::config::ViewerConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = ViewerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search { query } => search(&config, query.as_deref().unwrap_or("")),
        Command::Info { name } => {
            let details = app::archive(&config).planet_details(&name)?;
            println!("{details}");
            Ok(())
        }
        Command::View(args) => view(&config, &args),
    }
}

fn search(config: &ViewerConfig, query: &str) -> Result<()> {
    let names = app::archive(config)
        .planet_names()
        .context("Failed to fetch planet names")?;
    let matches = search_planets(&names, query);
    info!("{} of {} planets match '{query}'", matches.len(), names.len());
    for name in matches {
        println!("{name}");
    }
    Ok(())
}

fn view(config: &ViewerConfig, args: &ViewArgs) -> Result<()> {
    let archive = app::archive(config);
    let reference = app::resolve_reference(args, |name| archive.planet_details(name))?;
    let source = app::star_source(args, config)?;

    let mut session = Session::new(
        reference,
        config.session_config(),
        config.view.window_viewport(),
    );
    session.start_loading(source, config.star_field);

    open_window(session)
}

#[cfg(feature = "sdl2")]
fn open_window(session: Session) -> Result<()> {
    viewer::window::run(session)
}

#[cfg(not(feature = "sdl2"))]
fn open_window(session: Session) -> Result<()> {
    anyhow::bail!(
        "exosky was built without the sdl2 feature; cannot open a window for {}",
        session.reference().name
    )
}
