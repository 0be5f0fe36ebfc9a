use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use mat2json::config::ServeConfig;
use mat2json::server::StaticServer;

fn cli() -> Command {
    Command::new("serve")
        .version(clap::crate_version!())
        .about("Serve the web app locally with permissive CORS headers")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("TCP port to listen on")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("root")
                .short('d')
                .long("root")
                .help("Directory to serve (defaults to the current directory)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no_browser")
                .long("no-browser")
                .help("Do not open the page in the default browser")
                .action(ArgAction::SetTrue),
        )
}

fn config_from(matches: &ArgMatches) -> ServeConfig {
    let mut config = ServeConfig::default();
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config.root = root.clone();
    }
    config.open_browser = !matches.get_flag("no_browser");
    config
}

fn main() -> Result<()> {
    mat2json::logging::init();

    let config = config_from(&cli().get_matches());
    if !config.root.is_dir() {
        anyhow::bail!("{} is not a directory", config.root.display());
    }

    let server = StaticServer::bind(&config).context("starting server")?;
    let url = config.page_url(server.port().unwrap_or(config.port));

    println!("Starting server at {url}");
    println!("Serving files from {}", server.root().display());
    println!("Press Ctrl+C to stop the server");

    if config.open_browser {
        println!("\nOpening browser...");
        if let Err(e) = webbrowser::open(&url) {
            log::warn!("could not open a browser: {e}");
        }
    }

    server.run();
    Ok(())
}
