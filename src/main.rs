mod config;
mod ingest;
mod logging;
mod models;
mod routes;
mod run;
mod snapshot;
mod summary;
mod ui;

use anyhow::Result;

use logging::LogTarget;
use routes::Route;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let tui_route = match args.get(1).map(String::as_str) {
        None => Some(Route::Overview),
        Some("open") => Some(Route::parse(args.get(2).map_or("/", String::as_str))),
        Some(_) => None,
    };

    let target = if tui_route.is_some() {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    // Held until exit so the file writer flushes
    let _guard = match logging::init(target) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    };

    let config = config::load_or_default();

    match tui_route {
        Some(route) => run::as_tui(config, &route),
        None => run::as_cli(&args, &config),
    }
}
