mod app;
mod console;
mod menus;
mod render;
mod saves;

use anyhow::Result;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the game transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("Starting Crystal Quest");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = console::Console::new(stdin.lock(), stdout.lock());
    let mut app = app::App::new(console, render::Palette::detect(), saves::SaveStore::new(saves::SAVE_DIR));
    app.run()
}
