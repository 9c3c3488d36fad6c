use anyhow::{Context, Result};
use clap::Parser;

use kestrel::cli::CliArgs;
use kestrel::config::EditorConfig;
use kestrel::model::AppModel;
use kestrel::runtime::App;
use kestrel::update;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Logging goes to a file; set it up while stderr is still usable
    kestrel::tracing::init();

    let config = EditorConfig::load();
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));

    let mut model = AppModel::new(config, cwd, cols, rows);
    let startup = update::startup(&mut model, args.startup_mode());

    App::new(model).run(startup)
}
