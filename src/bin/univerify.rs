use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};
use univerify::app::App;
use univerify::store::Store;
use univerify::{logger, AnyTree, Variant};

/// Document verification registry backed by a directory of JSON files.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// Directory holding one `<doc_id>.json` file per document
    #[clap(long, env = "UNIVERIFY_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    /// Tree that indexes the documents in memory
    #[clap(long, env = "UNIVERIFY_TREE", value_enum, default_value_t = Variant::Splay)]
    tree: Variant,
    /// Enables verbose logging
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(err) = run() {
        log::error!("{:?}", err);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(args.verbose, logger::Mode::Interactive);

    let store = Store::open(&args.data_dir)
        .with_context(|| format!("opening data directory {}", args.data_dir.display()))?;

    let mut app = App::new(store, AnyTree::new(args.tree));
    let loaded = app.preload();
    log::info!(action = "Loaded"; "{loaded} documents into a {} tree", args.tree);

    let stdin = io::stdin();
    app.run(stdin.lock(), io::stdout().lock())
        .context("terminal i/o failed")?;

    Ok(())
}
