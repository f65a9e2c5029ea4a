mod depth;
mod loader;
mod stats;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "asmbin";
    pub const BIN_NAME: &str = "asmbin";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Index sequence placements on contigs into growing bin trees and query depth tracks from them.")
        .subcommand_required(true)
        .subcommand(depth::cli::create_depth_cli())
        .subcommand(stats::cli::create_stats_cli())
}

fn main() -> Result<()> {
    env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // DEPTH TRACKS
        //
        Some((depth::cli::DEPTH_CMD, matches)) => {
            depth::handlers::run_depth(matches)?;
        }

        //
        // TREE STATISTICS
        //
        Some((stats::cli::STATS_CMD, matches)) => {
            stats::handlers::run_stats(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
