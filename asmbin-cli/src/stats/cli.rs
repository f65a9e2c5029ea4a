use clap::{Arg, Command, arg};

pub use asmbin_binindex::consts::*;

pub fn create_stats_cli() -> Command {
    Command::new(STATS_CMD)
        .about("Summarize the bin tree of every contig and check it for consistency.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("placements")
                .required(true)
                .help("Placement file (BED-like, may be gzipped, - for stdin)"),
        )
        .arg(arg!(--config <config> "TOML file with bin and track settings"))
}
