use clap::{Arg, Command, arg, value_parser};

pub use asmbin_tracks::consts::*;

pub fn create_depth_cli() -> Command {
    Command::new(DEPTH_CMD)
        .about("Print a depth track for one contig as bedGraph-like rows.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("placements")
                .required(true)
                .help("Placement file (BED-like, may be gzipped, - for stdin)"),
        )
        .arg(arg!(-c --contig <contig> "Contig to report").required(true))
        .arg(
            arg!(-s --start <start> "Start of the region, 0-based (defaults to the contig extent)")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            arg!(-e --end <end> "End of the region, exclusive (defaults to the contig extent)")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            arg!(-r --resolution <resolution> "Bases per output value")
                .value_parser(value_parser!(f64))
                .default_value("1"),
        )
        .arg(
            arg!(-t --track <track> "Track type: depth (sequences) or anno (annotations)")
                .default_value("depth"),
        )
        .arg(arg!(--config <config> "TOML file with bin and track settings"))
}
