use clap::*;
use nwkgraft::libs::phylo::PlacementMap;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("placements")
        .about("Count placements per anchor")
        .after_help(
            r###"
Reads a placement file and prints `<anchor>\t<count>` lines, the anchors with
the most placed taxa first. Anchors with equal counts keep their input order.

The file is checked the same way `nwkgraft graft` checks it: a line with fewer
than two tokens is an error.

Examples:
1. The 10 busiest anchors:
   nwkgraft placements placements.txt --max 10

2. Every anchor:
   nwkgraft placements placements.txt --max 0

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Placement file. [stdin] for standard input"),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .num_args(1)
                .default_value("200")
                .value_parser(value_parser!(usize))
                .help("Print at most this many anchors. 0 for all"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let opt_max = *args.get_one::<usize>("max").unwrap();
    let mut writer = nwkgraft::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let placements = PlacementMap::from_file(infile)?;

    let counts = placements.counts_desc();
    let limit = if opt_max == 0 { counts.len() } else { opt_max };

    for (anchor, count) in counts.iter().take(limit) {
        writer.write_fmt(format_args!("{}\t{}\n", anchor, count))?;
    }
    writer.flush()?;

    Ok(())
}
