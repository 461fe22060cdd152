use anyhow::Context;
use clap::*;
use itertools::Itertools;
use nwkgraft::libs::phylo::{graft, DuplicatePolicy, GraftOptions, PlacementMap, Tree};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("graft")
        .about("Graft placed taxa onto a backbone tree")
        .after_help(
            r###"
Inserts query taxa into a backbone Newick tree at the anchors reported by a
placement tool.

Notes:
* <placements> has one placement per line, whitespace separated:
  <taxon> <anchor> [ignored...]
* An anchor is the label of a leaf or of an internal node of the backbone.
* For an anchor below the root, a new node named `<prefix><anchor>` takes the
  anchor's place; it holds the anchor's subtree followed by the placed taxa.
* Taxa placed at the root become extra children of the root.
* Anchors not found in the backbone are ignored.
* A line with fewer than two tokens aborts the run and nothing is written.
* `--on-duplicate` decides what happens to a placed taxon whose name is
  already in the tree:
    * reject (default): abort
    * dedupe:           drop the placement
    * allow:            add it anyway
* An anchor naming more than one node aborts the run, unless
  `--allow-ambiguous` is set.

Examples:
1. Graft and write to a file:
   nwkgraft graft backbone.nwk placements.txt grafted.nwk

2. Name graft points `G_<anchor>` and keep going on duplicate names:
   nwkgraft graft backbone.nwk placements.txt --prefix G_ --on-duplicate dedupe

"###,
        )
        .arg(
            Arg::new("backbone")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Backbone tree in Newick format. [stdin] for standard input"),
        )
        .arg(
            Arg::new("placements")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Placement file: <taxon> <anchor> per line"),
        )
        .arg(
            Arg::new("outfile")
                .num_args(1)
                .index(3)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .num_args(1)
                .default_value("P")
                .help("Prefix of graft point names"),
        )
        .arg(
            Arg::new("on-duplicate")
                .long("on-duplicate")
                .action(ArgAction::Set)
                .value_parser([
                    builder::PossibleValue::new("reject"),
                    builder::PossibleValue::new("dedupe"),
                    builder::PossibleValue::new("allow"),
                ])
                .default_value("reject")
                .help("What to do with placed taxa already in the tree"),
        )
        .arg(
            Arg::new("allow-ambiguous")
                .long("allow-ambiguous")
                .action(ArgAction::SetTrue)
                .help("Graft at every node carrying an anchor label"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .num_args(1)
                .help("Indentation string for pretty output, e.g. '  '. One line when omitted"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Report progress to stderr"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("backbone").unwrap();
    let placement_file = args.get_one::<String>("placements").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let indent = args
        .get_one::<String>("indent")
        .map(|s| s.as_str())
        .unwrap_or("");
    let is_verbose = args.get_flag("verbose");

    let opts = GraftOptions {
        prefix: args.get_one::<String>("prefix").unwrap().to_string(),
        on_duplicate: args
            .get_one::<String>("on-duplicate")
            .unwrap()
            .parse::<DuplicatePolicy>()
            .map_err(anyhow::Error::msg)?,
        allow_ambiguous: args.get_flag("allow-ambiguous"),
    };

    //----------------------------
    // Ops
    //----------------------------
    // A malformed placement file stops the run before the tree is read
    let placements = PlacementMap::from_file(placement_file)?;
    if is_verbose {
        eprintln!(
            "==> {} placements on {} anchors",
            placements.num_placements(),
            placements.len()
        );
        eprintln!(
            "==> Largest: {}",
            placements
                .counts_desc()
                .iter()
                .take(10)
                .map(|(anchor, count)| format!("{}={}", anchor, count))
                .join(" ")
        );
    }

    let mut tree = Tree::from_file(infile)?;
    if is_verbose {
        eprintln!(
            "==> Backbone: {} nodes, {} leaves",
            tree.len(),
            tree.get_leaves().len()
        );
    }

    let report = graft(&mut tree, &placements, &opts)
        .with_context(|| format!("could not graft {} onto {}", placement_file, infile))?;

    if is_verbose {
        eprintln!(
            "==> Grafted {} leaves at {} anchors, {} graft points",
            report.leaves_added, report.anchors_matched, report.graft_points
        );
        if !report.skipped.is_empty() {
            eprintln!(
                "==> Skipped {} duplicated taxa: {}",
                report.skipped.len(),
                report.skipped.iter().join(" ")
            );
        }
        if !report.unmatched.is_empty() {
            eprintln!(
                "==> {} anchors not found: {}",
                report.unmatched.len(),
                report.unmatched.iter().join(" ")
            );
        }
    }

    //----------------------------
    // Output
    //----------------------------
    let out_string = tree.to_newick_with_format(indent) + "\n";
    nwkgraft::write_atomic(outfile, &out_string)?;

    Ok(())
}
