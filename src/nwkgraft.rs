extern crate clap;
use clap::*;

mod cmd_nwkgraft;

fn main() -> anyhow::Result<()> {
    let app = Command::new("nwkgraft")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`nwkgraft` - Graft placed taxa onto a backbone Newick tree")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_nwkgraft::graft::make_subcommand())
        .subcommand(cmd_nwkgraft::placements::make_subcommand())
        .after_help(
            r###"Subcommands:

* graft      - Attach placed taxa to their anchors in a backbone tree
* placements - Summarize a placement file by anchor

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("graft", sub_matches)) => cmd_nwkgraft::graft::execute(sub_matches),
        Some(("placements", sub_matches)) => cmd_nwkgraft::placements::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
