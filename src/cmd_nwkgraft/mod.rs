//! Subcommand modules for the `nwkgraft` binary.

pub mod graft;
pub mod placements;
