//! `roundtrip` subcommands.

pub mod inspect;
pub mod run;
