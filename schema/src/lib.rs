// Pokemon Companion Schema - Shared type definitions
// This crate holds the static data the companion works with: the elemental
// types and their matchup table, and the immutable creature records fetched
// from upstream. It has no I/O and no async code.

pub use creature::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod creature;
pub mod pokemon_types;
pub mod species_data;
