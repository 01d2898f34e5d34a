#![doc = include_str!("../README.md")]

pub mod error;
pub mod stats;
pub mod pruning;
pub mod raw_sym_prun;
pub mod tables;
pub mod puzzle_cube3;

pub use error::TableError;
pub use tables::{BuildConf, InvDepths, TableSet};
