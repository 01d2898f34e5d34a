//! The 3x3x3 cube: cubie model, coordinates, move tables and symmetries.

pub mod utils;
pub mod cubie;
pub mod coords;
pub mod moves;
pub mod symmetry;

pub use cubie::CubieCube;
pub use coords::Coord;
pub use moves::MoveTable;
pub use symmetry::{ConjTable, SymCoord, SymCoordTable, SymGroup, SymTables};
