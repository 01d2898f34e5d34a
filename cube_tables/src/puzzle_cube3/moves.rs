use super::coords::Coord;
use super::cubie::{CubieCube, MOVE_CUBES};
use super::utils::N_MOVES;

/// Move table of a raw coordinate: the coordinate after each move of a move set, for every coordinate value.
///
/// The move set is given by a move map: the standard indices (`3 * axis + power`) of its moves.
/// Columns are indexed by positions in the map, called local moves.
pub struct MoveTable {
    name: &'static str,
    next: Box<[u16]>,
    move_map: Box<[u8]>,
}

impl MoveTable {
    /// Builds the move table of the coordinate `C` over the moves listed in `move_map`.
    pub fn build<C: Coord>(move_map: &[u8]) -> Self {
        assert!(move_map.iter().all(|&m| (m as usize) < N_MOVES));
        let moves: Vec<&CubieCube> = move_map.iter().map(|&m| &MOVE_CUBES[m as usize]).collect();
        let mut next = Vec::with_capacity(C::N * moves.len());
        for index in 0..C::N {
            let c = C::cube(index as u16);
            next.extend(moves.iter().map(|&m| C::get(&c.multiply(m))));
        }
        Self { name: C::NAME, next: next.into_boxed_slice(), move_map: move_map.into() }
    }

    /// Returns the coordinate after applying local move `m` to `index`.
    #[inline(always)] pub fn apply(&self, index: u16, m: u8) -> u16 {
        assert!((m as usize) < self.move_map.len(), "{}: move {} out of range", self.name, m);
        self.next[index as usize * self.move_map.len() + m as usize]
    }

    /// Applies the local moves of `moves` in order.
    pub fn apply_all(&self, index: u16, moves: &[u8]) -> u16 {
        moves.iter().fold(index, |i, &m| self.apply(i, m))
    }

    /// Number of coordinate values.
    #[inline] pub fn len(&self) -> usize { self.next.len() / self.move_map.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.next.is_empty() }

    /// Number of moves (columns).
    #[inline] pub fn n_moves(&self) -> usize { self.move_map.len() }

    /// Standard indices of the local moves.
    #[inline] pub fn move_map(&self) -> &[u8] { &self.move_map }

    #[inline] pub fn name(&self) -> &'static str { self.name }

    /// Size of the table in bytes.
    #[inline] pub fn size_bytes(&self) -> usize { std::mem::size_of_val(&self.next[..]) }
}
