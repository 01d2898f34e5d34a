use arrayvec::ArrayVec;

/// Number of face turns: 6 axes (U, R, F, D, L, B) times 3 powers (quarter, half, inverse quarter).
pub const N_MOVES: usize = 18;

/// Number of moves that keep the cube in the phase-2 subgroup <U, D, R2, F2, L2, B2>.
pub const N_MOVES2: usize = 10;

/// Standard move indices (`3 * axis + power`) of the phase-2 moves, in phase-2 index order.
pub const P2_MOVES: [u8; N_MOVES2] = [0, 1, 2, 4, 7, 9, 10, 11, 13, 16];

/// Identity move map of the 18 face turns.
pub const ALL_MOVES: [u8; N_MOVES] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17];

pub const N_TWIST: usize = 2187;
pub const N_FLIP: usize = 2048;
pub const N_SLICE: usize = 495;
pub const N_SLICE_SORTED: usize = N_SLICE * 24;
pub const N_PERM: usize = 40320;
pub const N_MPERM: usize = 24;

/// Number of cube symmetries that preserve the U-D axis.
pub const N_SYM: usize = 16;

/// Size of the subgroup of symmetries with an even power of the U4 rotation.
pub const N_SYM8: usize = 8;

/// Members (indices into the 16 symmetries) of the 8-element subgroup used by phase-1 coordinates.
pub const SYM8: [u8; N_SYM8] = [0, 1, 4, 5, 8, 9, 12, 13];

/// Number of twist classes under `SYM8`.
pub const N_TWIST_SYM: usize = 324;
/// Number of flip classes under `SYM8`.
pub const N_FLIP_SYM: usize = 336;
/// Number of corner (or phase-2 edge) permutation classes under all 16 symmetries.
pub const N_PERM_SYM: usize = 2768;

/// Returns the standard index of the move that undoes the standard move `m`.
#[inline] pub fn inverse_move(m: u8) -> u8 {
    assert!((m as usize) < N_MOVES, "move {} out of range", m);
    m - m % 3 + 2 - m % 3
}

/// Returns the position of `x` in `map` (e.g. the local index of a standard move in a move map), if it is there.
#[inline] pub fn position_in(map: &[u8], x: u8) -> Option<u8> {
    map.iter().position(|&v| v == x).map(|i| i as u8)
}

/// Returns binomial coefficient `n` over `k`, or `0` if `n < k`.
pub fn cnk(n: u16, k: u16) -> u16 {
    if n < k { return 0; }
    let k = k.min(n - k);
    let mut result = 1u32;
    for i in 0..k as u32 {
        result = result * (n as u32 - i) / (i + 1);
    }
    result as u16
}

/// Returns the rank (in lexicographic order) of `perm`, which must hold distinct values `0..perm.len()`.
pub fn perm_to_index(perm: &[u8]) -> u16 {
    let n = perm.len();
    let mut index = 0u32;
    for i in 0..n {
        let smaller = perm[i+1..].iter().filter(|&&v| v < perm[i]).count() as u32;
        index = index * (n - i) as u32 + smaller;
    }
    index as u16
}

/// Writes to `perm` the permutation of `0..perm.len()` with the given lexicographic `index`.
pub fn index_to_perm(mut index: u16, perm: &mut [u8]) {
    let n = perm.len();
    let mut digits = [0u8; 12];
    for i in (0..n).rev() {
        let radix = (n - i) as u16;
        digits[i] = (index % radix) as u8;
        index /= radix;
    }
    let mut available: ArrayVec<u8, 12> = (0..n as u8).collect();
    for (slot, digit) in perm.iter_mut().zip(digits) {
        *slot = available.remove(digit as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnk() {
        assert_eq!(cnk(12, 4), 495);
        assert_eq!(cnk(11, 4), 330);
        assert_eq!(cnk(3, 4), 0);
        assert_eq!(cnk(0, 0), 1);
        assert_eq!(cnk(8, 1), 8);
    }

    #[test]
    fn test_perm_index_4() {
        let mut perm = [0u8; 4];
        for index in 0..24 {
            index_to_perm(index, &mut perm);
            assert_eq!(perm_to_index(&perm), index);
        }
        index_to_perm(0, &mut perm);
        assert_eq!(perm, [0, 1, 2, 3]);
        index_to_perm(23, &mut perm);
        assert_eq!(perm, [3, 2, 1, 0]);
        assert_eq!(perm_to_index(&[1, 0, 2, 3]), 6);
    }

    #[test]
    fn test_inverse_move() {
        assert_eq!(inverse_move(0), 2);
        assert_eq!(inverse_move(1), 1);
        assert_eq!(inverse_move(2), 0);
        assert_eq!(inverse_move(16), 16);
        assert_eq!(inverse_move(17), 15);
        for &m in P2_MOVES.iter() {
            assert!(position_in(&P2_MOVES, inverse_move(m)).is_some());
        }
    }
}
