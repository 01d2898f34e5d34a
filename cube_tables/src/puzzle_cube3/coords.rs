use arrayvec::ArrayVec;

use super::cubie::CubieCube;
use super::utils::{cnk, index_to_perm, perm_to_index, N_FLIP, N_MPERM, N_PERM, N_SLICE, N_SLICE_SORTED, N_TWIST};

/// Maps a part of the cube state to an index in `0..N` and back.
///
/// `get` reads the coordinate of a cube. `set` overwrites the pieces the coordinate describes
/// (the rest of those arrays is reset to the solved arrangement) so that `get` returns `index`.
/// For the solved cube every coordinate equals `0`.
pub trait Coord {
    /// Number of distinct values.
    const N: usize;

    /// Short name used in logs and errors.
    const NAME: &'static str;

    fn get(c: &CubieCube) -> u16;

    fn set(c: &mut CubieCube, index: u16);

    /// Returns the solved cube with its coordinate set to `index`.
    #[inline] fn cube(index: u16) -> CubieCube {
        assert!((index as usize) < Self::N, "{} coordinate {} out of range", Self::NAME, index);
        let mut c = CubieCube::SOLVED;
        Self::set(&mut c, index);
        c
    }
}

/// Orientation of the first 7 corners (base 3); the last one follows from the rest.
pub struct Twist;

impl Coord for Twist {
    const N: usize = N_TWIST;
    const NAME: &'static str = "twist";

    fn get(c: &CubieCube) -> u16 {
        c.co[..7].iter().fold(0, |twist, &o| 3 * twist + o as u16)
    }

    fn set(c: &mut CubieCube, mut index: u16) {
        assert!((index as usize) < Self::N, "twist {} out of range", index);
        let mut sum = 0;
        for i in (0..7).rev() {
            c.co[i] = (index % 3) as u8;
            sum += c.co[i];
            index /= 3;
        }
        c.co[7] = (3 - sum % 3) % 3;
    }
}

/// Orientation of the first 11 edges (base 2); the last one follows from the rest.
pub struct Flip;

impl Coord for Flip {
    const N: usize = N_FLIP;
    const NAME: &'static str = "flip";

    fn get(c: &CubieCube) -> u16 {
        c.eo[..11].iter().fold(0, |flip, &o| 2 * flip + o as u16)
    }

    fn set(c: &mut CubieCube, mut index: u16) {
        assert!((index as usize) < Self::N, "flip {} out of range", index);
        let mut sum = 0;
        for i in (0..11).rev() {
            c.eo[i] = (index & 1) as u8;
            sum += c.eo[i];
            index >>= 1;
        }
        c.eo[11] = sum & 1;
    }
}

/// Positions occupied by the 4 middle-slice edges, ignoring their order.
///
/// Ranked in the combinatorial number system, so that the solved slice has index `0`.
pub struct Slice;

impl Slice {
    /// Writes to `ep` the slice edges `slice_edges` (in order of increasing position) at positions of `index`;
    /// the remaining positions get edges `0..8` in order.
    fn place(ep: &mut [u8; 12], mut index: u16, slice_edges: &[u8; 4]) {
        let mut x = 4;
        let mut other = 0;
        for j in 0..12 {
            let c = cnk(11 - j as u16, x as u16);
            if x > 0 && index >= c {
                ep[j] = slice_edges[4 - x];
                index -= c;
                x -= 1;
            } else {
                ep[j] = other;
                other += 1;
            }
        }
    }
}

impl Coord for Slice {
    const N: usize = N_SLICE;
    const NAME: &'static str = "slice";

    fn get(c: &CubieCube) -> u16 {
        let mut index = 0;
        let mut x = 0;
        for j in (0..12).rev() {
            if c.ep[j] >= 8 {
                x += 1;
                index += cnk(11 - j as u16, x);
            }
        }
        index
    }

    fn set(c: &mut CubieCube, index: u16) {
        assert!((index as usize) < Self::N, "slice {} out of range", index);
        Self::place(&mut c.ep, index, &[8, 9, 10, 11]);
    }
}

/// Positions of the 4 middle-slice edges together with their order: `slice * 24 + permutation`.
pub struct SliceSorted;

impl Coord for SliceSorted {
    const N: usize = N_SLICE_SORTED;
    const NAME: &'static str = "slice_sorted";

    fn get(c: &CubieCube) -> u16 {
        let order: ArrayVec<u8, 4> = c.ep.iter().copied().filter(|&e| e >= 8).collect();
        Slice::get(c) * 24 + perm_to_index(&order)
    }

    fn set(c: &mut CubieCube, index: u16) {
        assert!((index as usize) < Self::N, "slice_sorted {} out of range", index);
        let mut order = [0u8; 4];
        index_to_perm(index % 24, &mut order);
        Slice::place(&mut c.ep, index / 24, &order.map(|e| e + 8));
    }
}

/// Permutation of the 8 corners.
pub struct CPerm;

impl Coord for CPerm {
    const N: usize = N_PERM;
    const NAME: &'static str = "cperm";

    #[inline] fn get(c: &CubieCube) -> u16 { perm_to_index(&c.cp) }

    fn set(c: &mut CubieCube, index: u16) {
        assert!((index as usize) < Self::N, "cperm {} out of range", index);
        index_to_perm(index, &mut c.cp);
    }
}

/// Permutation of the 8 U and D face edges; meaningful when the slice edges stay in the slice.
pub struct EPerm;

impl Coord for EPerm {
    const N: usize = N_PERM;
    const NAME: &'static str = "eperm";

    #[inline] fn get(c: &CubieCube) -> u16 { perm_to_index(&c.ep[..8]) }

    fn set(c: &mut CubieCube, index: u16) {
        assert!((index as usize) < Self::N, "eperm {} out of range", index);
        index_to_perm(index, &mut c.ep[..8]);
        for j in 8..12 { c.ep[j] = j as u8; }
    }
}

/// Permutation of the 4 middle-slice edges within the slice.
pub struct MPerm;

impl Coord for MPerm {
    const N: usize = N_MPERM;
    const NAME: &'static str = "mperm";

    #[inline] fn get(c: &CubieCube) -> u16 { perm_to_index(&c.ep[8..]) }

    fn set(c: &mut CubieCube, index: u16) {
        assert!((index as usize) < Self::N, "mperm {} out of range", index);
        for j in 0..8 { c.ep[j] = j as u8; }
        index_to_perm(index, &mut c.ep[8..]);
        for e in c.ep[8..].iter_mut() { *e += 8; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_bijection<C: Coord>() {
        for index in 0..C::N as u16 {
            let c = C::cube(index);
            assert!(c.is_well_formed(), "{} {}: {}", C::NAME, index, c);
            assert_eq!(C::get(&c), index, "{}", C::NAME);
        }
        assert_eq!(C::get(&CubieCube::SOLVED), 0, "{}", C::NAME);
    }

    #[test] fn test_twist() { check_bijection::<Twist>(); }
    #[test] fn test_flip() { check_bijection::<Flip>(); }
    #[test] fn test_slice() { check_bijection::<Slice>(); }
    #[test] fn test_slice_sorted() { check_bijection::<SliceSorted>(); }
    #[test] fn test_cperm() { check_bijection::<CPerm>(); }
    #[test] fn test_eperm() { check_bijection::<EPerm>(); }
    #[test] fn test_mperm() { check_bijection::<MPerm>(); }

    #[test]
    fn test_orientation_parity() {
        for index in 0..N_TWIST as u16 {
            assert_eq!(Twist::cube(index).co.iter().map(|&o| o as u16).sum::<u16>() % 3, 0);
        }
        for index in 0..N_FLIP as u16 {
            assert_eq!(Flip::cube(index).eo.iter().map(|&o| o as u16).sum::<u16>() % 2, 0);
        }
    }

    #[test]
    fn test_slice_extremes() {
        // All slice edges in the U layer.
        let mut c = CubieCube::SOLVED;
        c.ep = [8, 9, 10, 11, 0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(Slice::get(&c), 494);
        assert_eq!(Slice::cube(494).ep, c.ep);
    }

    #[test]
    fn test_slice_sorted_agrees_with_slice_and_mperm() {
        for index in 0..N_SLICE_SORTED as u16 {
            let c = SliceSorted::cube(index);
            assert_eq!(Slice::get(&c), index / 24);
        }
        for index in 0..N_MPERM as u16 {
            assert_eq!(SliceSorted::get(&MPerm::cube(index)), index);
        }
    }
}
