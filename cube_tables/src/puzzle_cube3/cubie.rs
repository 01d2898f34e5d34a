use std::fmt::{self, Display};

// Corners.
pub const URF: u8 = 0;
pub const UFL: u8 = 1;
pub const ULB: u8 = 2;
pub const UBR: u8 = 3;
pub const DFR: u8 = 4;
pub const DLF: u8 = 5;
pub const DBL: u8 = 6;
pub const DRB: u8 = 7;

// Edges. The last four (`FR..BR`) form the middle (UD) slice.
pub const UR: u8 = 0;
pub const UF: u8 = 1;
pub const UL: u8 = 2;
pub const UB: u8 = 3;
pub const DR: u8 = 4;
pub const DF: u8 = 5;
pub const DL: u8 = 6;
pub const DB: u8 = 7;
pub const FR: u8 = 8;
pub const FL: u8 = 9;
pub const BL: u8 = 10;
pub const BR: u8 = 11;

/// Cube state at the level of individual cubies.
///
/// `cp[i]` is the corner cubie found at position `i` and `co[i]` its orientation.
/// Orientations `0..3` are rotations, `3..6` appear only in mirrored (LR-reflected) elements.
/// Edges are described by `ep` and `eo` in the same way, with orientations `0..2`.
///
/// Composition follows the cube group convention: `a.multiply(&b)` is "first `a`, then `b`".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CubieCube {
    pub cp: [u8; 8],
    pub co: [u8; 8],
    pub ep: [u8; 12],
    pub eo: [u8; 12],
}

impl Default for CubieCube {
    #[inline] fn default() -> Self { Self::SOLVED }
}

impl CubieCube {
    pub const SOLVED: Self = Self {
        cp: [0, 1, 2, 3, 4, 5, 6, 7],
        co: [0; 8],
        ep: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        eo: [0; 12],
    };

    /// Returns the corner part of `self * b`.
    pub fn corner_multiply(&self, b: &Self) -> ([u8; 8], [u8; 8]) {
        let mut cp = [0; 8];
        let mut co = [0; 8];
        for i in 0..8 {
            let from = b.cp[i] as usize;
            cp[i] = self.cp[from];
            let ori_a = self.co[from];
            let ori_b = b.co[i];
            co[i] = match (ori_a < 3, ori_b < 3) {
                (true, true) => { let o = ori_a + ori_b; if o >= 3 { o - 3 } else { o } }
                (true, false) => { let o = ori_a + ori_b; if o >= 6 { o - 3 } else { o } }
                (false, true) => { let o = ori_a + 3 - ori_b; if o >= 6 { o - 3 } else { o } }
                (false, false) => { let o = ori_a + 3 - ori_b; if o >= 3 { o - 3 } else { o } }
            };
        }
        (cp, co)
    }

    /// Returns the edge part of `self * b`.
    pub fn edge_multiply(&self, b: &Self) -> ([u8; 12], [u8; 12]) {
        let mut ep = [0; 12];
        let mut eo = [0; 12];
        for i in 0..12 {
            let from = b.ep[i] as usize;
            ep[i] = self.ep[from];
            eo[i] = (self.eo[from] + b.eo[i]) & 1;
        }
        (ep, eo)
    }

    /// Returns `self * b`.
    pub fn multiply(&self, b: &Self) -> Self {
        let (cp, co) = self.corner_multiply(b);
        let (ep, eo) = self.edge_multiply(b);
        Self { cp, co, ep, eo }
    }

    /// Returns the inverse of `self`, so that `self.multiply(&self.inverse())` is solved.
    pub fn inverse(&self) -> Self {
        let mut result = Self::SOLVED;
        for i in 0..12 {
            result.ep[self.ep[i] as usize] = i as u8;
        }
        for i in 0..12 {
            result.eo[i] = self.eo[result.ep[i] as usize];
        }
        for i in 0..8 {
            result.cp[self.cp[i] as usize] = i as u8;
        }
        for i in 0..8 {
            let ori = self.co[result.cp[i] as usize];
            result.co[i] = if ori >= 3 { ori } else { (3 - ori) % 3 };
        }
        result
    }

    /// Returns the cube obtained by applying the standard move `m` (`3 * axis + power`) to `self`.
    #[inline] pub fn apply_move(&self, m: u8) -> Self {
        self.multiply(&MOVE_CUBES[m as usize])
    }

    /// Returns `true` if every cubie is present once and orientations are within range.
    pub fn is_well_formed(&self) -> bool {
        let mut seen_corners = [false; 8];
        for (&c, &o) in self.cp.iter().zip(self.co.iter()) {
            if c >= 8 || o >= 6 || seen_corners[c as usize] { return false; }
            seen_corners[c as usize] = true;
        }
        let mut seen_edges = [false; 12];
        for (&e, &o) in self.ep.iter().zip(self.eo.iter()) {
            if e >= 12 || o >= 2 || seen_edges[e as usize] { return false; }
            seen_edges[e as usize] = true;
        }
        true
    }
}

impl Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, o) in self.cp.iter().zip(self.co.iter()) { write!(f, "{}:{} ", c, o)?; }
        write!(f, "|")?;
        for (e, o) in self.ep.iter().zip(self.eo.iter()) { write!(f, " {}:{}", e, o)?; }
        Ok(())
    }
}

const fn face_turn(cp: [u8; 8], co: [u8; 8], ep: [u8; 12], eo: [u8; 12]) -> CubieCube {
    CubieCube { cp, co, ep, eo }
}

/// Quarter turns of the faces U, R, F, D, L, B (clockwise).
pub const BASIC_MOVES: [CubieCube; 6] = [
    face_turn([UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB], [0; 8],
              [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR], [0; 12]),
    face_turn([DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR], [2, 0, 0, 1, 1, 0, 0, 2],
              [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR], [0; 12]),
    face_turn([UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB], [1, 2, 0, 0, 2, 1, 0, 0],
              [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR], [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0]),
    face_turn([URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR], [0; 8],
              [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR], [0; 12]),
    face_turn([URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB], [0, 1, 2, 0, 0, 2, 1, 0],
              [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR], [0; 12]),
    face_turn([URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL], [0, 0, 1, 2, 0, 0, 2, 1],
              [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB], [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1]),
];

/// The 18 face turns as cubies, by standard move index.
pub static MOVE_CUBES: [CubieCube; 18] = {
    let mut result = [CubieCube::SOLVED; 18];
    let mut axis = 0;
    while axis < 6 {
        let mut power = 0;
        let mut current = CubieCube::SOLVED;
        while power < 3 {
            current = const_multiply_rotation(&current, &BASIC_MOVES[axis]);
            result[3 * axis + power] = current;
            power += 1;
        }
        axis += 1;
    }
    result
};

/// `a * b` restricted to elements without mirrored corners, usable in constant context.
const fn const_multiply_rotation(a: &CubieCube, b: &CubieCube) -> CubieCube {
    let mut result = CubieCube::SOLVED;
    let mut i = 0;
    while i < 8 {
        let from = b.cp[i] as usize;
        result.cp[i] = a.cp[from];
        result.co[i] = (a.co[from] + b.co[i]) % 3;
        i += 1;
    }
    let mut i = 0;
    while i < 12 {
        let from = b.ep[i] as usize;
        result.ep[i] = a.ep[from];
        result.eo[i] = (a.eo[from] + b.eo[i]) % 2;
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_turn_order() {
        for m in BASIC_MOVES.iter() {
            let mut c = CubieCube::SOLVED;
            for _ in 0..4 { c = c.multiply(m); }
            assert_eq!(c, CubieCube::SOLVED);
            assert!(m.is_well_formed());
        }
    }

    #[test]
    fn test_move_powers() {
        for axis in 0..6 {
            let q = &MOVE_CUBES[3 * axis];
            assert_eq!(q.multiply(q), MOVE_CUBES[3 * axis + 1]);
            assert_eq!(q.inverse(), MOVE_CUBES[3 * axis + 2]);
            assert_eq!(MOVE_CUBES[3 * axis + 2].multiply(q), CubieCube::SOLVED);
        }
    }

    #[test]
    fn test_inverse() {
        let c = CubieCube::SOLVED.apply_move(3).apply_move(7).apply_move(14).apply_move(15);
        assert_eq!(c.multiply(&c.inverse()), CubieCube::SOLVED);
        assert_eq!(c.inverse().multiply(&c), CubieCube::SOLVED);
    }

    #[test]
    fn test_sexy_move_order() {
        // (R U R' U') has order 6.
        let sexy = CubieCube::SOLVED.apply_move(3).apply_move(0).apply_move(5).apply_move(2);
        let mut c = CubieCube::SOLVED;
        for i in 1..=6 {
            c = c.multiply(&sexy);
            assert_eq!(c == CubieCube::SOLVED, i == 6);
        }
    }

    #[test]
    fn test_mirrored_orientation() {
        let mirror = CubieCube { co: [3; 8], ..CubieCube::SOLVED };
        assert_eq!(mirror.multiply(&mirror), CubieCube::SOLVED);
        assert_eq!(mirror.inverse(), mirror);
        let r = &MOVE_CUBES[3];
        let conj = mirror.multiply(r).multiply(&mirror);
        assert!(conj.co.iter().all(|&o| o < 3));
        assert!(conj.is_well_formed());
    }
}
