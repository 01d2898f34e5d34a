use arrayvec::ArrayVec;
use bitm::{BitAccess, BitVec};

use crate::error::TableError;
use super::coords::Coord;
use super::cubie::*;
use super::moves::MoveTable;
use super::utils::{position_in, N_MOVES, N_SYM, SYM8};

/// Rotation by 180 degrees around the axis through the F and B centers.
pub const S_F2: CubieCube = CubieCube {
    cp: [DLF, DFR, DRB, DBL, UFL, URF, UBR, ULB],
    co: [0; 8],
    ep: [DL, DF, DR, DB, UL, UF, UR, UB, FL, FR, BR, BL],
    eo: [0; 12],
};

/// Rotation by 90 degrees around the axis through the U and D centers.
pub const S_U4: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DRB, DFR, DLF, DBL],
    co: [0; 8],
    ep: [UB, UR, UF, UL, DB, DR, DF, DL, BR, FR, FL, BL],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
};

/// Reflection in the plane between the L and R faces.
pub const S_LR2: CubieCube = CubieCube {
    cp: [UFL, URF, UBR, ULB, DLF, DFR, DRB, DBL],
    co: [3; 8],
    ep: [UL, UF, UR, UB, DL, DF, DR, DB, FL, FR, BR, BL],
    eo: [0; 12],
};

/// The 16 symmetries of the cube that preserve the U-D axis, with their arithmetic.
///
/// Symmetry `s = 8 * f2 + 2 * u4 + lr2` is the cube `S_F2^f2 * S_U4^u4 * S_LR2^lr2`.
/// Conjugating `x` by `s` gives `S * x * S^-1`.
pub struct SymTables {
    pub cubes: [CubieCube; N_SYM],
    /// `inv[s]` is the inverse of `s`.
    pub inv: [u8; N_SYM],
    /// `mult[a][b]` is the product `S_a * S_b`.
    pub mult: [[u8; N_SYM]; N_SYM],
    /// `move_conj[m][s]` is the standard move `S_s * M * S_s^-1`.
    pub move_conj: [[u8; N_SYM]; N_MOVES],
}

impl SymTables {
    pub fn new() -> Self {
        let mut cubes = [CubieCube::SOLVED; N_SYM];
        for (s, cube) in cubes.iter_mut().enumerate() {
            let (f2, u4, lr2) = (s / 8, (s / 2) % 4, s % 2);
            for _ in 0..f2 { *cube = cube.multiply(&S_F2); }
            for _ in 0..u4 { *cube = cube.multiply(&S_U4); }
            if lr2 == 1 { *cube = cube.multiply(&S_LR2); }
        }
        let index_of = |c: &CubieCube| match cubes.iter().position(|s| s == c) {
            Some(s) => s as u8,
            None => unreachable!("symmetries are not closed under multiplication"),
        };
        let mut mult = [[0; N_SYM]; N_SYM];
        let mut inv = [0; N_SYM];
        for a in 0..N_SYM {
            for b in 0..N_SYM {
                mult[a][b] = index_of(&cubes[a].multiply(&cubes[b]));
                if mult[a][b] == 0 { inv[a] = b as u8; }
            }
        }
        let mut move_conj = [[0; N_SYM]; N_MOVES];
        for (m, row) in move_conj.iter_mut().enumerate() {
            for (s, conj) in row.iter_mut().enumerate() {
                let c = cubes[s].multiply(&MOVE_CUBES[m]).multiply(&cubes[inv[s] as usize]);
                *conj = match MOVE_CUBES.iter().position(|mc| *mc == c) {
                    Some(conj_m) => conj_m as u8,
                    None => unreachable!("symmetry {} does not map move {} to a move", s, m),
                };
            }
        }
        Self { cubes, inv, mult, move_conj }
    }

    /// Returns `S * c * S^-1`.
    #[inline] pub fn conjugate(&self, c: &CubieCube, s: u8) -> CubieCube {
        self.cubes[s as usize].multiply(c).multiply(&self.cubes[self.inv[s as usize] as usize])
    }
}

impl Default for SymTables {
    fn default() -> Self { Self::new() }
}

/// Subgroup of the 16 symmetries, with local (`0..len`) indices of its members.
#[derive(Clone)]
pub struct SymGroup {
    members: ArrayVec<u8, N_SYM>,
    cubes: ArrayVec<CubieCube, N_SYM>,
    inv: ArrayVec<u8, N_SYM>,
    mult: ArrayVec<u8, { N_SYM * N_SYM }>,
    move_conj: ArrayVec<u8, { N_SYM * N_MOVES }>,
}

impl SymGroup {
    /// Returns subgroup with the given `members` (global indices, identity first).
    /// Panics if `members` are not closed under multiplication.
    pub fn new(tables: &SymTables, members: &[u8]) -> Self {
        assert_eq!(members.first(), Some(&0), "identity must be the first member");
        let local = |global: u8| match position_in(members, global) {
            Some(s) => s,
            None => panic!("symmetries {:?} do not form a group", members),
        };
        let n = members.len();
        let mut mult = ArrayVec::new();
        for &a in members {
            for &b in members {
                mult.push(local(tables.mult[a as usize][b as usize]));
            }
        }
        let mut move_conj = ArrayVec::new();
        for m in 0..N_MOVES {
            for &s in members { move_conj.push(tables.move_conj[m][s as usize]); }
        }
        Self {
            members: members.iter().copied().collect(),
            cubes: members.iter().map(|&s| tables.cubes[s as usize]).collect(),
            inv: (0..n).map(|a| local(tables.inv[members[a] as usize])).collect(),
            mult,
            move_conj,
        }
    }

    /// All 16 symmetries.
    pub fn full(tables: &SymTables) -> Self {
        let members: ArrayVec<u8, N_SYM> = (0..N_SYM as u8).collect();
        Self::new(tables, &members)
    }

    /// The 8 symmetries with an even power of the U4 rotation.
    pub fn sym8(tables: &SymTables) -> Self { Self::new(tables, &SYM8) }

    #[inline] pub fn len(&self) -> usize { self.members.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.members.is_empty() }

    /// Number of bits needed to store a local symmetry index.
    #[inline] pub fn sym_shift(&self) -> u8 { self.len().next_power_of_two().trailing_zeros() as u8 }

    /// Global indices of the members, by local index.
    #[inline] pub fn members(&self) -> &[u8] { &self.members }

    #[inline] pub fn inv(&self, s: u8) -> u8 { self.inv[s as usize] }

    /// Local index of `S_a * S_b`.
    #[inline] pub fn mult(&self, a: u8, b: u8) -> u8 { self.mult[a as usize * self.len() + b as usize] }

    /// Standard move `S_s * M * S_s^-1` for the standard move `m`.
    #[inline] pub fn move_conj(&self, m: u8, s: u8) -> u8 { self.move_conj[m as usize * self.len() + s as usize] }

    /// Returns `S * c * S^-1` for local symmetry `s`.
    pub fn conjugate(&self, c: &CubieCube, s: u8) -> CubieCube {
        let s = s as usize;
        self.cubes[s].multiply(c).multiply(&self.cubes[self.inv[s] as usize])
    }
}

/// Conjugation table of a raw coordinate over a symmetry group: `conj(x, s)` is the coordinate of `S * x * S^-1`.
pub struct ConjTable {
    name: &'static str,
    conj: Box<[u16]>,
    n_sym: usize,
}

impl ConjTable {
    pub fn build<C: Coord>(group: &SymGroup) -> Self {
        let n_sym = group.len();
        let mut conj = Vec::with_capacity(C::N * n_sym);
        for raw in 0..C::N {
            let c = C::cube(raw as u16);
            conj.extend((0..n_sym as u8).map(|s| C::get(&group.conjugate(&c, s))));
        }
        Self { name: C::NAME, conj: conj.into_boxed_slice(), n_sym }
    }

    #[inline(always)] pub fn apply(&self, raw: u16, s: u8) -> u16 {
        assert!((s as usize) < self.n_sym, "{}: symmetry {} out of range", self.name, s);
        self.conj[raw as usize * self.n_sym + s as usize]
    }

    /// Number of raw coordinate values.
    #[inline] pub fn len(&self) -> usize { self.conj.len() / self.n_sym }

    #[inline] pub fn is_empty(&self) -> bool { self.conj.is_empty() }

    /// Number of symmetries (columns).
    #[inline] pub fn n_sym(&self) -> usize { self.n_sym }

    #[inline] pub fn name(&self) -> &'static str { self.name }

    #[inline] pub fn size_bytes(&self) -> usize { std::mem::size_of_val(&self.conj[..]) }
}

/// Symmetry-reduced coordinate: class and local index of a symmetry `s`
/// such that conjugating the raw coordinate by `s` gives the class representative.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SymCoord {
    pub class: u16,
    pub sym: u8,
}

impl SymCoord {
    #[inline(always)] pub fn pack(self, sym_shift: u8) -> u32 { (self.class as u32) << sym_shift | self.sym as u32 }

    #[inline(always)] pub fn unpack(packed: u32, sym_shift: u8) -> Self {
        Self { class: (packed >> sym_shift) as u16, sym: (packed & ((1 << sym_shift) - 1)) as u8 }
    }
}

/// Symmetry reduction of a raw coordinate: classes, their representatives and self-symmetries,
/// and the move table over classes.
pub struct SymCoordTable {
    name: &'static str,
    group: SymGroup,
    sym_shift: u8,
    raw_to_sym: Box<[u32]>,
    rep: Box<[u16]>,
    self_sym: Box<[u16]>,
    sym_move: Box<[u32]>,
    move_conj: Box<[u8]>,
    n_moves: usize,
}

impl SymCoordTable {
    /// Splits raw coordinate values into classes of `group`, checking that there are `expected` classes.
    ///
    /// Representatives are the smallest raw values of their classes, so class `0` holds the solved state.
    pub fn build(name: &'static str, raw_move: &MoveTable, conj: &ConjTable, group: &SymGroup, expected: usize) -> Result<Self, TableError> {
        let n_raw = raw_move.len();
        if conj.len() != n_raw {
            return Err(TableError::DimensionMismatch { table: name, what: "conjugation table", expected: n_raw, actual: conj.len() });
        }
        if conj.n_sym() != group.len() {
            return Err(TableError::DimensionMismatch { table: name, what: "conjugation table symmetries", expected: group.len(), actual: conj.n_sym() });
        }
        let sym_shift = group.sym_shift();
        let mut occupied = Box::<[u64]>::with_zeroed_bits(n_raw);
        let mut raw_to_sym = vec![0u32; n_raw].into_boxed_slice();
        let mut rep = Vec::with_capacity(expected);
        let mut self_sym = Vec::with_capacity(expected);
        for raw in 0..n_raw as u16 {
            if occupied.get_bit(raw as usize) { continue; }
            let class = rep.len() as u16;
            let mut self_mask = 0u16;
            for s in 0..group.len() as u8 {
                let y = conj.apply(raw, s);
                if y == raw { self_mask |= 1 << s; }
                if !occupied.get_bit(y as usize) {
                    occupied.set_bit(y as usize);
                    raw_to_sym[y as usize] = SymCoord { class, sym: group.inv(s) }.pack(sym_shift);
                }
            }
            rep.push(raw);
            self_sym.push(self_mask);
        }
        if rep.len() != expected {
            return Err(TableError::ClassCount { table: name, expected, actual: rep.len() });
        }

        let move_map = raw_move.move_map();
        let n_moves = move_map.len();
        let mut move_conj = Vec::with_capacity(n_moves * group.len());
        for &m in move_map {
            for s in 0..group.len() as u8 {
                move_conj.push(match position_in(move_map, group.move_conj(m, s)) {
                    Some(conj_m) => conj_m,
                    None => panic!("{}: moves {:?} are not closed under symmetry", name, move_map),
                });
            }
        }
        let sym_move = rep.iter()
            .flat_map(|&r| (0..n_moves as u8).map(move |m| raw_move.apply(r, m)))
            .map(|raw| raw_to_sym[raw as usize])
            .collect();
        log::debug!("{name}: {} classes of {n_raw} values under {} symmetries", rep.len(), group.len());
        Ok(Self {
            name, group: group.clone(), sym_shift, raw_to_sym,
            rep: rep.into_boxed_slice(), self_sym: self_sym.into_boxed_slice(),
            sym_move, move_conj: move_conj.into_boxed_slice(), n_moves,
        })
    }

    /// Returns the class of `raw` and a symmetry mapping `raw` to the class representative.
    #[inline(always)] pub fn class_of(&self, raw: u16) -> SymCoord {
        SymCoord::unpack(self.raw_to_sym[raw as usize], self.sym_shift)
    }

    /// Raw coordinate of the representative of `class`.
    #[inline(always)] pub fn rep(&self, class: u16) -> u16 { self.rep[class as usize] }

    /// Bit mask of the local symmetries that map the representative of `class` onto itself.
    #[inline(always)] pub fn self_sym(&self, class: u16) -> u16 { self.self_sym[class as usize] }

    /// Class (with relating symmetry) reached from the representative of `class` by local move `m`.
    #[inline(always)] pub fn sym_move(&self, class: u16, m: u8) -> SymCoord {
        assert!((m as usize) < self.n_moves, "{}: move {} out of range", self.name, m);
        SymCoord::unpack(self.sym_move[class as usize * self.n_moves + m as usize], self.sym_shift)
    }

    /// Local move `S_s * M * S_s^-1` for local move `m` and local symmetry `s`.
    #[inline(always)] pub fn move_conj(&self, m: u8, s: u8) -> u8 {
        self.move_conj[m as usize * self.group.len() + s as usize]
    }

    /// Returns the symmetry coordinate after applying local move `m`, without going through raw values.
    #[inline] pub fn apply_move(&self, coord: SymCoord, m: u8) -> SymCoord {
        let next = self.sym_move(coord.class, self.move_conj(m, coord.sym));
        SymCoord { class: next.class, sym: self.group.mult(next.sym, coord.sym) }
    }

    #[inline] pub fn n_classes(&self) -> usize { self.rep.len() }

    /// Number of raw coordinate values.
    #[inline] pub fn n_raw(&self) -> usize { self.raw_to_sym.len() }

    #[inline] pub fn n_moves(&self) -> usize { self.n_moves }

    #[inline] pub fn group(&self) -> &SymGroup { &self.group }

    #[inline] pub fn sym_shift(&self) -> u8 { self.sym_shift }

    #[inline] pub fn name(&self) -> &'static str { self.name }

    /// Calculate approximate number of bytes occupied by dynamic part of `self`.
    pub fn size_bytes_dyn(&self) -> usize {
        std::mem::size_of_val(&self.raw_to_sym[..]) + std::mem::size_of_val(&self.rep[..])
            + std::mem::size_of_val(&self.self_sym[..]) + std::mem::size_of_val(&self.sym_move[..])
            + std::mem::size_of_val(&self.move_conj[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_cube3::coords::{CPerm, Flip, MPerm, Slice, Twist};
    use crate::puzzle_cube3::utils::{ALL_MOVES, N_FLIP_SYM, N_TWIST_SYM, P2_MOVES};

    #[test]
    fn test_sym_group() {
        let tables = SymTables::new();
        assert_eq!(tables.cubes[0], CubieCube::SOLVED);
        for s in 0..N_SYM {
            assert_eq!(tables.mult[s][tables.inv[s] as usize], 0);
            assert_eq!(tables.mult[0][s] as usize, s);
            assert_eq!(tables.inv[tables.inv[s] as usize] as usize, s);
            assert!(tables.cubes[s].is_well_formed());
        }
        for a in 0..N_SYM { for b in 0..N_SYM { for c in 0..N_SYM {
            assert_eq!(tables.mult[tables.mult[a][b] as usize][c], tables.mult[a][tables.mult[b][c] as usize]);
        }}}
        assert_eq!(tables.cubes[2], S_U4);
        assert_eq!(tables.cubes[8], S_F2);
        assert_eq!(tables.cubes[1], S_LR2);
    }

    #[test]
    fn test_move_conj() {
        let tables = SymTables::new();
        for m in 0..N_MOVES {
            assert_eq!(tables.move_conj[m][0] as usize, m);
            for s in 0..N_SYM {
                let c = tables.move_conj[m][s];
                // U and D turns stay U and D turns.
                assert_eq!(m % 9 < 3, c % 9 < 3);
                // Half turns stay half turns.
                assert_eq!(m % 3 == 1, c % 3 == 1);
                assert_eq!(tables.conjugate(&MOVE_CUBES[m], s as u8), MOVE_CUBES[c as usize]);
            }
        }
        // Mirroring reverses the turn direction.
        assert_eq!(tables.move_conj[0][1], 2);
        // Turning the cube upside down swaps U and D.
        assert_eq!(tables.move_conj[0][8] / 3, 3);
    }

    fn check_group_action<C: Coord>(group: &SymGroup, moves: &[u8]) {
        let conj = ConjTable::build::<C>(group);
        let raw_move = MoveTable::build::<C>(moves);
        let n = group.len() as u8;
        for raw in 0..C::N as u16 {
            assert_eq!(conj.apply(raw, 0), raw);
            for s1 in 0..n {
                let once = conj.apply(raw, s1);
                for s2 in 0..n {
                    assert_eq!(conj.apply(once, s2), conj.apply(raw, group.mult(s2, s1)), "{}", C::NAME);
                }
                for (m, &standard) in moves.iter().enumerate() {
                    let cm = position_in(moves, group.move_conj(standard, s1)).unwrap();
                    assert_eq!(conj.apply(raw_move.apply(raw, m as u8), s1), raw_move.apply(once, cm), "{}", C::NAME);
                }
            }
        }
    }

    #[test]
    fn test_conj_group_action() {
        let tables = SymTables::new();
        check_group_action::<Twist>(&SymGroup::sym8(&tables), &ALL_MOVES);
        check_group_action::<Flip>(&SymGroup::sym8(&tables), &ALL_MOVES);
        check_group_action::<Slice>(&SymGroup::full(&tables), &ALL_MOVES);
        check_group_action::<MPerm>(&SymGroup::full(&tables), &P2_MOVES);
    }

    fn check_classes(table: &SymCoordTable, conj: &ConjTable) {
        assert_eq!(table.class_of(0), SymCoord { class: 0, sym: 0 });
        for raw in 0..table.n_raw() as u16 {
            let sc = table.class_of(raw);
            assert!((sc.class as usize) < table.n_classes());
            assert_eq!(conj.apply(raw, sc.sym), table.rep(sc.class), "{} {}", table.name(), raw);
        }
        let group = table.group();
        for class in 0..table.n_classes() as u16 {
            let rep = table.rep(class);
            assert_eq!(table.class_of(rep), SymCoord { class, sym: 0 });
            let mask = table.self_sym(class);
            assert_eq!(mask & 1, 1);
            for a in 0..group.len() as u8 {
                assert_eq!(mask >> a & 1 == 1, conj.apply(rep, a) == rep);
                for b in 0..group.len() as u8 {
                    if mask >> a & 1 == 1 && mask >> b & 1 == 1 {
                        assert_eq!(mask >> group.mult(a, b) & 1, 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_twist_flip_classes() {
        let tables = SymTables::new();
        let sym8 = SymGroup::sym8(&tables);
        assert_eq!(sym8.members(), &SYM8);
        let twist_conj = ConjTable::build::<Twist>(&sym8);
        let twist = SymCoordTable::build("twist", &MoveTable::build::<Twist>(&ALL_MOVES), &twist_conj, &sym8, N_TWIST_SYM).unwrap();
        check_classes(&twist, &twist_conj);
        let flip_conj = ConjTable::build::<Flip>(&sym8);
        let flip = SymCoordTable::build("flip", &MoveTable::build::<Flip>(&ALL_MOVES), &flip_conj, &sym8, N_FLIP_SYM).unwrap();
        check_classes(&flip, &flip_conj);
        assert_eq!(flip.sym_shift(), 3);
    }

    #[test]
    fn test_cperm_classes_and_apply_move() {
        let tables = SymTables::new();
        let group = SymGroup::full(&tables);
        let conj = ConjTable::build::<CPerm>(&group);
        let raw_move = MoveTable::build::<CPerm>(&ALL_MOVES);
        let table = SymCoordTable::build("cperm", &raw_move, &conj, &group, 2768).unwrap();
        check_classes(&table, &conj);
        assert_eq!(table.sym_shift(), 4);
        let mut raw = 0;
        let mut sc = table.class_of(raw);
        for &m in [3u8, 0, 5, 2, 6, 17, 10, 13, 7, 4, 1, 15, 12, 9, 8, 14, 11, 16].iter().cycle().take(60) {
            raw = raw_move.apply(raw, m);
            sc = table.apply_move(sc, m);
            assert_eq!(sc.class, table.class_of(raw).class);
            assert_eq!(conj.apply(raw, sc.sym), table.rep(sc.class));
        }
    }

    #[test]
    fn test_wrong_class_count() {
        let tables = SymTables::new();
        let sym8 = SymGroup::sym8(&tables);
        let conj = ConjTable::build::<Twist>(&sym8);
        let result = SymCoordTable::build("twist", &MoveTable::build::<Twist>(&ALL_MOVES), &conj, &sym8, 300);
        assert_eq!(result.err(), Some(TableError::ClassCount { table: "twist", expected: 300, actual: 324 }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let tables = SymTables::new();
        let full = SymGroup::full(&tables);
        let conj = ConjTable::build::<Slice>(&full);
        let result = SymCoordTable::build("twist", &MoveTable::build::<Twist>(&ALL_MOVES), &conj, &full, 324);
        assert!(matches!(result, Err(TableError::DimensionMismatch { table: "twist", .. })));
    }

    #[test]
    fn test_sym_coord_pack() {
        let sc = SymCoord { class: 2767, sym: 15 };
        assert_eq!(SymCoord::unpack(sc.pack(4), 4), sc);
        assert_eq!(sc.pack(4), 2767 * 16 + 15);
        let sc = SymCoord { class: 335, sym: 7 };
        assert_eq!(SymCoord::unpack(sc.pack(3), 3), sc);
    }
}
