use std::sync::OnceLock;
use std::thread::ScopedJoinHandle;

use crate::error::TableError;
use crate::puzzle_cube3::coords::{Coord, CPerm, EPerm, Flip, MPerm, Slice, SliceSorted, Twist};
use crate::puzzle_cube3::moves::MoveTable;
use crate::puzzle_cube3::symmetry::{ConjTable, SymCoord, SymCoordTable, SymGroup, SymTables};
use crate::puzzle_cube3::utils::*;
use crate::raw_sym_prun::{RawSymPrun, RawSymPrunConf};
use crate::stats::{BuildStatsCollector, LayerLogger};

/// Depths from which each pruning table is filled backward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InvDepths {
    pub slice_twist: u8,
    pub slice_flip: u8,
    pub twist_flip: u8,
    pub meperm: u8,
    pub mcperm: u8,
}

impl Default for InvDepths {
    fn default() -> Self {
        Self { slice_twist: 6, slice_flip: 6, twist_flip: 6, meperm: 7, mcperm: 10 }
    }
}

/// Configuration of building a [`TableSet`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BuildConf {
    /// Whether to build the pruning tables on separate threads.
    pub parallel: bool,
    /// Whether to build the (largest) twist-flip pruning table.
    pub twist_flip_prun: bool,
    pub inv_depth: InvDepths,
}

impl Default for BuildConf {
    fn default() -> Self {
        Self { parallel: true, twist_flip_prun: true, inv_depth: Default::default() }
    }
}

/// Returns move table and conjugation table (over all 16 symmetries) of the slice coordinate.
pub fn init_slice_move_conj(sym16: &SymGroup) -> (MoveTable, ConjTable) {
    (MoveTable::build::<Slice>(&ALL_MOVES), ConjTable::build::<Slice>(sym16))
}

pub fn init_slice_sorted_move() -> MoveTable { MoveTable::build::<SliceSorted>(&ALL_MOVES) }

pub fn init_flip_move() -> MoveTable { MoveTable::build::<Flip>(&ALL_MOVES) }

pub fn init_twist_move() -> MoveTable { MoveTable::build::<Twist>(&ALL_MOVES) }

pub fn init_cperm_move() -> MoveTable { MoveTable::build::<CPerm>(&ALL_MOVES) }

/// The U and D edge permutation is only defined in phase 2, so its table covers phase-2 moves.
pub fn init_eperm_move() -> MoveTable { MoveTable::build::<EPerm>(&P2_MOVES) }

/// Returns phase-2 move table and conjugation table (over all 16 symmetries) of the M-slice permutation.
pub fn init_mperm_move_conj(sym16: &SymGroup) -> (MoveTable, ConjTable) {
    (MoveTable::build::<MPerm>(&P2_MOVES), ConjTable::build::<MPerm>(sym16))
}

/// Returns conjugation table of the twist over `sym8` and its symmetry reduction.
pub fn init_twist_sym(twist_move: &MoveTable, sym8: &SymGroup) -> Result<(ConjTable, SymCoordTable), TableError> {
    let conj = ConjTable::build::<Twist>(sym8);
    let sym = SymCoordTable::build(Twist::NAME, twist_move, &conj, sym8, N_TWIST_SYM)?;
    Ok((conj, sym))
}

/// Returns conjugation table of the flip over `sym8` and its symmetry reduction.
pub fn init_flip_sym(flip_move: &MoveTable, sym8: &SymGroup) -> Result<(ConjTable, SymCoordTable), TableError> {
    let conj = ConjTable::build::<Flip>(sym8);
    let sym = SymCoordTable::build(Flip::NAME, flip_move, &conj, sym8, N_FLIP_SYM)?;
    Ok((conj, sym))
}

pub fn init_cperm_sym(cperm_move: &MoveTable, sym16: &SymGroup) -> Result<(ConjTable, SymCoordTable), TableError> {
    let conj = ConjTable::build::<CPerm>(sym16);
    let sym = SymCoordTable::build(CPerm::NAME, cperm_move, &conj, sym16, N_PERM_SYM)?;
    Ok((conj, sym))
}

pub fn init_eperm_sym(eperm_move: &MoveTable, sym16: &SymGroup) -> Result<(ConjTable, SymCoordTable), TableError> {
    let conj = ConjTable::build::<EPerm>(sym16);
    let sym = SymCoordTable::build(EPerm::NAME, eperm_move, &conj, sym16, N_PERM_SYM)?;
    Ok((conj, sym))
}

/// Move, conjugation and symmetry tables of all coordinates.
pub struct CoordTables {
    pub sym: SymTables,
    pub sym8: SymGroup,
    pub sym16: SymGroup,

    pub twist_move: MoveTable,
    pub flip_move: MoveTable,
    pub slice_move: MoveTable,
    pub slice_sorted_move: MoveTable,
    pub cperm_move: MoveTable,
    pub eperm_move: MoveTable,
    pub mperm_move: MoveTable,

    pub twist_conj: ConjTable,
    pub flip_conj: ConjTable,
    pub slice_conj: ConjTable,
    pub cperm_conj: ConjTable,
    pub eperm_conj: ConjTable,
    pub mperm_conj: ConjTable,

    pub twist_sym: SymCoordTable,
    pub flip_sym: SymCoordTable,
    pub cperm_sym: SymCoordTable,
    pub eperm_sym: SymCoordTable,
}

impl CoordTables {
    pub fn build() -> Result<Self, TableError> {
        let sym = SymTables::new();
        let sym8 = SymGroup::sym8(&sym);
        let sym16 = SymGroup::full(&sym);
        let (slice_move, slice_conj) = init_slice_move_conj(&sym16);
        let (mperm_move, mperm_conj) = init_mperm_move_conj(&sym16);
        let twist_move = init_twist_move();
        let flip_move = init_flip_move();
        let cperm_move = init_cperm_move();
        let eperm_move = init_eperm_move();
        let (twist_conj, twist_sym) = init_twist_sym(&twist_move, &sym8)?;
        let (flip_conj, flip_sym) = init_flip_sym(&flip_move, &sym8)?;
        let (cperm_conj, cperm_sym) = init_cperm_sym(&cperm_move, &sym16)?;
        let (eperm_conj, eperm_sym) = init_eperm_sym(&eperm_move, &sym16)?;
        log::info!("move and symmetry tables built");
        Ok(Self {
            sym, sym8, sym16,
            twist_move, flip_move, slice_move, slice_sorted_move: init_slice_sorted_move(),
            cperm_move, eperm_move, mperm_move,
            twist_conj, flip_conj, slice_conj, cperm_conj, eperm_conj, mperm_conj,
            twist_sym, flip_sym, cperm_sym, eperm_sym,
        })
    }

    /// Twist classes (under 8 symmetries) with the slice (conjugated by all 16).
    pub fn slice_twist_conf(&self, inv_depth: u8) -> RawSymPrunConf<'_> {
        RawSymPrunConf {
            name: "slice_twist", raw_move: &self.slice_move, raw_conj: &self.slice_conj, sym: &self.twist_sym,
            sym_switch: Some(&SYM8), move_map: None, inv_depth,
        }
    }

    /// Flip classes (under 8 symmetries) with the slice (conjugated by all 16).
    pub fn slice_flip_conf(&self, inv_depth: u8) -> RawSymPrunConf<'_> {
        RawSymPrunConf {
            name: "slice_flip", raw_move: &self.slice_move, raw_conj: &self.slice_conj, sym: &self.flip_sym,
            sym_switch: Some(&SYM8), move_map: None, inv_depth,
        }
    }

    pub fn twist_flip_conf(&self, inv_depth: u8) -> RawSymPrunConf<'_> {
        RawSymPrunConf {
            name: "twist_flip", raw_move: &self.flip_move, raw_conj: &self.flip_conj, sym: &self.twist_sym,
            sym_switch: None, move_map: None, inv_depth,
        }
    }

    pub fn meperm_conf(&self, inv_depth: u8) -> RawSymPrunConf<'_> {
        RawSymPrunConf {
            name: "meperm", raw_move: &self.mperm_move, raw_conj: &self.mperm_conj, sym: &self.eperm_sym,
            sym_switch: None, move_map: None, inv_depth,
        }
    }

    /// Corner permutation classes, whose symmetry move table covers all 18 moves, with the M-slice permutation.
    pub fn mcperm_conf(&self, inv_depth: u8) -> RawSymPrunConf<'_> {
        RawSymPrunConf {
            name: "mcperm", raw_move: &self.mperm_move, raw_conj: &self.mperm_conj, sym: &self.cperm_sym,
            sym_switch: None, move_map: Some(&P2_MOVES), inv_depth,
        }
    }

    /// Calculate approximate number of bytes occupied by the tables.
    pub fn size_bytes(&self) -> usize {
        [&self.twist_move, &self.flip_move, &self.slice_move, &self.slice_sorted_move, &self.cperm_move, &self.eperm_move, &self.mperm_move]
            .iter().map(|t| t.size_bytes()).sum::<usize>()
        + [&self.twist_conj, &self.flip_conj, &self.slice_conj, &self.cperm_conj, &self.eperm_conj, &self.mperm_conj]
            .iter().map(|t| t.size_bytes()).sum::<usize>()
        + [&self.twist_sym, &self.flip_sym, &self.cperm_sym, &self.eperm_sym]
            .iter().map(|t| t.size_bytes_dyn()).sum::<usize>()
    }
}

pub fn init_slice_twist_prun<S: BuildStatsCollector>(coords: &CoordTables, inv_depth: u8, stats: &mut S) -> Result<RawSymPrun, TableError> {
    RawSymPrun::build(&coords.slice_twist_conf(inv_depth), stats)
}

pub fn init_slice_flip_prun<S: BuildStatsCollector>(coords: &CoordTables, inv_depth: u8, stats: &mut S) -> Result<RawSymPrun, TableError> {
    RawSymPrun::build(&coords.slice_flip_conf(inv_depth), stats)
}

pub fn init_twist_flip_prun<S: BuildStatsCollector>(coords: &CoordTables, inv_depth: u8, stats: &mut S) -> Result<RawSymPrun, TableError> {
    RawSymPrun::build(&coords.twist_flip_conf(inv_depth), stats)
}

pub fn init_meperm_prun<S: BuildStatsCollector>(coords: &CoordTables, inv_depth: u8, stats: &mut S) -> Result<RawSymPrun, TableError> {
    RawSymPrun::build(&coords.meperm_conf(inv_depth), stats)
}

pub fn init_mcperm_prun<S: BuildStatsCollector>(coords: &CoordTables, inv_depth: u8, stats: &mut S) -> Result<RawSymPrun, TableError> {
    RawSymPrun::build(&coords.mcperm_conf(inv_depth), stats)
}

#[inline] fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e))
}

/// All tables, built once and then only read.
pub struct TableSet {
    pub conf: BuildConf,
    pub coords: CoordTables,
    pub slice_twist_prun: RawSymPrun,
    pub slice_flip_prun: RawSymPrun,
    pub twist_flip_prun: Option<RawSymPrun>,
    pub meperm_prun: RawSymPrun,
    pub mcperm_prun: RawSymPrun,
}

static GLOBAL: OnceLock<Result<TableSet, TableError>> = OnceLock::new();

impl TableSet {
    pub fn build(conf: &BuildConf) -> Result<Self, TableError> {
        let coords = CoordTables::build()?;
        let d = conf.inv_depth;
        let (slice_twist, slice_flip, twist_flip, meperm, mcperm) = if conf.parallel {
            std::thread::scope(|s| {
                let coords = &coords;
                let twist_flip = conf.twist_flip_prun.then(|| s.spawn(move || init_twist_flip_prun(coords, d.twist_flip, &mut LayerLogger)));
                let slice_twist = s.spawn(move || init_slice_twist_prun(coords, d.slice_twist, &mut LayerLogger));
                let slice_flip = s.spawn(move || init_slice_flip_prun(coords, d.slice_flip, &mut LayerLogger));
                let meperm = s.spawn(move || init_meperm_prun(coords, d.meperm, &mut LayerLogger));
                let mcperm = init_mcperm_prun(coords, d.mcperm, &mut LayerLogger);
                (join(slice_twist), join(slice_flip), twist_flip.map(join), join(meperm), mcperm)
            })
        } else {
            (init_slice_twist_prun(&coords, d.slice_twist, &mut LayerLogger),
             init_slice_flip_prun(&coords, d.slice_flip, &mut LayerLogger),
             conf.twist_flip_prun.then(|| init_twist_flip_prun(&coords, d.twist_flip, &mut LayerLogger)),
             init_meperm_prun(&coords, d.meperm, &mut LayerLogger),
             init_mcperm_prun(&coords, d.mcperm, &mut LayerLogger))
        };
        Ok(Self {
            conf: *conf,
            slice_twist_prun: slice_twist?,
            slice_flip_prun: slice_flip?,
            twist_flip_prun: twist_flip.transpose()?,
            meperm_prun: meperm?,
            mcperm_prun: mcperm?,
            coords,
        })
    }

    /// Returns the process-wide table set, built with the default configuration on first use.
    pub fn global() -> Result<&'static TableSet, TableError> {
        GLOBAL.get_or_init(|| TableSet::build(&BuildConf::default())).as_ref().map_err(Clone::clone)
    }

    /// Lower bound on the moves needed to solve the twist and slice coordinates.
    #[inline] pub fn slice_twist_bound(&self, twist: u16, slice: u16) -> u8 {
        self.slice_twist_bound_sym(self.coords.twist_sym.class_of(twist), slice)
    }

    #[inline] pub fn slice_twist_bound_sym(&self, twist: SymCoord, slice: u16) -> u8 {
        let conf = self.coords.slice_twist_conf(self.conf.inv_depth.slice_twist);
        self.slice_twist_prun.get(conf.entry_of_sym(twist, slice))
    }

    /// Lower bound on the moves needed to solve the flip and slice coordinates.
    #[inline] pub fn slice_flip_bound(&self, flip: u16, slice: u16) -> u8 {
        self.slice_flip_bound_sym(self.coords.flip_sym.class_of(flip), slice)
    }

    #[inline] pub fn slice_flip_bound_sym(&self, flip: SymCoord, slice: u16) -> u8 {
        let conf = self.coords.slice_flip_conf(self.conf.inv_depth.slice_flip);
        self.slice_flip_prun.get(conf.entry_of_sym(flip, slice))
    }

    /// Lower bound on the moves needed to solve the twist and flip coordinates, if that table was built.
    #[inline] pub fn twist_flip_bound(&self, twist: u16, flip: u16) -> Option<u8> {
        self.twist_flip_bound_sym(self.coords.twist_sym.class_of(twist), flip)
    }

    #[inline] pub fn twist_flip_bound_sym(&self, twist: SymCoord, flip: u16) -> Option<u8> {
        let conf = self.coords.twist_flip_conf(self.conf.inv_depth.twist_flip);
        self.twist_flip_prun.as_ref().map(|prun| prun.get(conf.entry_of_sym(twist, flip)))
    }

    /// Lower bound on the phase-2 moves needed to solve the U and D edge permutation and the M-slice permutation.
    #[inline] pub fn meperm_bound(&self, eperm: u16, mperm: u16) -> u8 {
        self.meperm_bound_sym(self.coords.eperm_sym.class_of(eperm), mperm)
    }

    #[inline] pub fn meperm_bound_sym(&self, eperm: SymCoord, mperm: u16) -> u8 {
        let conf = self.coords.meperm_conf(self.conf.inv_depth.meperm);
        self.meperm_prun.get(conf.entry_of_sym(eperm, mperm))
    }

    /// Lower bound on the phase-2 moves needed to solve the corner permutation and the M-slice permutation.
    #[inline] pub fn mcperm_bound(&self, cperm: u16, mperm: u16) -> u8 {
        self.mcperm_bound_sym(self.coords.cperm_sym.class_of(cperm), mperm)
    }

    #[inline] pub fn mcperm_bound_sym(&self, cperm: SymCoord, mperm: u16) -> u8 {
        let conf = self.coords.mcperm_conf(self.conf.inv_depth.mcperm);
        self.mcperm_prun.get(conf.entry_of_sym(cperm, mperm))
    }

    /// Lower bound on the moves needed to bring a cube with the given coordinates into phase 2.
    pub fn phase1_bound(&self, twist: u16, flip: u16, slice: u16) -> u8 {
        let bound = self.slice_twist_bound(twist, slice).max(self.slice_flip_bound(flip, slice));
        self.twist_flip_bound(twist, flip).map_or(bound, |tf| bound.max(tf))
    }

    /// Lower bound on the phase-2 moves needed to solve a cube in phase 2 with the given coordinates.
    pub fn phase2_bound(&self, cperm: u16, eperm: u16, mperm: u16) -> u8 {
        self.mcperm_bound(cperm, mperm).max(self.meperm_bound(eperm, mperm))
    }

    /// Returns the pruning tables that were built.
    pub fn pruning_tables(&self) -> impl Iterator<Item = &RawSymPrun> {
        [Some(&self.slice_twist_prun), Some(&self.slice_flip_prun), self.twist_flip_prun.as_ref(), Some(&self.meperm_prun), Some(&self.mcperm_prun)]
            .into_iter().flatten()
    }

    /// Calculate approximate, total (including heap memory) number of bytes occupied by `self`.
    pub fn size_bytes(&self) -> usize {
        std::mem::size_of_val(self) + self.coords.size_bytes()
            + self.pruning_tables().map(|p| p.size_bytes()).sum::<usize>()
    }
}
