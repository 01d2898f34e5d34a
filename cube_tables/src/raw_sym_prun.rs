use arrayvec::ArrayVec;

use crate::error::TableError;
use crate::pruning::{PruningTable, MAX_DEPTH, UNSET};
use crate::puzzle_cube3::moves::MoveTable;
use crate::puzzle_cube3::symmetry::{ConjTable, SymCoord, SymCoordTable};
use crate::puzzle_cube3::utils::N_MOVES;
use crate::stats::BuildStatsCollector;

/// Entry of a raw-symmetry pruning table: class of the symmetry-reduced coordinate
/// and the raw coordinate conjugated into the frame of the class representative.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entry {
    pub class: u16,
    pub raw: u16,
}

/// Tables that define a pruning table over pairs (symmetry-reduced coordinate, raw coordinate).
#[derive(Clone, Copy)]
pub struct RawSymPrunConf<'a> {
    pub name: &'static str,
    /// Moves of the raw coordinate. Its columns are the moves the table is built over.
    pub raw_move: &'a MoveTable,
    /// Conjugation of the raw coordinate.
    pub raw_conj: &'a ConjTable,
    /// Symmetry reduction of the other coordinate.
    pub sym: &'a SymCoordTable,
    /// Maps symmetry indices of `sym` to columns of `raw_conj`; identity if `None`.
    pub sym_switch: Option<&'a [u8]>,
    /// Maps columns of `raw_move` to the corresponding columns of the symmetry move table of `sym`; identity if `None`.
    pub move_map: Option<&'a [u8]>,
    /// Depth from which layers are filled by scanning unassigned entries instead of expanding a frontier.
    pub inv_depth: u8,
}

impl<'a> RawSymPrunConf<'a> {
    /// Returns column of `raw_conj` for symmetry `s` of `sym`.
    #[inline(always)] pub fn switch(&self, s: u8) -> u8 {
        self.sym_switch.map_or(s, |switch| switch[s as usize])
    }

    /// Returns column of the symmetry move table of `sym` for move `m`.
    #[inline(always)] pub fn sym_move_index(&self, m: u8) -> u8 {
        self.move_map.map_or(m, |map| map[m as usize])
    }

    /// Returns the entry of the pair of raw coordinates.
    #[inline] pub fn entry(&self, sym_raw: u16, raw: u16) -> Entry {
        self.entry_of_sym(self.sym.class_of(sym_raw), raw)
    }

    /// Returns the entry of the pair (symmetry coordinate, raw coordinate).
    #[inline] pub fn entry_of_sym(&self, coord: SymCoord, raw: u16) -> Entry {
        Entry { class: coord.class, raw: self.raw_conj.apply(raw, self.switch(coord.sym)) }
    }

    /// Returns entries reached from `e` by each move.
    fn neighbors(&self, e: Entry) -> ArrayVec<Entry, N_MOVES> {
        (0..self.raw_move.n_moves() as u8).map(|m| {
            let next = self.sym.sym_move(e.class, self.sym_move_index(m));
            self.entry_of_sym(next, self.raw_move.apply(e.raw, m))
        }).collect()
    }

    fn check_dimensions(&self) -> Result<(), TableError> {
        let mismatch = |what, expected, actual| Err(TableError::DimensionMismatch { table: self.name, what, expected, actual });
        if self.raw_conj.len() != self.raw_move.len() {
            return mismatch("raw conjugation table", self.raw_move.len(), self.raw_conj.len());
        }
        let n_sym = self.sym.group().len();
        match self.sym_switch {
            Some(switch) => {
                if switch.len() != n_sym { return mismatch("symmetry switch", n_sym, switch.len()); }
                if let Some(&s) = switch.iter().find(|&&s| s as usize >= self.raw_conj.n_sym()) {
                    return mismatch("raw conjugation table symmetries", s as usize + 1, self.raw_conj.n_sym());
                }
            }
            None => if self.raw_conj.n_sym() != n_sym {
                return mismatch("raw conjugation table symmetries", n_sym, self.raw_conj.n_sym());
            }
        }
        let n_moves = self.raw_move.n_moves();
        match self.move_map {
            Some(map) => {
                if map.len() != n_moves { return mismatch("move map", n_moves, map.len()); }
                if let Some(&m) = map.iter().find(|&&m| m as usize >= self.sym.n_moves()) {
                    return mismatch("symmetry move table moves", m as usize + 1, self.sym.n_moves());
                }
            }
            None => if self.sym.n_moves() != n_moves {
                return mismatch("symmetry move table moves", n_moves, self.sym.n_moves());
            }
        }
        Ok(())
    }
}

/// Pruning table over pairs (symmetry-reduced coordinate, raw coordinate),
/// holding for each entry the number of moves needed to reach the solved pair.
pub struct RawSymPrun {
    name: &'static str,
    table: PruningTable,
    n_raw: usize,
    n_classes: usize,
    max_depth: u8,
}

impl RawSymPrun {
    /// Fills the table described by `conf` breadth-first from the solved entry.
    pub fn build<S: BuildStatsCollector>(conf: &RawSymPrunConf, stats: &mut S) -> Result<Self, TableError> {
        conf.check_dimensions()?;
        let mut filler = Filler::new(conf);
        let total = filler.table.len();
        let mut frontier = Vec::new();
        let assigned = filler.assign(Entry { class: 0, raw: 0 }, 0, Some(&mut frontier));
        stats.layer(conf.name, 0, false, assigned, filler.filled, total);
        let mut depth = 0;
        while filler.filled < total {
            if depth == MAX_DEPTH {
                return Err(TableError::DepthOverflow { table: conf.name, depth: depth + 1 });
            }
            let backward = depth >= conf.inv_depth;
            let assigned = if backward {
                filler.backward_layer(depth)
            } else {
                frontier = filler.forward_layer(&frontier, depth);
                frontier.len()
            };
            depth += 1;
            if assigned == 0 {
                return Err(TableError::Incomplete { table: conf.name, depth, filled: filler.filled, total });
            }
            stats.layer(conf.name, depth, backward, assigned, filler.filled, total);
        }
        stats.finished(conf.name, depth);
        Ok(Self {
            name: conf.name,
            table: filler.table,
            n_raw: filler.n_raw,
            n_classes: conf.sym.n_classes(),
            max_depth: depth,
        })
    }

    #[inline(always)] pub fn index(&self, e: Entry) -> usize {
        assert!((e.raw as usize) < self.n_raw, "{}: raw coordinate {} out of range", self.name, e.raw);
        e.class as usize * self.n_raw + e.raw as usize
    }

    /// Returns the number of moves needed to solve the entry `e`.
    #[inline(always)] pub fn get(&self, e: Entry) -> u8 { self.table.get(self.index(e)) }

    #[inline] pub fn table(&self) -> &PruningTable { &self.table }

    #[inline] pub fn name(&self) -> &'static str { self.name }

    #[inline] pub fn n_raw(&self) -> usize { self.n_raw }

    #[inline] pub fn n_classes(&self) -> usize { self.n_classes }

    /// The largest value in the table.
    #[inline] pub fn max_depth(&self) -> u8 { self.max_depth }

    #[inline] pub fn size_bytes(&self) -> usize { self.table.size_bytes() }
}

/// State of an unfinished table.
struct Filler<'c, 'a> {
    conf: &'c RawSymPrunConf<'a>,
    table: PruningTable,
    n_raw: usize,
    filled: usize,
}

impl<'c, 'a> Filler<'c, 'a> {
    fn new(conf: &'c RawSymPrunConf<'a>) -> Self {
        let n_raw = conf.raw_move.len();
        Self { conf, table: PruningTable::new(conf.sym.n_classes() * n_raw), n_raw, filled: 0 }
    }

    #[inline(always)] fn index(&self, e: Entry) -> usize { e.class as usize * self.n_raw + e.raw as usize }

    /// Assigns `depth` to `e` and to every entry that differs from `e` by a self-symmetry
    /// of its class representative, skipping entries already assigned.
    /// Pushes newly assigned entries to `frontier` if given. Returns their number.
    fn assign(&mut self, e: Entry, depth: u8, mut frontier: Option<&mut Vec<Entry>>) -> usize {
        let mut mask = self.conf.sym.self_sym(e.class);
        let mut assigned = 0;
        while mask != 0 {
            let t = mask.trailing_zeros() as u8;
            mask &= mask - 1;
            let alias = Entry { class: e.class, raw: self.conf.raw_conj.apply(e.raw, self.conf.switch(t)) };
            if self.table.try_init(self.index(alias), depth) {
                assigned += 1;
                if let Some(f) = frontier.as_deref_mut() { f.push(alias); }
            }
        }
        self.filled += assigned;
        assigned
    }

    /// Assigns `depth + 1` to unassigned neighbours of `frontier` entries. Returns the newly assigned entries.
    fn forward_layer(&mut self, frontier: &[Entry], depth: u8) -> Vec<Entry> {
        let mut next = Vec::new();
        for &e in frontier {
            for n in self.conf.neighbors(e) {
                if self.table.get(self.index(n)) == UNSET {
                    self.assign(n, depth + 1, Some(&mut next));
                }
            }
        }
        next
    }

    /// Assigns `depth + 1` to every unassigned entry with a neighbour at `depth`. Returns the number of assigned entries.
    fn backward_layer(&mut self, depth: u8) -> usize {
        let mut assigned = 0;
        for class in 0..self.conf.sym.n_classes() as u16 {
            for raw in 0..self.n_raw as u16 {
                let e = Entry { class, raw };
                if self.table.get(self.index(e)) != UNSET { continue; }
                if self.conf.neighbors(e).into_iter().any(|n| self.table.get(self.index(n)) == depth) {
                    assigned += self.assign(e, depth + 1, None);
                }
            }
        }
        assigned
    }
}
