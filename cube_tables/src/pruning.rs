use bitm::{BitAccess, BitVec};

/// Number of bits per pruning table entry.
pub const BITS_PER_ENTRY: u8 = 4;

/// Value of entries that have not been assigned yet.
pub const UNSET: u8 = (1 << BITS_PER_ENTRY) - 1;

/// Largest depth an entry can hold.
pub const MAX_DEPTH: u8 = UNSET - 1;

/// Array of 4-bit depths, two per byte (entry `index` lives in byte `index / 2`).
///
/// Every entry is [`UNSET`] after construction.
pub struct PruningTable {
    cells: Box<[u64]>,
    len: usize,
}

impl PruningTable {
    /// Returns table of `len` unset entries.
    pub fn new(len: usize) -> Self {
        Self { cells: Box::<[u64]>::with_filled_bits(len * BITS_PER_ENTRY as usize), len }
    }

    /// Returns value of the entry `index`.
    #[inline(always)] pub fn get(&self, index: usize) -> u8 {
        assert!(index < self.len, "pruning index {} out of range 0..{}", index, self.len);
        self.cells.get_fragment(index, BITS_PER_ENTRY) as u8
    }

    /// Sets the entry `index` to `value`, leaving the other entry of the same byte unchanged.
    #[inline(always)] pub fn set(&mut self, index: usize, value: u8) {
        assert!(index < self.len, "pruning index {} out of range 0..{}", index, self.len);
        assert!(value <= UNSET, "pruning value {} does not fit in {} bits", value, BITS_PER_ENTRY);
        self.cells.set_fragment(index, value as u64, BITS_PER_ENTRY);
    }

    /// Sets the entry `index` to `value` if it is unset. Returns whether it was set.
    #[inline(always)] pub fn try_init(&mut self, index: usize, value: u8) -> bool {
        assert!(index < self.len, "pruning index {} out of range 0..{}", index, self.len);
        assert!(value < UNSET, "pruning value {} does not fit in {} bits", value, BITS_PER_ENTRY);
        let old = self.cells.conditionally_change_fragment(
            |old| (old == UNSET as u64).then_some(value as u64),
            index, BITS_PER_ENTRY);
        old == UNSET as u64
    }

    #[inline(always)] pub fn is_set(&self, index: usize) -> bool { self.get(index) != UNSET }

    /// Number of entries.
    #[inline] pub fn len(&self) -> usize { self.len }

    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Returns iterator over values of all entries.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(|i| self.cells.get_fragment(i, BITS_PER_ENTRY) as u8)
    }

    /// Returns the number of entries of each value, the last element counting unset entries.
    pub fn depth_histogram(&self) -> [usize; UNSET as usize + 1] {
        let mut result = [0; UNSET as usize + 1];
        for v in self.iter() { result[v as usize] += 1; }
        result
    }

    /// Returns the largest value of assigned entries, or `None` if no entry is assigned.
    pub fn max_depth(&self) -> Option<u8> {
        self.iter().filter(|&v| v != UNSET).max()
    }

    /// Calculate approximate number of bytes occupied by dynamic part of `self`.
    /// Same as `self.size_bytes() - std::mem::size_of_val(self)`.
    pub fn size_bytes_dyn(&self) -> usize {
        self.cells.len() * std::mem::size_of::<u64>()
    }

    /// Calculate approximate, total (including heap memory) number of bytes occupied by `self`.
    #[inline] pub fn size_bytes(&self) -> usize {
        std::mem::size_of_val(self) + self.size_bytes_dyn()
    }
}
