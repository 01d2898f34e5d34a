use std::ops::AddAssign;

/// Pruning table build statistic collector.
/// It collects data while depth layers of a table are filled.
pub trait BuildStatsCollector {
    /// Called after each layer, with the number of entries `assigned` to `depth` in this layer
    /// (aliases included), the number of entries `filled` so far and the `total` number of entries.
    /// `backward` tells whether the layer was filled by scanning unassigned entries.
    #[inline(always)] fn layer(&mut self, _table: &'static str, _depth: u8, _backward: bool, _assigned: usize, _filled: usize, _total: usize) {}

    /// Called once the table is complete.
    #[inline(always)] fn finished(&mut self, _table: &'static str, _max_depth: u8) {}
}

/// Build statistic collector that ignore all events.
impl BuildStatsCollector for () {}

/// Counts assigned entries.
impl BuildStatsCollector for usize {
    #[inline(always)] fn layer(&mut self, _table: &'static str, _depth: u8, _backward: bool, assigned: usize, _filled: usize, _total: usize) {
        *self += assigned;
    }
}

impl<A: BuildStatsCollector, B: BuildStatsCollector> BuildStatsCollector for (A, B) {
    #[inline(always)] fn layer(&mut self, table: &'static str, depth: u8, backward: bool, assigned: usize, filled: usize, total: usize) {
        self.0.layer(table, depth, backward, assigned, filled, total);
        self.1.layer(table, depth, backward, assigned, filled, total);
    }

    #[inline(always)] fn finished(&mut self, table: &'static str, max_depth: u8) {
        self.0.finished(table, max_depth);
        self.1.finished(table, max_depth);
    }
}

/// Number of entries at each depth, and the first depth filled backward.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct DepthCounts {
    /// `counts[d]` is the number of entries at depth `d`.
    pub counts: Vec<usize>,
    pub first_backward: Option<u8>,
}

impl DepthCounts {
    /// Total number of assigned entries.
    pub fn total(&self) -> usize { self.counts.iter().sum() }

    /// Largest depth with at least one entry.
    pub fn max_depth(&self) -> Option<u8> {
        self.counts.iter().rposition(|&c| c != 0).map(|d| d as u8)
    }
}

impl AddAssign<&DepthCounts> for DepthCounts {
    fn add_assign(&mut self, rhs: &DepthCounts) {
        if self.counts.len() < rhs.counts.len() { self.counts.resize(rhs.counts.len(), 0); }
        for (a, b) in self.counts.iter_mut().zip(rhs.counts.iter()) { *a += b; }
        self.first_backward = match (self.first_backward, rhs.first_backward) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

impl BuildStatsCollector for DepthCounts {
    fn layer(&mut self, _table: &'static str, depth: u8, backward: bool, assigned: usize, _filled: usize, _total: usize) {
        let depth = depth as usize;
        if self.counts.len() <= depth { self.counts.resize(depth + 1, 0); }
        self.counts[depth] += assigned;
        if backward && self.first_backward.is_none() { self.first_backward = Some(depth as u8); }
    }
}

/// Writes each layer to the log at debug level, and each finished table at info level.
#[derive(Default, Copy, Clone)]
pub struct LayerLogger;

impl BuildStatsCollector for LayerLogger {
    fn layer(&mut self, table: &'static str, depth: u8, backward: bool, assigned: usize, filled: usize, total: usize) {
        log::debug!("{table}: depth {depth:>2} {} {assigned:>9} entries, {filled}/{total} filled",
            if backward { "backward" } else { "forward " });
    }

    fn finished(&mut self, table: &'static str, max_depth: u8) {
        log::info!("{table}: complete, max depth {max_depth}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_counts() {
        let mut counts = DepthCounts::default();
        counts.layer("t", 0, false, 1, 1, 10);
        counts.layer("t", 1, false, 4, 5, 10);
        counts.layer("t", 2, true, 5, 10, 10);
        assert_eq!(counts.counts, vec![1, 4, 5]);
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.max_depth(), Some(2));
        assert_eq!(counts.first_backward, Some(2));
        let mut sum = DepthCounts { counts: vec![2], first_backward: None };
        sum += &counts;
        assert_eq!(sum.counts, vec![3, 4, 5]);
        assert_eq!(sum.first_backward, Some(2));
    }

    #[test]
    fn test_pair_and_counter() {
        let mut both = (0usize, DepthCounts::default());
        both.layer("t", 0, false, 1, 1, 3);
        both.layer("t", 1, false, 2, 3, 3);
        both.finished("t", 1);
        assert_eq!(both.0, 3);
        assert_eq!(both.1.counts, vec![1, 2]);
    }
}
