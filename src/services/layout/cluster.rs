//! Cluster detection over the day cells of a month grid.

use crate::models::grid::DayCell;

/// A maximal run of adjacent day cells that each show at least one visible
/// fragment. Holds cell indices in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub cells: Vec<usize>,
}

impl Cluster {
    pub fn contains(&self, cell: usize) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

/// Split `cells` into clusters. A cell with no visible fragment ends the
/// running cluster; the trailing run is flushed at the end of the scan.
pub fn detect_clusters(cells: &[DayCell]) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut running: Vec<usize> = Vec::new();

    for (index, cell) in cells.iter().enumerate() {
        if cell.has_visible_fragments() {
            running.push(index);
        } else if !running.is_empty() {
            clusters.push(Cluster {
                cells: std::mem::take(&mut running),
            });
        }
    }

    if !running.is_empty() {
        clusters.push(Cluster { cells: running });
    }

    clusters
}
