//! Row occupancy tables and the grid row allocator.

use std::collections::HashMap;

use super::cluster::Cluster;
use super::grouper::EventGroup;
use super::LayoutError;
use crate::models::grid::DayCell;

/// Which stacking rows of one day cell are taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowOccupancy {
    rows: Vec<bool>,
}

impl RowOccupancy {
    /// A table of `capacity` free rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: vec![false; capacity],
        }
    }

    /// Lowest free row. A full table answers with its length, the row just
    /// past the end.
    pub fn first_free(&self) -> usize {
        self.rows
            .iter()
            .position(|taken| !taken)
            .unwrap_or(self.rows.len())
    }

    /// Mark `row` taken, growing the table when it is past the end.
    pub fn occupy(&mut self, row: usize) {
        if row >= self.rows.len() {
            self.rows.resize(row + 1, false);
        }
        self.rows[row] = true;
    }

    pub fn is_occupied(&self, row: usize) -> bool {
        self.rows.get(row).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Occupancy tables for the cells of the cluster being laid out.
#[derive(Debug, Default)]
pub struct ClusterOccupancy {
    tables: HashMap<usize, RowOccupancy>,
}

impl ClusterOccupancy {
    /// Fresh tables for every cell of `cluster`, sized to each cell's
    /// current row capacity.
    pub fn for_cluster(cluster: &Cluster, cells: &[DayCell]) -> Self {
        let tables = cluster
            .cells
            .iter()
            .map(|&cell| (cell, RowOccupancy::with_capacity(cells[cell].row_capacity)))
            .collect();
        Self { tables }
    }

    pub fn table(&self, cell: usize) -> Option<&RowOccupancy> {
        self.tables.get(&cell)
    }

    /// Find the row for `group` and mark it taken in every cell it spans.
    ///
    /// The search starts at the highest of the cells' first free rows and
    /// moves down the grid until a row is free on every spanned day; a lower
    /// cell can have a gap under a taken row. Fails without touching any
    /// table when a spanned cell has no table in this cluster.
    pub fn place(&mut self, group: &EventGroup, cells: &[DayCell]) -> Result<usize, LayoutError> {
        let mut tables = Vec::with_capacity(group.span());
        for cell in group.cells() {
            let table = self
                .tables
                .get(&cell)
                .ok_or_else(|| LayoutError::MissingOccupancy {
                    event_id: group.event_id.clone(),
                    date: cells[cell].date,
                })?;
            tables.push(table);
        }

        let mut row = tables.iter().map(|t| t.first_free()).max().unwrap_or(0);
        while tables.iter().any(|t| t.is_occupied(row)) {
            row += 1;
        }

        for cell in group.cells() {
            if let Some(table) = self.tables.get_mut(&cell) {
                table.occupy(row);
            }
        }

        Ok(row)
    }
}

/// Set each cell's row capacity to the largest visible-fragment count of its
/// week row.
pub fn fit_row_capacity(cells: &mut [DayCell]) {
    for week in cells.chunks_mut(7) {
        let most = week.iter().map(DayCell::visible_count).max().unwrap_or(0);
        for cell in week.iter_mut() {
            cell.row_capacity = most;
        }
    }
}

/// Grow a week row's capacity when a placed fragment landed past it.
pub fn expand_row_capacity(cells: &mut [DayCell]) {
    for week in cells.chunks_mut(7) {
        let depth = week.iter().map(DayCell::occupied_depth).max().unwrap_or(0);
        for cell in week.iter_mut() {
            cell.row_capacity = cell.row_capacity.max(depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::{EventFragment, MonthGrid};
    use crate::services::layout::grouper::FragmentRef;

    fn group(id: &str, cells: &[usize]) -> EventGroup {
        EventGroup {
            event_id: id.to_string(),
            members: cells.iter().map(|&cell| FragmentRef { cell, slot: 0 }).collect(),
        }
    }

    #[test]
    fn test_first_free_skips_taken_rows() {
        let mut table = RowOccupancy::with_capacity(3);
        assert_eq!(table.first_free(), 0);
        table.occupy(0);
        table.occupy(2);
        assert_eq!(table.first_free(), 1);
        table.occupy(1);
        assert_eq!(table.first_free(), 3);
    }

    #[test]
    fn test_occupy_grows_table() {
        let mut table = RowOccupancy::with_capacity(0);
        assert!(table.is_empty());
        table.occupy(4);
        assert_eq!(table.len(), 5);
        assert!(table.is_occupied(4));
        assert!(!table.is_occupied(3));
        assert!(!table.is_occupied(10));
    }

    #[test]
    fn test_place_takes_highest_first_free_row() {
        let grid = MonthGrid::new(2025, 3).unwrap();
        let cluster = Cluster { cells: vec![0, 1, 2] };
        let mut occupancy = ClusterOccupancy::for_cluster(&cluster, grid.cells());

        assert_eq!(occupancy.place(&group("a", &[1]), grid.cells()).unwrap(), 0);
        assert_eq!(occupancy.place(&group("b", &[1]), grid.cells()).unwrap(), 1);
        // Row 0 is free on cells 0 and 2 but not on 1, and row 1 is taken there too
        assert_eq!(occupancy.place(&group("c", &[0, 1, 2]), grid.cells()).unwrap(), 2);

        for cell in [0, 1, 2] {
            assert!(occupancy.table(cell).unwrap().is_occupied(2));
        }
        assert!(!occupancy.table(0).unwrap().is_occupied(0));
    }

    #[test]
    fn test_place_skips_row_taken_above_a_gap() {
        let grid = MonthGrid::new(2025, 3).unwrap();
        let mut occupancy = ClusterOccupancy {
            tables: HashMap::from([
                (0, RowOccupancy { rows: vec![false, true] }),
                (1, RowOccupancy { rows: vec![true, false] }),
            ]),
        };

        // Highest first free row is 1, which cell 0 already holds
        let row = occupancy.place(&group("b", &[0, 1]), grid.cells()).unwrap();

        assert_eq!(row, 2);
        assert_eq!(occupancy.table(0).unwrap().rows, vec![false, true, true]);
        assert_eq!(occupancy.table(1).unwrap().rows, vec![true, false, true]);
    }

    #[test]
    fn test_place_outside_cluster_is_rejected_untouched() {
        let grid = MonthGrid::new(2025, 3).unwrap();
        let cluster = Cluster { cells: vec![0, 1] };
        let mut occupancy = ClusterOccupancy::for_cluster(&cluster, grid.cells());

        let result = occupancy.place(&group("stray", &[1, 5]), grid.cells());

        assert_eq!(
            result,
            Err(LayoutError::MissingOccupancy {
                event_id: "stray".to_string(),
                date: grid.cells()[5].date,
            })
        );
        assert!(!occupancy.table(1).unwrap().is_occupied(0));
    }

    #[test]
    fn test_fit_row_capacity_per_week() {
        let mut grid = MonthGrid::new(2025, 3).unwrap();
        for id in ["a", "b", "c"] {
            grid.cells_mut()[2].fragments.push(EventFragment::new(id, "default"));
        }
        let mut hidden = EventFragment::new("h", "default");
        hidden.hidden = true;
        grid.cells_mut()[9].fragments.push(hidden);
        grid.cells_mut()[9].fragments.push(EventFragment::new("d", "default"));

        fit_row_capacity(grid.cells_mut());

        assert!(grid.cells()[0..7].iter().all(|c| c.row_capacity == 3));
        assert!(grid.cells()[7..14].iter().all(|c| c.row_capacity == 1));
        assert!(grid.cells()[14..].iter().all(|c| c.row_capacity == 0));
    }

    #[test]
    fn test_expand_row_capacity_covers_deepest_row() {
        let mut grid = MonthGrid::new(2025, 3).unwrap();
        let mut fragment = EventFragment::new("deep", "default");
        fragment.row = Some(2);
        grid.cells_mut()[8].fragments.push(fragment);
        fit_row_capacity(grid.cells_mut());
        assert_eq!(grid.cells()[8].row_capacity, 1);

        expand_row_capacity(grid.cells_mut());

        assert!(grid.cells()[7..14].iter().all(|c| c.row_capacity == 3));
        assert_eq!(grid.cells()[0].row_capacity, 0);
    }
}
