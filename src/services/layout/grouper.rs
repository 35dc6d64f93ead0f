//! Groups the fragments of one cluster by the event they belong to.

use std::collections::HashMap;

use super::cluster::Cluster;
use crate::models::grid::DayCell;

/// Position of one fragment inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentRef {
    pub cell: usize,
    pub slot: usize,
}

/// The visible fragments of one event within one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGroup {
    pub event_id: String,
    pub members: Vec<FragmentRef>,
}

impl EventGroup {
    /// Number of day cells the group covers in this cluster.
    pub fn span(&self) -> usize {
        self.members.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|m| m.cell)
    }
}

/// Group the fragments of `cluster` by `event_id`, in first-seen order.
///
/// Hidden fragments are left out of their group, and a group left with no
/// visible fragment is dropped.
pub fn group_fragments(cluster: &Cluster, cells: &[DayCell]) -> Vec<EventGroup> {
    let mut groups: Vec<EventGroup> = Vec::new();
    let mut index_by_id: HashMap<&str, usize> = HashMap::new();

    for &cell in &cluster.cells {
        for (slot, fragment) in cells[cell].fragments.iter().enumerate() {
            let position = *index_by_id
                .entry(fragment.event_id.as_str())
                .or_insert_with(|| {
                    groups.push(EventGroup {
                        event_id: fragment.event_id.clone(),
                        members: Vec::new(),
                    });
                    groups.len() - 1
                });

            if fragment.is_visible() {
                groups[position].members.push(FragmentRef { cell, slot });
            }
        }
    }

    groups.retain(|group| !group.members.is_empty());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::{EventFragment, MonthGrid};
    use crate::services::layout::cluster::detect_clusters;

    fn push(grid: &mut MonthGrid, cell: usize, id: &str, hidden: bool) {
        let mut fragment = EventFragment::new(id, "default");
        fragment.hidden = hidden;
        grid.cells_mut()[cell].fragments.push(fragment);
    }

    #[test]
    fn test_groups_multi_day_fragments_together() {
        let mut grid = MonthGrid::new(2025, 3).unwrap();
        push(&mut grid, 10, "trip", false);
        push(&mut grid, 11, "trip", false);
        push(&mut grid, 11, "lunch", false);
        push(&mut grid, 12, "trip", false);

        let clusters = detect_clusters(grid.cells());
        let groups = group_fragments(&clusters[0], grid.cells());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].event_id, "trip");
        assert_eq!(groups[0].cells().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(groups[1].event_id, "lunch");
        assert_eq!(groups[1].members, vec![FragmentRef { cell: 11, slot: 1 }]);
    }

    #[test]
    fn test_hidden_fragments_are_excluded() {
        let mut grid = MonthGrid::new(2025, 3).unwrap();
        push(&mut grid, 3, "a", false);
        push(&mut grid, 3, "gone", true);
        push(&mut grid, 4, "a", false);

        let clusters = detect_clusters(grid.cells());
        let groups = group_fragments(&clusters[0], grid.cells());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].event_id, "a");
        assert_eq!(groups[0].span(), 2);
    }

    #[test]
    fn test_same_event_in_two_clusters_is_grouped_per_cluster() {
        let mut grid = MonthGrid::new(2025, 3).unwrap();
        push(&mut grid, 3, "long", false);
        push(&mut grid, 4, "long", true);
        push(&mut grid, 5, "long", false);

        let clusters = detect_clusters(grid.cells());
        assert_eq!(clusters.len(), 2);

        for cluster in &clusters {
            let groups = group_fragments(cluster, grid.cells());
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].span(), 1);
        }
    }
}
