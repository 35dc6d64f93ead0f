//! Month-view layout engine.
//!
//! Assigns every visible event fragment of a [`MonthGrid`] a stacking row so
//! that a multi-day event reads as one continuous bar and no two events on
//! the same day share a row. A pass runs cluster detection, grouping,
//! ordering and row allocation over the whole grid and rebuilds all
//! occupancy from scratch.

use chrono::NaiveDate;

use crate::models::event::EventRecord;
use crate::models::grid::{DayCell, MonthGrid};

pub mod allocator;
pub mod cluster;
pub mod grouper;
pub mod ordering;
pub mod queue;

pub use allocator::{ClusterOccupancy, RowOccupancy};
pub use cluster::{detect_clusters, Cluster};
pub use grouper::{group_fragments, EventGroup, FragmentRef};
pub use ordering::{record_lookup, sort_groups, RecordLookup, SortKey};
pub use queue::{LayoutQueue, LayoutTrigger, PassObserver};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A group spans a cell the current cluster has no occupancy table for.
    #[error("event '{event_id}' spans {date}, which is outside the cluster being laid out")]
    MissingOccupancy { event_id: String, date: NaiveDate },
}

/// Summary of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    pub clusters: usize,
    pub groups: usize,
    pub placed_fragments: usize,
    pub skipped_groups: usize,
    /// Deepest stacking (rows used) of any cell
    pub max_depth: usize,
}

/// State threaded through one layout pass.
struct PassContext<'a> {
    records: RecordLookup<'a>,
    priority_event_id: Option<&'a str>,
    report: LayoutReport,
}

/// Lay out every visible fragment of `grid`.
///
/// `priority_event_id` moves that event's group to the top of its cluster for
/// this pass only, so a just-created event shows first; the next pass without
/// it falls back to the natural order.
pub fn relayout(
    grid: &mut MonthGrid,
    records: &[EventRecord],
    priority_event_id: Option<&str>,
) -> LayoutReport {
    let mut ctx = PassContext {
        records: record_lookup(records),
        priority_event_id,
        report: LayoutReport::default(),
    };

    let cells = grid.cells_mut();
    for fragment in cells.iter_mut().flat_map(|c| c.fragments.iter_mut()) {
        fragment.row = None;
    }
    allocator::fit_row_capacity(cells);

    let clusters = detect_clusters(cells);
    ctx.report.clusters = clusters.len();

    for cluster in &clusters {
        layout_cluster(&mut ctx, cluster, cells);
    }

    allocator::expand_row_capacity(cells);
    ctx.report.max_depth = cells
        .iter()
        .map(|c| c.occupied_depth())
        .max()
        .unwrap_or(0);

    log::debug!(
        "Layout pass for {}-{:02}: {} clusters, {} groups, {} fragments, depth {}",
        grid.year(),
        grid.month(),
        ctx.report.clusters,
        ctx.report.groups,
        ctx.report.placed_fragments,
        ctx.report.max_depth
    );

    ctx.report
}

fn layout_cluster(
    ctx: &mut PassContext<'_>,
    cluster: &Cluster,
    cells: &mut [DayCell],
) {
    let mut groups = group_fragments(cluster, cells);
    sort_groups(&mut groups, &ctx.records);
    if let Some(event_id) = ctx.priority_event_id {
        ordering::promote(&mut groups, event_id);
    }
    ctx.report.groups += groups.len();

    let mut occupancy = ClusterOccupancy::for_cluster(cluster, cells);
    for group in &groups {
        match occupancy.place(group, cells) {
            Ok(row) => {
                for member in &group.members {
                    cells[member.cell].fragments[member.slot].row = Some(row);
                }
                ctx.report.placed_fragments += group.span();
            }
            Err(err) => {
                debug_assert!(false, "{}", err);
                log::error!("Skipping event group: {}", err);
                ctx.report.skipped_groups += 1;
            }
        }
    }
}
