//! Serialises layout passes.
//!
//! Every mutation that changes the visible events raises a trigger. A
//! trigger raised while a pass is running (for example by an observer that
//! reacts to a finished pass) is queued and runs after the current pass, so
//! passes never interleave.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::{relayout, LayoutReport};
use crate::models::event::EventRecord;
use crate::models::grid::MonthGrid;

/// What caused a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutTrigger {
    /// A new event was created; it is shown at the top for this pass
    EventCreated(String),
    EventDeleted(String),
    DatesChanged(String),
    AllDayToggled(String),
    CategoryToggled(String),
    MonthChanged,
    Refresh,
}

impl LayoutTrigger {
    /// Event that gets top priority for the pass this trigger starts.
    pub fn priority_event(&self) -> Option<&str> {
        match self {
            Self::EventCreated(id) => Some(id),
            _ => None,
        }
    }
}

/// Notified after each completed pass.
pub trait PassObserver {
    /// Called once per pass. New triggers must go through `queue.enqueue`.
    fn pass_completed(&mut self, trigger: &LayoutTrigger, report: &LayoutReport, queue: &LayoutQueue);
}

/// Observer that ignores every pass.
impl PassObserver for () {
    fn pass_completed(&mut self, _: &LayoutTrigger, _: &LayoutReport, _: &LayoutQueue) {}
}

#[derive(Debug, Default)]
pub struct LayoutQueue {
    pending: RefCell<VecDeque<LayoutTrigger>>,
    running: Cell<bool>,
}

impl LayoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Queue a trigger without running it.
    pub fn enqueue(&self, trigger: LayoutTrigger) {
        self.pending.borrow_mut().push_back(trigger);
    }

    /// Queue `trigger` and run passes until the queue is empty.
    ///
    /// Returns the report of every pass run, in order. When a pass is
    /// already running the trigger is only queued and an empty list returned.
    pub fn trigger(
        &self,
        trigger: LayoutTrigger,
        grid: &mut MonthGrid,
        records: &[EventRecord],
        observer: &mut dyn PassObserver,
    ) -> Vec<(LayoutTrigger, LayoutReport)> {
        self.enqueue(trigger);
        if self.running.get() {
            return Vec::new();
        }

        let _guard = RunningGuard::engage(&self.running);
        let mut completed = Vec::new();

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(trigger) = next else {
                break;
            };

            log::trace!("Layout pass triggered by {:?}", trigger);
            let report = relayout(grid, records, trigger.priority_event());
            observer.pass_completed(&trigger, &report, self);
            completed.push((trigger, report));
        }

        completed
    }
}

/// Clears the running flag even if a pass panics.
struct RunningGuard<'a>(&'a Cell<bool>);

impl<'a> RunningGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
