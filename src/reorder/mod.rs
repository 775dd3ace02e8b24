//! Drag-and-drop reordering of the link collection.
//!
//! [`DragReorderController`] turns a stream of pointer gestures into
//! [`move_before`] calls and commits. The caller owns the current
//! collection: each hover takes the latest snapshot in and hands the
//! reordered snapshot back out.

use tracing::debug;

use crate::model::collection::{move_before, position, same_order};
use crate::model::LinkRecord;
use crate::ports::sink::{CollectionSink, CommitError};

/// When hover results reach the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// Commit after every hover that changes the order.
    #[default]
    Eager,
    /// Keep the order in memory during the drag and commit it once on drop.
    OnDrop,
}

/// Where the controller is in a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A record is being dragged.
    Dragging {
        /// Id of the grabbed record.
        moved_id: String,
    },
}

/// Result of a drag-over gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hover {
    /// Nothing happened: not dragging, hovering the dragged record itself,
    /// or one of the ids is no longer in the collection.
    Ignored,
    /// The record already sits right before the target.
    Unchanged,
    /// The collection was reordered; this is the new current snapshot.
    Moved(Vec<LinkRecord>),
}

/// State machine for one drag gesture at a time.
///
/// There is no undo: the last committed order stands even if the drop
/// lands outside any valid target.
pub struct DragReorderController<'a> {
    sink: &'a dyn CollectionSink,
    policy: CommitPolicy,
    state: DragState,
    pending: Option<Vec<LinkRecord>>,
}

impl<'a> DragReorderController<'a> {
    /// Creates an idle controller committing eagerly to `sink`.
    #[must_use]
    pub fn new(sink: &'a dyn CollectionSink) -> Self {
        Self::with_policy(sink, CommitPolicy::Eager)
    }

    /// Creates an idle controller with the given commit policy.
    #[must_use]
    pub fn with_policy(sink: &'a dyn CollectionSink, policy: CommitPolicy) -> Self {
        Self { sink, policy, state: DragState::Idle, pending: None }
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Grabs the record with `id`. Starting a new drag abandons any previous one.
    pub fn drag_start(&mut self, id: &str) {
        self.pending = None;
        self.state = DragState::Dragging { moved_id: id.to_string() };
    }

    /// Hovers the dragged record over `target_id` in the `current` collection.
    ///
    /// # Errors
    ///
    /// Propagates the sink's [`CommitError`] under [`CommitPolicy::Eager`].
    pub fn drag_over(&mut self, current: &[LinkRecord], target_id: &str) -> Result<Hover, CommitError> {
        let DragState::Dragging { moved_id } = &self.state else {
            return Ok(Hover::Ignored);
        };
        if moved_id == target_id
            || position(current, moved_id).is_none()
            || position(current, target_id).is_none()
        {
            return Ok(Hover::Ignored);
        }

        let reordered = move_before(current, moved_id, target_id);
        if same_order(current, &reordered) {
            return Ok(Hover::Unchanged);
        }

        match self.policy {
            CommitPolicy::Eager => {
                self.sink.commit(&reordered)?;
                debug!(moved = %moved_id, before = %target_id, "committed reorder");
            }
            CommitPolicy::OnDrop => self.pending = Some(reordered.clone()),
        }
        Ok(Hover::Moved(reordered))
    }

    /// Releases the dragged record. The order committed by the last hover is final.
    ///
    /// # Errors
    ///
    /// Propagates the sink's [`CommitError`] when a deferred order is flushed.
    pub fn drop_item(&mut self) -> Result<(), CommitError> {
        self.finish()
    }

    /// Ends the gesture without a drop target; behaves like [`Self::drop_item`].
    ///
    /// # Errors
    ///
    /// Propagates the sink's [`CommitError`] when a deferred order is flushed.
    pub fn drag_end(&mut self) -> Result<(), CommitError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<(), CommitError> {
        self.state = DragState::Idle;
        if let Some(order) = self.pending.take() {
            self.sink.commit(&order)?;
            debug!(count = order.len(), "committed deferred reorder");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Sink that keeps every committed snapshot.
    #[derive(Default)]
    struct MemSink {
        commits: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl MemSink {
        fn commits(&self) -> Vec<Vec<String>> {
            self.commits.lock().unwrap().clone()
        }
    }

    impl CollectionSink for MemSink {
        fn commit(&self, links: &[LinkRecord]) -> Result<(), CommitError> {
            if self.fail {
                return Err(CommitError("store offline".into()));
            }
            self.commits.lock().unwrap().push(links.iter().map(|l| l.id.clone()).collect());
            Ok(())
        }
    }

    fn links(ids: &[&str]) -> Vec<LinkRecord> {
        ids.iter().map(|id| LinkRecord::new(*id, *id, format!("https://{id}.example"), "misc")).collect()
    }

    fn ids(hover: &Hover) -> Vec<&str> {
        match hover {
            Hover::Moved(links) => links.iter().map(|l| l.id.as_str()).collect(),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn each_hover_commits_immediately() {
        let sink = MemSink::default();
        let mut controller = DragReorderController::new(&sink);

        controller.drag_start("d");
        let first = controller.drag_over(&links(&["a", "b", "c", "d"]), "c").unwrap();
        assert_eq!(ids(&first), ["a", "b", "d", "c"]);
        let Hover::Moved(current) = first else { unreachable!() };
        let second = controller.drag_over(&current, "a").unwrap();
        assert_eq!(ids(&second), ["d", "a", "b", "c"]);
        controller.drop_item().unwrap();

        assert_eq!(sink.commits(), vec![vec!["a", "b", "d", "c"], vec!["d", "a", "b", "c"]]);
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn hovering_same_target_twice_is_idempotent() {
        let sink = MemSink::default();
        let mut controller = DragReorderController::new(&sink);
        controller.drag_start("a");

        let Hover::Moved(once) = controller.drag_over(&links(&["a", "b", "c"]), "c").unwrap() else {
            panic!("first hover should move");
        };
        assert_eq!(controller.drag_over(&once, "c").unwrap(), Hover::Unchanged);
        assert_eq!(sink.commits().len(), 1);
    }

    #[test]
    fn ignores_self_unknown_and_idle_hovers() {
        let sink = MemSink::default();
        let mut controller = DragReorderController::new(&sink);
        let current = links(&["a", "b"]);

        assert_eq!(controller.drag_over(&current, "b").unwrap(), Hover::Ignored);

        controller.drag_start("a");
        assert_eq!(controller.drag_over(&current, "a").unwrap(), Hover::Ignored);
        assert_eq!(controller.drag_over(&current, "gone").unwrap(), Hover::Ignored);

        // The dragged record was deleted elsewhere mid-drag.
        controller.drag_start("zombie");
        assert_eq!(controller.drag_over(&current, "a").unwrap(), Hover::Ignored);
        assert!(sink.commits().is_empty());
    }

    #[test]
    fn drop_does_not_mutate_order() {
        let sink = MemSink::default();
        let mut controller = DragReorderController::new(&sink);
        controller.drag_start("a");
        controller.drag_end().unwrap();
        assert!(sink.commits().is_empty());
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn commit_failure_propagates_from_hover() {
        let sink = MemSink { fail: true, ..MemSink::default() };
        let mut controller = DragReorderController::new(&sink);
        controller.drag_start("b");
        let err = controller.drag_over(&links(&["a", "b"]), "a").unwrap_err();
        assert_eq!(err, CommitError("store offline".into()));
    }

    #[test]
    fn deferred_policy_commits_final_order_once() {
        let eager_sink = MemSink::default();
        let deferred_sink = MemSink::default();
        let mut eager = DragReorderController::new(&eager_sink);
        let mut deferred = DragReorderController::with_policy(&deferred_sink, CommitPolicy::OnDrop);

        for controller in [&mut eager, &mut deferred] {
            let mut current = links(&["a", "b", "c", "d"]);
            controller.drag_start("a");
            for target in ["c", "d", "b"] {
                if let Hover::Moved(next) = controller.drag_over(&current, target).unwrap() {
                    current = next;
                }
            }
            controller.drop_item().unwrap();
        }

        let eager_commits = eager_sink.commits();
        let deferred_commits = deferred_sink.commits();
        assert_eq!(eager_commits.len(), 3);
        assert_eq!(deferred_commits.len(), 1);
        assert_eq!(eager_commits.last(), deferred_commits.last());
    }
}
