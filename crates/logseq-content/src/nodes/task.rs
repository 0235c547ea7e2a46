use std::fmt;

use super::{Kind, NodeId, NodeKind, Tree};

/// Status keyword that can open a block's first paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
    Later,
    Now,
    Cancelled,
    Canceled,
    InProgress,
    Wait,
    Waiting,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 10] = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Done,
        TaskStatus::Later,
        TaskStatus::Now,
        TaskStatus::Cancelled,
        TaskStatus::Canceled,
        TaskStatus::InProgress,
        TaskStatus::Wait,
        TaskStatus::Waiting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::Doing => "DOING",
            TaskStatus::Done => "DONE",
            TaskStatus::Later => "LATER",
            TaskStatus::Now => "NOW",
            TaskStatus::Cancelled => "CANCELLED",
            TaskStatus::Canceled => "CANCELED",
            TaskStatus::InProgress => "IN-PROGRESS",
            TaskStatus::Wait => "WAIT",
            TaskStatus::Waiting => "WAITING",
        }
    }

    /// Matches a keyword exactly (keywords are case-sensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == keyword)
    }

    /// Whether the task counts as finished.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            TaskStatus::Done | TaskStatus::Cancelled | TaskStatus::Canceled
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tree {
    /// Task marker of an outline block, if its first paragraph starts with one.
    pub fn task_status(&self, block: NodeId) -> Option<TaskStatus> {
        let paragraph = self.first_paragraph(block)?;
        match self.first_child(paragraph).map(|c| self.kind(c)) {
            Some(NodeKind::TaskMarker { status }) => Some(*status),
            _ => None,
        }
    }

    /// Sets or clears the task marker of an outline block.
    ///
    /// Adding a marker to a block without a paragraph creates one.
    pub fn set_task_status(&mut self, block: NodeId, status: Option<TaskStatus>) {
        let existing = self.first_paragraph(block).and_then(|p| {
            self.first_child(p)
                .filter(|&c| self.tag(c) == Kind::TaskMarker)
        });

        match (existing, status) {
            (Some(marker), Some(status)) => {
                *self.kind_mut(marker) = NodeKind::TaskMarker { status };
            }
            (Some(marker), None) => self.remove_self(marker),
            (None, Some(status)) => {
                let paragraph = match self.first_paragraph(block) {
                    Some(p) => p,
                    None => {
                        let p = self.alloc(NodeKind::Paragraph {
                            previous_line: Default::default(),
                        });
                        self.prepend_child(block, p);
                        p
                    }
                };
                let marker = self.alloc(NodeKind::TaskMarker { status });
                self.prepend_child(paragraph, marker);
            }
            (None, None) => {}
        }
    }

    fn first_paragraph(&self, block: NodeId) -> Option<NodeId> {
        self.children(block)
            .find(|&c| self.tag(c) != Kind::Properties)
            .filter(|&c| self.tag(c) == Kind::Paragraph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build::{block, task_marker, text};

    #[test]
    fn keywords_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_keyword(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_keyword("todo"), None);
    }

    #[test]
    fn reads_and_updates_status() {
        // Given a block whose paragraph starts with a TODO marker
        let mut tree = Tree::new();
        let b = tree.insert(block([task_marker(TaskStatus::Todo), text("Task")]));
        assert_eq!(tree.task_status(b), Some(TaskStatus::Todo));

        // When it is marked done
        tree.set_task_status(b, Some(TaskStatus::Done));

        // Then the marker changes in place
        assert_eq!(tree.task_status(b), Some(TaskStatus::Done));

        tree.set_task_status(b, None);
        assert_eq!(tree.task_status(b), None);
    }

    #[test]
    fn adds_marker_to_plain_block() {
        let mut tree = Tree::new();
        let b = tree.insert(block([text("Task")]));

        tree.set_task_status(b, Some(TaskStatus::Later));

        assert_eq!(tree.task_status(b), Some(TaskStatus::Later));
    }
}
