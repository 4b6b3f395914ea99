//! Filtering and sorting of the remedial-action list.

use super::domain::{ActionPriority, ActionStatus, RemedialAction};

/// Conjunctive filter: every populated criterion must match.
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    /// `None` admits every status.
    pub status: Option<ActionStatus>,
    /// `None` admits every priority.
    pub priority: Option<ActionPriority>,
    /// Case-insensitive substring matched against title or description.
    pub search: String,
}

impl ActionFilter {
    pub fn matches(&self, action: &RemedialAction) -> bool {
        let status_ok = self.status.map_or(true, |status| action.status == status);
        let priority_ok = self
            .priority
            .map_or(true, |priority| action.priority == priority);
        let needle = self.search.to_lowercase();
        let search_ok = needle.is_empty()
            || action.title.to_lowercase().contains(&needle)
            || action.description.to_lowercase().contains(&needle);

        status_ok && priority_ok && search_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Priority,
    Status,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for ActionSort {
    fn default() -> Self {
        Self {
            key: SortKey::DueDate,
            direction: SortDirection::Ascending,
        }
    }
}

impl ActionSort {
    /// Clicking the active column flips direction; a new column starts over
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Filter and sort a snapshot of the catalog.
pub fn select(
    actions: &[RemedialAction],
    filter: &ActionFilter,
    sort: ActionSort,
) -> Vec<RemedialAction> {
    let mut selected: Vec<RemedialAction> = actions
        .iter()
        .filter(|action| filter.matches(action))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortKey::Status => a.status.rank().cmp(&b.status.rank()),
            SortKey::DueDate => a.due_date.cmp(&b.due_date),
        };
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    selected
}
