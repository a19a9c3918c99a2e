//! Keyed selection sets for grid rows.

use std::collections::HashSet;

/// A mutable selection set keyed by row identifier.
///
/// A grid holds two of these: a multi-select instance backing the checkbox
/// column and a single-select instance backing click-to-select. In single
/// mode, selecting a row replaces the previous selection.
///
/// # Example
///
/// ```
/// use tablegrid::SelectionModel;
///
/// let mut checked = SelectionModel::multi();
/// checked.select("1");
/// checked.select("2");
/// assert!(checked.is_selected("1"));
/// assert_eq!(checked.len(), 2);
///
/// let mut clicked = SelectionModel::single();
/// clicked.select("1");
/// clicked.select("2");
/// assert_eq!(clicked.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionModel {
    multiple: bool,
    keys: HashSet<String>,
}

impl SelectionModel {
    /// Creates a multi-select set.
    pub fn multi() -> Self {
        Self {
            multiple: true,
            keys: HashSet::new(),
        }
    }

    /// Creates a single-select set.
    pub fn single() -> Self {
        Self {
            multiple: false,
            keys: HashSet::new(),
        }
    }

    /// Selects a row by identifier.
    ///
    /// In single mode this replaces any previous selection.
    pub fn select(&mut self, id: impl Into<String>) {
        if !self.multiple {
            self.keys.clear();
        }
        self.keys.insert(id.into());
    }

    /// Removes a row from the selection.
    pub fn deselect(&mut self, id: &str) {
        self.keys.remove(id);
    }

    /// Toggles a row's membership.
    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.deselect(id);
        } else {
            self.select(id);
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.keys.contains(id)
    }

    /// Returns `true` if anything at all is selected.
    pub fn has_value(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Returns the number of selected rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
