use std::collections::{BTreeMap, BTreeSet};

use shared::{EntityId, Snapshot};

/// What the table container should show after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TableUpdate {
    /// Replaces the container content verbatim.
    pub html: String,
    /// Field ids to reveal with the shuffle animation.
    pub changed_fields: BTreeSet<String>,
    /// Row to mark as clicked.
    pub selected_row: Option<EntityId>,
}

/// Remembers the last displayed field values to spot changes between ticks.
#[derive(Debug, Clone, Default)]
pub struct TableReconciler {
    displayed: BTreeMap<String, String>,
}

impl TableReconciler {
    /// Diffs against the values shown so far, then adopts `snapshot`'s.
    pub fn apply(&mut self, snapshot: &Snapshot, selected: Option<&EntityId>) -> TableUpdate {
        let changed_fields = changed_fields(&self.displayed, &snapshot.field_values);
        self.displayed = snapshot.field_values.clone();

        TableUpdate {
            html: snapshot.table_fragment.clone(),
            changed_fields,
            selected_row: selected.cloned(),
        }
    }

    pub fn displayed_value(&self, field_id: &str) -> Option<&str> {
        self.displayed.get(field_id).map(String::as_str)
    }
}

/// Ids displayed before whose value is now different.
/// Fields new to this tick have nothing to animate from.
pub fn changed_fields(
    previous: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
) -> BTreeSet<String> {
    current
        .iter()
        .filter(|(id, value)| previous.get(*id).is_some_and(|old| old != *value))
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect()
    }

    fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
        Snapshot {
            table_fragment: format!("<table>{}</table>", pairs.len()),
            field_values: values(pairs),
            ..Snapshot::default()
        }
    }

    #[test]
    fn detects_exactly_the_changed_field() {
        let changed = changed_fields(&values(&[("a", "1"), ("b", "2")]), &values(&[("a", "1"), ("b", "3")]));
        assert_eq!(changed, BTreeSet::from(["b".to_string()]));
    }

    #[test]
    fn new_and_removed_fields_are_not_animated() {
        let changed = changed_fields(&values(&[("a", "1"), ("gone", "x")]), &values(&[("a", "1"), ("new", "y")]));
        assert!(changed.is_empty());
    }

    #[test]
    fn first_tick_animates_nothing() {
        let mut table = TableReconciler::default();
        let update = table.apply(&snapshot(&[("speed", "40")]), None);

        assert!(update.changed_fields.is_empty());
        assert_eq!(update.html, "<table>1</table>");
        assert_eq!(table.displayed_value("speed"), Some("40"));
    }

    #[test]
    fn diff_runs_against_previous_tick() {
        let mut table = TableReconciler::default();
        table.apply(&snapshot(&[("speed", "40"), ("mp", "12.5")]), None);

        let update = table.apply(&snapshot(&[("speed", "45"), ("mp", "12.5")]), Some(&"Loco 1001".into()));
        assert_eq!(update.changed_fields, BTreeSet::from(["speed".to_string()]));
        assert_eq!(update.selected_row, Some("Loco 1001".into()));

        let update = table.apply(&snapshot(&[("speed", "45"), ("mp", "12.5")]), None);
        assert!(update.changed_fields.is_empty());
        assert_eq!(update.selected_row, None);
    }
}
