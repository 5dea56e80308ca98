use shared::{ContentRequest, EntityId, EntityKind};

/// Which entity the user picked in the table, and which locomotive's
/// info-window survives refreshes.
///
/// `persist_id` only ever holds a locomotive id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected_id: Option<EntityId>,
    persist_id: Option<EntityId>,
}

/// What a table click did, beyond the selection itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    /// A persisting locomotive that lost persistence to the new selection.
    pub released: Option<EntityId>,
    /// Request for the out-of-cadence refresh every click triggers.
    pub refresh: ContentRequest,
}

impl SelectionState {
    pub fn selected_id(&self) -> Option<&EntityId> {
        self.selected_id.as_ref()
    }

    pub fn persist_id(&self) -> Option<&EntityId> {
        self.persist_id.as_ref()
    }

    pub fn is_persisting(&self, id: &EntityId) -> bool {
        self.persist_id.as_ref() == Some(id)
    }

    /// Toggles `id` as the selection.
    ///
    /// Selecting anything other than the persisting locomotive releases it;
    /// selecting a locomotive while none persists makes it the persisting one.
    pub fn select(&mut self, id: EntityId, kind: EntityKind) -> SelectionChange {
        let mut released = None;

        if self.selected_id.as_ref() == Some(&id) {
            self.selected_id = None;
        } else {
            if self.persist_id.as_ref().is_some_and(|persisting| *persisting != id) {
                released = self.persist_id.take();
            }
            if kind.is_locomotive() && self.persist_id.is_none() {
                self.persist_id = Some(id.clone());
            }
            self.selected_id = Some(id);
        }

        SelectionChange {
            released,
            refresh: self.content_request(),
        }
    }

    pub fn content_request(&self) -> ContentRequest {
        ContentRequest {
            selected_entity_id: self.selected_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_twice_restores_selection() {
        for id in ["Loco 1001", "Loco 1002", "Base1"] {
            let mut selection = SelectionState::default();
            let before = selection.selected_id().cloned();

            selection.select(id.into(), EntityKind::Locomotive);
            assert_eq!(selection.selected_id(), Some(&EntityId::from(id)));

            selection.select(id.into(), EntityKind::Locomotive);
            assert_eq!(selection.selected_id().cloned(), before);
        }
    }

    #[test]
    fn reselecting_from_another_selection_toggles_back() {
        let mut selection = SelectionState::default();
        selection.select("Loco 1001".into(), EntityKind::Locomotive);

        selection.select("Loco 1002".into(), EntityKind::Locomotive);
        selection.select("Loco 1002".into(), EntityKind::Locomotive);

        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn first_locomotive_selection_persists() {
        let mut selection = SelectionState::default();
        let change = selection.select("Loco1001".into(), EntityKind::Locomotive);

        assert_eq!(selection.selected_id(), Some(&"Loco1001".into()));
        assert_eq!(selection.persist_id(), Some(&"Loco1001".into()));
        assert_eq!(change.released, None);
        assert_eq!(change.refresh.selected_entity_id, Some("Loco1001".into()));
    }

    #[test]
    fn selecting_other_locomotive_moves_persistence() {
        let mut selection = SelectionState::default();
        selection.select("L".into(), EntityKind::Locomotive);

        let change = selection.select("M".into(), EntityKind::Locomotive);

        assert_eq!(change.released, Some("L".into()));
        assert_eq!(selection.persist_id(), Some(&"M".into()));
    }

    #[test]
    fn non_locomotive_never_persists() {
        let mut selection = SelectionState::default();
        selection.select("L".into(), EntityKind::Locomotive);

        let change = selection.select("Base1".into(), EntityKind::Base);

        assert_eq!(change.released, Some("L".into()));
        assert_eq!(selection.persist_id(), None);
        assert_eq!(selection.selected_id(), Some(&"Base1".into()));
    }

    #[test]
    fn deselect_keeps_persistence() {
        let mut selection = SelectionState::default();
        selection.select("L".into(), EntityKind::Locomotive);

        let change = selection.select("L".into(), EntityKind::Locomotive);

        assert_eq!(change.released, None);
        assert_eq!(change.refresh.selected_entity_id, None);
        assert!(selection.is_persisting(&"L".into()));
    }
}
