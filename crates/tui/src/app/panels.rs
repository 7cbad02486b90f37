//! Hotkey-owning panels of the performer page.
//!
//! Each panel holds a `HotkeyScope`; mounting a panel binds its keys and
//! dropping it releases them, uncovering whatever was bound underneath.

use crate::action::{Action, ActionQueue, Tab};
use crate::hotkeys::{HotkeyRegistry, HotkeyScope};

/// `r 0` clears the rating, `r 1`..`r 5` set it.
pub const RATING_COMBOS: [&str; 6] = ["r 0", "r 1", "r 2", "r 3", "r 4", "r 5"];

/// Save binding; only present while the editor has unsaved changes.
pub const SAVE_COMBO: &str = "s s";

fn rating_for(index: usize) -> Option<u8> {
    u8::try_from(index).ok().filter(|rating| *rating > 0)
}

/// The read-only performer view.
#[derive(Debug)]
pub struct PerformerPanel {
    scope: HotkeyScope,
    actions: ActionQueue,
}

impl PerformerPanel {
    pub fn mount(registry: &HotkeyRegistry, actions: &ActionQueue) -> Self {
        let panel = Self {
            scope: registry.scope(),
            actions: actions.clone(),
        };

        panel.scope.bind("e", actions.emitter(Action::OpenEditor));
        panel.scope.bind("f", actions.emitter(Action::ToggleFavorite));
        for (index, combo) in RATING_COMBOS.iter().enumerate() {
            panel
                .scope
                .bind(*combo, actions.emitter(Action::SetRating(rating_for(index))));
        }
        panel.bind_tabs();
        panel
    }

    /// Bind the tab keys. Safe to call repeatedly.
    pub fn bind_tabs(&self) {
        for (tab, key) in Tab::ALL {
            self.scope
                .bind(key, self.actions.emitter(Action::SelectTab(tab)));
        }
    }

    /// Release the tab keys while another panel needs them.
    pub fn unbind_tabs(&self) {
        for (_, key) in Tab::ALL {
            self.scope.unbind(key);
        }
    }

    pub fn scope(&self) -> &HotkeyScope {
        &self.scope
    }
}

/// The performer editor. Shadows the rating keys with draft edits.
#[derive(Debug)]
pub struct EditPanel {
    scope: HotkeyScope,
    actions: ActionQueue,
    saved_rating: Option<u8>,
    draft_rating: Option<u8>,
}

impl EditPanel {
    pub fn mount(registry: &HotkeyRegistry, actions: &ActionQueue, saved_rating: Option<u8>) -> Self {
        let panel = Self {
            scope: registry.scope(),
            actions: actions.clone(),
            saved_rating,
            draft_rating: saved_rating,
        };

        panel.scope.bind("esc", actions.emitter(Action::CloseEditor));
        panel.scope.bind("d d", actions.emitter(Action::DiscardDraft));
        for (index, combo) in RATING_COMBOS.iter().enumerate() {
            panel.scope.bind(
                *combo,
                actions.emitter(Action::SetDraftRating(rating_for(index))),
            );
        }
        panel.sync_save_binding();
        panel
    }

    pub fn draft_rating(&self) -> Option<u8> {
        self.draft_rating
    }

    pub fn is_dirty(&self) -> bool {
        self.draft_rating != self.saved_rating
    }

    pub fn set_draft_rating(&mut self, rating: Option<u8>) {
        self.draft_rating = rating;
        self.sync_save_binding();
    }

    pub fn scope(&self) -> &HotkeyScope {
        &self.scope
    }

    // Re-bound on every change; the scope replaces rather than stacks.
    fn sync_save_binding(&self) {
        if self.is_dirty() {
            self.scope
                .bind(SAVE_COMBO, self.actions.emitter(Action::SaveDraft));
        } else {
            self.scope.unbind(SAVE_COMBO);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::hotkeys::SequenceListener;

    fn registry() -> HotkeyRegistry {
        HotkeyRegistry::new(SequenceListener::new(Duration::from_secs(1)))
    }

    #[test]
    fn test_rating_for_index() {
        assert_eq!(rating_for(0), None);
        assert_eq!(rating_for(3), Some(3));
    }

    #[test]
    fn test_performer_panel_binds_page_keys() {
        let registry = registry();
        let panel = PerformerPanel::mount(&registry, &ActionQueue::new());

        for combo in ["e", "f", "r 0", "r 5", "a", "s", "l", "i", "m"] {
            assert_eq!(registry.depth(combo), 1, "{combo}");
        }
        assert_eq!(panel.scope().len(), 2 + RATING_COMBOS.len() + Tab::ALL.len());
    }

    #[test]
    fn test_unbind_tabs_leaves_other_keys() {
        let registry = registry();
        let panel = PerformerPanel::mount(&registry, &ActionQueue::new());
        panel.unbind_tabs();

        assert!(!registry.is_bound("s"));
        assert!(registry.is_bound("f"));

        panel.bind_tabs();
        panel.bind_tabs();
        assert_eq!(registry.depth("s"), 1);
    }

    #[test]
    fn test_edit_panel_shadows_ratings_then_uncovers() {
        let registry = registry();
        let actions = ActionQueue::new();
        let _performer = PerformerPanel::mount(&registry, &actions);

        let editor = EditPanel::mount(&registry, &actions, Some(2));
        assert_eq!(registry.depth("r 3"), 2);
        registry.dispatch("r 3");
        assert_eq!(actions.drain()[0].1, Action::SetDraftRating(Some(3)));

        drop(editor);
        assert_eq!(registry.depth("r 3"), 1);
        registry.dispatch("r 3");
        assert_eq!(actions.drain()[0].1, Action::SetRating(Some(3)));
    }

    #[test]
    fn test_save_binding_tracks_dirty_state() {
        let registry = registry();
        let mut editor = EditPanel::mount(&registry, &ActionQueue::new(), Some(4));
        assert!(!registry.is_bound(SAVE_COMBO));

        editor.set_draft_rating(Some(1));
        editor.set_draft_rating(Some(2));
        assert!(editor.is_dirty());
        assert_eq!(registry.depth(SAVE_COMBO), 1);

        editor.set_draft_rating(Some(4));
        assert!(!registry.is_bound(SAVE_COMBO));
    }
}
