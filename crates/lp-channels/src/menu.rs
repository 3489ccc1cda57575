//! Context-menu affordances and channel listeners.
//!
//! Channels describe their auxiliary menu as data; building and positioning
//! the actual popup belongs to the UI layer, which reports activations back
//! as [`ViewEvent::MenuActivated`](crate::ViewEvent::MenuActivated).

use lp_core::{ChannelId, UnitId};

/// Action behind a context-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Lock or unlock every view of the channel.
    ToggleLock,
    /// Edit the channel limits. Not implemented yet: activating it only
    /// notifies listeners.
    SetLimits,
}

/// One entry of a channel's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
}

/// Entries to insert at the top of a view's context menu, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    entries: Vec<MenuEntry>,
}

impl ContextMenu {
    pub(crate) fn new(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }

    pub(crate) fn lock_entry(locked: bool) -> MenuEntry {
        MenuEntry {
            label: if locked { "Unlock Widget" } else { "Lock Widget" },
            action: MenuAction::ToggleLock,
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn actions(&self) -> Vec<MenuAction> {
        self.entries.iter().map(|e| e.action).collect()
    }
}

/// Observer registered by the UI layer for channel-level changes.
///
/// Every hook has an empty default.
pub trait ChannelListener {
    fn lock_changed(&mut self, _channel: &ChannelId, _locked: bool) {}

    fn unit_changed(&mut self, _channel: &ChannelId, _unit: &UnitId) {}

    fn limits_requested(&mut self, _channel: &ChannelId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_entry_label_follows_state() {
        assert_eq!(ContextMenu::lock_entry(false).label, "Lock Widget");
        assert_eq!(ContextMenu::lock_entry(true).label, "Unlock Widget");
    }
}
