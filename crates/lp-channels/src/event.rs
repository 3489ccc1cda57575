//! Events flowing between views, channels and the hardware layer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lp_core::{ChannelId, ViewId};

use crate::menu::MenuAction;
use crate::signal::SignalGate;

/// Why a value or state is being set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateKind {
    /// A new target (user edit, script): a change is forwarded to the
    /// hardware callback.
    #[default]
    Target,
    /// Externally observed hardware state reflected into the UI: never
    /// forwarded, so hardware -> UI -> hardware loops cannot form.
    Readback,
}

/// User interaction raised by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The unit selector moved to `index` in the shared unit list.
    UnitSelected { index: usize },
    /// The value control was edited; `value` is in the displayed unit.
    ValueEdited { value: f64 },
    /// The toggle control was switched.
    Toggled { state: bool },
    /// An entry of the channel's context menu was activated.
    MenuActivated(MenuAction),
}

impl ViewEvent {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::UnitSelected { .. } => "unit selection",
            Self::ValueEdited { .. } => "value edits",
            Self::Toggled { .. } => "toggles",
            Self::MenuActivated(MenuAction::ToggleLock) => "lock requests",
            Self::MenuActivated(MenuAction::SetLimits) => "limit requests",
        }
    }
}

/// Event waiting in a channel's queue.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedEvent {
    pub view: ViewId,
    pub event: ViewEvent,
}

pub(crate) type EventQueue = Rc<RefCell<VecDeque<PostedEvent>>>;

/// Handle a view uses to raise events into its channel.
///
/// Holds only the view's id and the channel's queue, never the channel
/// itself. Events posted while the channel is driving this view are dropped.
#[derive(Debug, Clone)]
pub struct ViewPort {
    view: ViewId,
    gate: SignalGate,
    queue: EventQueue,
}

impl ViewPort {
    pub(crate) fn new(view: ViewId, gate: SignalGate, queue: EventQueue) -> Self {
        Self { view, gate, queue }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Queue `event` for the channel. Returns `false` if it was suppressed.
    pub fn post(&self, event: ViewEvent) -> bool {
        if self.gate.is_blocked() {
            return false;
        }
        self.queue.borrow_mut().push_back(PostedEvent {
            view: self.view,
            event,
        });
        true
    }
}

/// Change forwarded to the hardware layer.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputUpdate {
    /// New analog target, in the channel's hardware unit.
    Analog {
        channel: ChannelId,
        name: String,
        value: f64,
    },
    /// New digital target.
    Digital {
        channel: ChannelId,
        name: String,
        state: bool,
    },
}

impl OutputUpdate {
    pub fn channel(&self) -> &ChannelId {
        match self {
            Self::Analog { channel, .. } | Self::Digital { channel, .. } => channel,
        }
    }
}

/// "Apply to hardware" hook invoked for user-originated changes.
pub type UpdateCallback = Box<dyn FnMut(&OutputUpdate)>;

/// Outcome of draining a channel's event queue.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Events processed without error.
    pub handled: usize,
    /// Events that were rejected, with the reason.
    pub rejected: Vec<(PostedEvent, crate::error::ChannelError)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_port_drops_events() {
        let queue = EventQueue::default();
        let gate = SignalGate::new();
        let port = ViewPort::new(ViewId::from_index(0), gate.clone(), Rc::clone(&queue));

        assert!(port.post(ViewEvent::ValueEdited { value: 1.0 }));
        {
            let _block = gate.block();
            assert!(!port.post(ViewEvent::ValueEdited { value: 2.0 }));
        }
        assert_eq!(queue.borrow().len(), 1);
        assert_eq!(
            queue.borrow().front().map(|p| p.event.clone()),
            Some(ViewEvent::ValueEdited { value: 1.0 })
        );
    }

    #[test]
    fn update_kind_defaults_to_target() {
        assert_eq!(UpdateKind::default(), UpdateKind::Target);
    }
}
