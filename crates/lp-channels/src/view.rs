//! Capabilities channels require from the UI layer, and the channel-owned
//! collection of bound views.

use std::rc::Rc;

use lp_core::{UnitId, ViewId};

use crate::adjustment::Adjustment;
use crate::event::{EventQueue, PostedEvent, ViewPort};
use crate::signal::SignalGate;

/// Value control plus unit selector presenting an analog channel.
///
/// Implementations report user interaction only through the [`ViewPort`]
/// received in [`attach`](AnalogView::attach).
pub trait AnalogView {
    /// Bind to the channel: keep `port` for raising events and show `units`
    /// in the unit selector.
    fn attach(&mut self, port: ViewPort, units: &[UnitId]);

    /// Move the unit selector to `index` in the shared unit list.
    fn select_unit(&mut self, index: usize);

    /// Index currently shown by the unit selector.
    fn selected_unit(&self) -> Option<usize>;

    /// Show the shared value model.
    fn render(&mut self, adjustment: &Adjustment);

    /// Accept (`true`) or refuse interactive edits.
    fn set_sensitive(&mut self, sensitive: bool);
}

/// Toggle control presenting a digital channel.
pub trait DigitalView {
    /// Bind to the channel's toggle action named `label`.
    fn attach(&mut self, port: ViewPort, label: &str);

    /// Show the shared toggle state.
    fn render(&mut self, state: bool);

    /// Accept (`true`) or refuse interactive toggling.
    fn set_sensitive(&mut self, sensitive: bool);
}

struct ViewSlot<V: ?Sized> {
    id: ViewId,
    gate: SignalGate,
    view: Box<V>,
}

/// Ordered, indexable views of one channel plus the channel's event queue.
pub(crate) struct ViewSet<V: ?Sized> {
    slots: Vec<ViewSlot<V>>,
    queue: EventQueue,
}

impl<V: ?Sized> ViewSet<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            queue: EventQueue::default(),
        }
    }

    /// Add `view`, running `setup` with its gate closed so that anything the
    /// view echoes while being initialised is dropped.
    pub(crate) fn bind(&mut self, mut view: Box<V>, setup: impl FnOnce(&mut V, ViewPort)) -> ViewId {
        let id = ViewId::from_index(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        let gate = SignalGate::new();
        let port = ViewPort::new(id, gate.clone(), Rc::clone(&self.queue));
        {
            let _block = gate.block();
            setup(&mut *view, port);
        }
        self.slots.push(ViewSlot { id, gate, view });
        id
    }

    pub(crate) fn contains(&self, id: ViewId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub(crate) fn first(&self) -> Option<&V> {
        self.slots.first().map(|s| &*s.view)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn ids(&self) -> Vec<ViewId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Drive every view, each with its own gate closed.
    pub(crate) fn update_each(&mut self, mut f: impl FnMut(&mut V)) {
        for slot in &mut self.slots {
            let _block = slot.gate.block();
            f(&mut *slot.view);
        }
    }

    pub(crate) fn next_event(&self) -> Option<PostedEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}
