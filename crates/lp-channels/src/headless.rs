//! Views without a toolkit behind them.
//!
//! They record everything the channel shows them and mimic a widget toolkit
//! by echoing every programmatic change back through their port, so that
//! suppression can be observed. Clones share state: keep one clone to
//! inspect the view after handing the other to a channel.

use std::cell::RefCell;
use std::rc::Rc;

use lp_core::{UnitId, ViewId};

use crate::adjustment::Adjustment;
use crate::event::{ViewEvent, ViewPort};
use crate::menu::MenuAction;
use crate::view::{AnalogView, DigitalView};

#[derive(Debug, Default)]
struct AnalogState {
    port: Option<ViewPort>,
    units: Vec<UnitId>,
    selected: Option<usize>,
    shown: Option<Adjustment>,
    sensitive: bool,
    renders: usize,
    suppressed: usize,
}

impl AnalogState {
    fn echo(&mut self, event: ViewEvent) {
        if let Some(port) = &self.port
            && !port.post(event)
        {
            self.suppressed += 1;
        }
    }

    fn post(&self, event: ViewEvent) -> bool {
        self.port.as_ref().is_some_and(|p| p.post(event))
    }
}

/// Analog view recording what it is shown.
#[derive(Debug, Clone, Default)]
pub struct HeadlessAnalogView {
    state: Rc<RefCell<AnalogState>>,
}

impl HeadlessAnalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id assigned by the channel, once attached.
    pub fn view_id(&self) -> Option<ViewId> {
        self.state.borrow().port.as_ref().map(ViewPort::view)
    }

    pub fn units(&self) -> Vec<UnitId> {
        self.state.borrow().units.clone()
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    /// Unit shown by the selector.
    pub fn selected_unit_id(&self) -> Option<UnitId> {
        let state = self.state.borrow();
        state.selected.and_then(|i| state.units.get(i).cloned())
    }

    pub fn shown(&self) -> Option<Adjustment> {
        self.state.borrow().shown
    }

    pub fn displayed_value(&self) -> Option<f64> {
        self.shown().map(|a| a.value())
    }

    pub fn is_sensitive(&self) -> bool {
        self.state.borrow().sensitive
    }

    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    /// Echoes dropped because the channel was driving this view.
    pub fn suppressed_echoes(&self) -> usize {
        self.state.borrow().suppressed
    }

    /// The user picks unit `index`. Returns whether an event was posted.
    pub fn choose_unit(&self, index: usize) -> bool {
        let mut state = self.state.borrow_mut();
        if state.selected == Some(index) {
            return false;
        }
        state.selected = Some(index);
        state.post(ViewEvent::UnitSelected { index })
    }

    /// The user types `value` into the value control. Sensitivity is not
    /// emulated: the edit is posted and left for the channel to judge.
    pub fn edit_value(&self, value: f64) -> bool {
        self.state.borrow().post(ViewEvent::ValueEdited { value })
    }

    pub fn activate(&self, action: MenuAction) -> bool {
        self.state.borrow().post(ViewEvent::MenuActivated(action))
    }
}

impl AnalogView for HeadlessAnalogView {
    fn attach(&mut self, port: ViewPort, units: &[UnitId]) {
        let mut state = self.state.borrow_mut();
        state.port = Some(port);
        state.units = units.to_vec();
    }

    fn select_unit(&mut self, index: usize) {
        let mut state = self.state.borrow_mut();
        state.selected = Some(index);
        state.echo(ViewEvent::UnitSelected { index });
    }

    fn selected_unit(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    fn render(&mut self, adjustment: &Adjustment) {
        let mut state = self.state.borrow_mut();
        state.shown = Some(*adjustment);
        state.renders += 1;
        state.echo(ViewEvent::ValueEdited {
            value: adjustment.value(),
        });
    }

    fn set_sensitive(&mut self, sensitive: bool) {
        self.state.borrow_mut().sensitive = sensitive;
    }
}

#[derive(Debug, Default)]
struct DigitalState {
    port: Option<ViewPort>,
    label: String,
    shown: bool,
    sensitive: bool,
    renders: usize,
    suppressed: usize,
}

/// Toggle view recording what it is shown.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDigitalView {
    state: Rc<RefCell<DigitalState>>,
}

impl HeadlessDigitalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.state.borrow().port.as_ref().map(ViewPort::view)
    }

    pub fn label(&self) -> String {
        self.state.borrow().label.clone()
    }

    pub fn shown(&self) -> bool {
        self.state.borrow().shown
    }

    pub fn is_sensitive(&self) -> bool {
        self.state.borrow().sensitive
    }

    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    pub fn suppressed_echoes(&self) -> usize {
        self.state.borrow().suppressed
    }

    /// The user clicks the toggle. Returns whether an event was posted.
    pub fn press(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.shown = !state.shown;
        let event = ViewEvent::Toggled { state: state.shown };
        state.port.as_ref().is_some_and(|p| p.post(event))
    }

    pub fn activate(&self, action: MenuAction) -> bool {
        let state = self.state.borrow();
        state
            .port
            .as_ref()
            .is_some_and(|p| p.post(ViewEvent::MenuActivated(action)))
    }
}

impl DigitalView for HeadlessDigitalView {
    fn attach(&mut self, port: ViewPort, label: &str) {
        let mut state = self.state.borrow_mut();
        state.port = Some(port);
        state.label = label.to_owned();
    }

    fn render(&mut self, shown: bool) {
        let mut state = self.state.borrow_mut();
        state.shown = shown;
        state.renders += 1;
        let dropped = state
            .port
            .as_ref()
            .is_some_and(|p| !p.post(ViewEvent::Toggled { state: shown }));
        if dropped {
            state.suppressed += 1;
        }
    }

    fn set_sensitive(&mut self, sensitive: bool) {
        self.state.borrow_mut().sensitive = sensitive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventQueue;
    use crate::signal::SignalGate;

    #[test]
    fn echoes_are_counted_when_gate_is_closed() {
        let queue = EventQueue::default();
        let gate = SignalGate::new();
        let mut view = HeadlessAnalogView::new();
        view.attach(
            ViewPort::new(ViewId::from_index(0), gate.clone(), Rc::clone(&queue)),
            &[UnitId::new("V"), UnitId::new("mV")],
        );

        {
            let _block = gate.block();
            view.select_unit(1);
        }
        assert_eq!(view.suppressed_echoes(), 1);
        assert!(queue.borrow().is_empty());

        view.select_unit(0);
        assert_eq!(queue.borrow().len(), 1);
        assert_eq!(view.selected_unit_id(), Some(UnitId::new("V")));
    }

    #[test]
    fn unattached_view_posts_nothing() {
        let view = HeadlessDigitalView::new();
        assert!(!view.press());
        assert!(view.shown());
        assert_eq!(view.view_id(), None);
    }
}
