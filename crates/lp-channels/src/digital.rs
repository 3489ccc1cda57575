//! Digital output channel.
//!
//! Views share one boolean toggle state. Interactive toggles honour the
//! channel lock; programmatic updates do not.

use std::fmt;

use lp_core::{ChannelId, NumericInput, ViewId};
use tracing::debug;

use crate::error::{ChannelError, ChannelResult};
use crate::event::{DispatchSummary, OutputUpdate, UpdateCallback, UpdateKind, ViewEvent};
use crate::menu::{ChannelListener, ContextMenu, MenuAction};
use crate::signal::SignalGate;
use crate::view::{DigitalView, ViewSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalChannelConfig {
    pub name: String,
    pub channel: ChannelId,
}

impl DigitalChannelConfig {
    pub fn new(name: impl Into<String>, channel: impl Into<ChannelId>) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
        }
    }
}

/// Digital output bound to one or more toggle views.
pub struct DigitalChannel {
    name: String,
    channel: ChannelId,
    /// Name of the shared toggle action: channel id and display name on two lines.
    label: String,
    state: bool,
    value_gate: SignalGate,
    locked: bool,
    views: ViewSet<dyn DigitalView>,
    on_update: UpdateCallback,
    listeners: Vec<Box<dyn ChannelListener>>,
}

impl DigitalChannel {
    /// Create the channel, initially off and unlocked, and bind `initial_view`.
    pub fn new(
        config: DigitalChannelConfig,
        initial_view: impl DigitalView + 'static,
        on_update: impl FnMut(&OutputUpdate) + 'static,
    ) -> Self {
        let label = format!("{}\n{}", config.channel, config.name);
        let mut channel = Self {
            name: config.name,
            channel: config.channel,
            label,
            state: false,
            value_gate: SignalGate::new(),
            locked: false,
            views: ViewSet::new(),
            on_update: Box::new(on_update),
            listeners: Vec::new(),
        };
        channel.bind_view(initial_view);
        channel
    }

    /// Attach another view to the shared toggle state.
    pub fn bind_view(&mut self, view: impl DigitalView + 'static) -> ViewId {
        let label = self.label.as_str();
        let state = self.state;
        let sensitive = !self.locked;
        let id = self.views.bind(Box::new(view), |v, port| {
            v.attach(port, label);
            v.render(state);
            v.set_sensitive(sensitive);
        });
        debug!(channel = %self.channel, view = %id, "digital view bound");
        id
    }

    pub fn add_listener(&mut self, listener: impl ChannelListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current state.
    pub fn state(&self) -> bool {
        self.state
    }

    /// Set the state from a truthy input.
    ///
    /// Numbers are true when non-zero; text must hold an integer. A change
    /// is forwarded to the hardware callback for [`UpdateKind::Target`] only.
    /// Returns `Ok(false)` without side effects when the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if `input` cannot be interpreted as a flag.
    pub fn set_state(
        &mut self,
        input: impl Into<NumericInput>,
        kind: UpdateKind,
    ) -> ChannelResult<bool> {
        let state = input.into().to_flag()?;
        let _block = (kind == UpdateKind::Readback).then(|| self.value_gate.block());
        Ok(self.apply(state))
    }

    /// A view's toggle was switched by the user.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Locked`] while the channel is locked; every view is
    /// reset to the current state.
    pub fn on_toggled(&mut self, view: ViewId, state: bool) -> ChannelResult<bool> {
        self.ensure_view(view)?;
        if self.locked {
            let state = self.state;
            self.views.update_each(|v| v.render(state));
            return Err(ChannelError::Locked {
                channel: self.channel.clone(),
            });
        }
        Ok(self.apply(state))
    }

    /// Process one event raised by `view`. Returns whether channel state changed.
    pub fn handle(&mut self, view: ViewId, event: ViewEvent) -> ChannelResult<bool> {
        self.ensure_view(view)?;
        match event {
            ViewEvent::Toggled { state } => self.on_toggled(view, state),
            ViewEvent::MenuActivated(MenuAction::ToggleLock) => {
                self.toggle_lock();
                Ok(true)
            }
            other => Err(ChannelError::UnsupportedEvent {
                channel: self.channel.clone(),
                what: other.describe(),
            }),
        }
    }

    /// Handle every event the views have posted so far.
    pub fn dispatch_pending(&mut self) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        while let Some(posted) = self.views.next_event() {
            match self.handle(posted.view, posted.event.clone()) {
                Ok(_) => summary.handled += 1,
                Err(error) => {
                    debug!(channel = %self.channel, %error, "view event rejected");
                    summary.rejected.push((posted, error));
                }
            }
        }
        summary
    }

    pub fn lock(&mut self) -> bool {
        self.set_locked(true)
    }

    pub fn unlock(&mut self) -> bool {
        self.set_locked(false)
    }

    pub fn toggle_lock(&mut self) {
        self.set_locked(!self.locked);
    }

    /// Right-click menu: the lock entry only.
    pub fn context_menu(&self) -> ContextMenu {
        ContextMenu::new(vec![ContextMenu::lock_entry(self.locked)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.views.ids()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn pending_events(&self) -> usize {
        self.views.pending()
    }

    fn ensure_view(&self, view: ViewId) -> ChannelResult<()> {
        if self.views.contains(view) {
            Ok(())
        } else {
            Err(ChannelError::UnknownView {
                channel: self.channel.clone(),
                view,
            })
        }
    }

    fn apply(&mut self, state: bool) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.views.update_each(|v| v.render(state));
        if !self.value_gate.is_blocked() {
            let update = OutputUpdate::Digital {
                channel: self.channel.clone(),
                name: self.name.clone(),
                state,
            };
            debug!(channel = %self.channel, state, "forwarding digital target");
            (self.on_update)(&update);
        }
        true
    }

    fn set_locked(&mut self, locked: bool) -> bool {
        if self.locked == locked {
            return false;
        }
        self.locked = locked;
        self.views.update_each(|v| v.set_sensitive(!locked));
        debug!(channel = %self.channel, locked, "digital lock changed");
        for listener in &mut self.listeners {
            listener.lock_changed(&self.channel, locked);
        }
        true
    }
}

impl fmt::Debug for DigitalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalChannel")
            .field("name", &self.name)
            .field("channel", &self.channel)
            .field("state", &self.state)
            .field("locked", &self.locked)
            .field("views", &self.views.len())
            .finish()
    }
}
