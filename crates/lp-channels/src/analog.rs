//! Analog output channel.
//!
//! The channel owns one [`Adjustment`] shared by all of its views. The model
//! is kept in the current display unit; the hardware-unit value is derived
//! through the calibration whenever it is read or forwarded.
//!
//! Switching the display unit (`on_unit_changed`) rescales the whole model:
//!
//! 1. take `[value, lower, upper, step, page_step]` in the current unit
//! 2. convert to the hardware unit unless already there
//! 3. convert to the new unit unless it is the hardware unit
//! 4. swap `lower`/`upper` if a negative slope inverted them
//! 5. reset the page increment to 0
//!
//! The conversion runs before anything is applied, so a failed conversion
//! leaves the channel and its views untouched.

use std::fmt;
use std::sync::Arc;

use lp_calibration::{
    Calibration, CalibrationParams, CalibrationRegistry, ConfigurationError,
    ConversionDomainError,
};
use lp_core::{ChannelId, NumericInput, UnitId, ViewId, ensure_finite};
use tracing::{debug, warn};

use crate::adjustment::Adjustment;
use crate::error::{ChannelError, ChannelResult};
use crate::event::{DispatchSummary, OutputUpdate, UpdateCallback, UpdateKind, ViewEvent};
use crate::menu::{ChannelListener, ContextMenu, MenuAction, MenuEntry};
use crate::signal::SignalGate;
use crate::view::{AnalogView, ViewSet};

/// Hardware limits of an analog output, in its default unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Calibration kind and parameters requested for a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSpec {
    pub kind: String,
    pub params: CalibrationParams,
}

/// Everything needed to create an [`AnalogChannel`] besides its views and callback.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogChannelConfig {
    pub name: String,
    pub channel: ChannelId,
    /// Unit the hardware is driven in.
    pub default_unit: UnitId,
    pub limits: Limits,
    pub calibration: Option<CalibrationSpec>,
}

impl AnalogChannelConfig {
    pub fn new(
        name: impl Into<String>,
        channel: impl Into<ChannelId>,
        default_unit: impl Into<UnitId>,
        limits: Limits,
    ) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            default_unit: default_unit.into(),
            limits,
            calibration: None,
        }
    }

    pub fn with_calibration(mut self, kind: impl Into<String>, params: CalibrationParams) -> Self {
        self.calibration = Some(CalibrationSpec {
            kind: kind.into(),
            params,
        });
        self
    }
}

/// How a channel's calibration request was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationStatus {
    /// No calibration was requested.
    Uncalibrated,
    /// The requested calibration is active.
    Calibrated { kind: String },
    /// The requested calibration was rejected; the channel only offers its
    /// default unit.
    Fallback {
        kind: String,
        error: ConfigurationError,
    },
}

impl CalibrationStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn error(&self) -> Option<&ConfigurationError> {
        match self {
            Self::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Analog output bound to one or more synchronized views.
pub struct AnalogChannel {
    name: String,
    channel: ChannelId,
    calibration: Option<Arc<dyn Calibration>>,
    status: CalibrationStatus,
    /// Default unit captured at construction.
    ///
    /// `value()`, `set_value()` and `hardware_range()` compare the display
    /// unit against this field, while `on_unit_changed` compares against
    /// `calibration.hardware_unit()`. The two only agree because
    /// `CalibrationRegistry::build` rejects calibrations whose hardware unit
    /// differs from the default unit (`HardwareUnitMismatch`).
    hardware_unit: UnitId,
    units: Vec<UnitId>,
    current_unit: UnitId,
    adjustment: Adjustment,
    value_gate: SignalGate,
    locked: bool,
    views: ViewSet<dyn AnalogView>,
    on_update: UpdateCallback,
    listeners: Vec<Box<dyn ChannelListener>>,
}

impl AnalogChannel {
    /// Create the channel and bind `initial_view` to it.
    ///
    /// A calibration that cannot be built does not fail construction: the
    /// channel falls back to its default unit and reports the problem through
    /// [`calibration_status`](Self::calibration_status).
    ///
    /// # Errors
    ///
    /// Returns error if the limits are not finite, inverted, or the step is
    /// not positive.
    pub fn new(
        config: AnalogChannelConfig,
        initial_view: impl AnalogView + 'static,
        registry: &mut CalibrationRegistry,
        on_update: impl FnMut(&OutputUpdate) + 'static,
    ) -> ChannelResult<Self> {
        let Limits { min, max, step } = config.limits;
        let adjustment = Adjustment::from_limits(min, max, step)?;

        let (calibration, status) = match &config.calibration {
            None => (None, CalibrationStatus::Uncalibrated),
            Some(spec) => match registry.build(&spec.kind, &spec.params, &config.default_unit) {
                Ok(calibration) => (
                    Some(calibration),
                    CalibrationStatus::Calibrated {
                        kind: spec.kind.clone(),
                    },
                ),
                Err(error) => {
                    warn!(
                        channel = %config.channel,
                        kind = %spec.kind,
                        %error,
                        "calibration rejected, channel limited to '{}'",
                        config.default_unit
                    );
                    (
                        None,
                        CalibrationStatus::Fallback {
                            kind: spec.kind.clone(),
                            error,
                        },
                    )
                }
            },
        };

        let units = match &calibration {
            Some(calibration) => calibration.selectable_units(),
            None => vec![config.default_unit.clone()],
        };
        let current_unit = units
            .first()
            .cloned()
            .unwrap_or_else(|| config.default_unit.clone());

        let mut channel = Self {
            name: config.name,
            channel: config.channel,
            calibration,
            status,
            hardware_unit: config.default_unit,
            units,
            current_unit,
            adjustment,
            value_gate: SignalGate::new(),
            locked: false,
            views: ViewSet::new(),
            on_update: Box::new(on_update),
            listeners: Vec::new(),
        };
        channel.bind_view(initial_view);
        Ok(channel)
    }

    /// Attach another synchronized view.
    ///
    /// The view gets the shared unit list, the unit active on the first bound
    /// view, the current value model and the current lock state. Canonical
    /// state is not touched.
    pub fn bind_view(&mut self, view: impl AnalogView + 'static) -> ViewId {
        let active = self
            .views
            .first()
            .and_then(|v| v.selected_unit())
            .unwrap_or(0);
        let units = &self.units;
        let adjustment = self.adjustment;
        let sensitive = !self.locked;
        let id = self.views.bind(Box::new(view), |v, port| {
            v.attach(port, units);
            v.select_unit(active);
            v.render(&adjustment);
            v.set_sensitive(sensitive);
        });
        debug!(channel = %self.channel, view = %id, "analog view bound");
        id
    }

    pub fn add_listener(&mut self, listener: impl ChannelListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Process one event raised by `view`. Returns whether channel state changed.
    pub fn handle(&mut self, view: ViewId, event: ViewEvent) -> ChannelResult<bool> {
        self.ensure_view(view)?;
        match event {
            ViewEvent::UnitSelected { index } => {
                let unit = self
                    .units
                    .get(index)
                    .cloned()
                    .ok_or(ChannelError::Selection {
                        index,
                        len: self.units.len(),
                    })?;
                self.on_unit_changed(view, &unit)
            }
            ViewEvent::ValueEdited { value } => self.on_value_edited(view, value),
            ViewEvent::MenuActivated(MenuAction::ToggleLock) => {
                self.toggle_lock();
                Ok(true)
            }
            ViewEvent::MenuActivated(MenuAction::SetLimits) => {
                self.set_limits();
                Ok(false)
            }
            other @ ViewEvent::Toggled { .. } => Err(ChannelError::UnsupportedEvent {
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

    /// The unit selector of `source` was moved to `new_unit` by the user.
    ///
    /// Returns `Ok(false)` if `new_unit` is already the display unit.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ConversionDomain`] if `new_unit` is not selectable or
    /// the calibration cannot convert it; the channel is left unchanged.
    pub fn on_unit_changed(&mut self, source: ViewId, new_unit: &UnitId) -> ChannelResult<bool> {
        self.ensure_view(source)?;
        let index = self
            .units
            .iter()
            .position(|u| u == new_unit)
            .ok_or_else(|| self.domain_error(new_unit))?;

        if *new_unit == self.current_unit {
            self.sync_selectors(index);
            return Ok(false);
        }

        let mut params = self.rescale(self.adjustment.to_array(), new_unit)?;
        for p in params {
            ensure_finite(p, "rescaled limit")?;
        }
        if params[1] > params[2] {
            params.swap(1, 2);
        }
        params[4] = 0.0;

        self.sync_selectors(index);
        self.current_unit = new_unit.clone();
        self.adjustment.configure(params);
        let adjustment = self.adjustment;
        self.views.update_each(|v| v.render(&adjustment));

        debug!(
            channel = %self.channel,
            unit = %new_unit,
            lower = adjustment.lower(),
            upper = adjustment.upper(),
            "display unit changed"
        );
        for listener in &mut self.listeners {
            listener.unit_changed(&self.channel, new_unit);
        }
        Ok(true)
    }

    /// An interactive edit of the value control of `view`, in the displayed unit.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Locked`] while the channel is locked. The views are
    /// re-rendered so the rejected edit does not stay on screen.
    pub fn on_value_edited(&mut self, view: ViewId, value: f64) -> ChannelResult<bool> {
        self.ensure_view(view)?;
        if self.locked {
            let adjustment = self.adjustment;
            self.views.update_each(|v| v.render(&adjustment));
            return Err(ChannelError::Locked {
                channel: self.channel.clone(),
            });
        }
        let value = ensure_finite(value, "edited value")?;
        self.apply_display_value(value)
    }

    /// Current value in the hardware unit.
    pub fn value(&self) -> ChannelResult<f64> {
        let displayed = self.adjustment.value();
        if self.current_unit == self.hardware_unit {
            return Ok(displayed);
        }
        let calibration = self.calibration_for(&self.current_unit)?;
        Ok(calibration.to_hardware(&self.current_unit, displayed)?)
    }

    /// Set the value from a hardware-unit input.
    ///
    /// `input` may be numeric text. With [`UpdateKind::Target`] a change is
    /// forwarded to the hardware callback; with [`UpdateKind::Readback`] it
    /// is not. Locking does not affect this path. Returns `Ok(false)` without
    /// touching anything when the value is already in effect.
    ///
    /// # Errors
    ///
    /// Returns error if `input` does not coerce to a finite number.
    pub fn set_value(
        &mut self,
        input: impl Into<NumericInput>,
        kind: UpdateKind,
    ) -> ChannelResult<bool> {
        let hardware_value = input.into().to_real()?;
        let displayed = if self.current_unit == self.hardware_unit {
            hardware_value
        } else {
            let calibration = self.calibration_for(&self.current_unit)?;
            calibration.from_hardware(&self.current_unit, hardware_value)?
        };
        let _block = (kind == UpdateKind::Readback).then(|| self.value_gate.block());
        self.apply_display_value(displayed)
    }

    /// Reject interactive edits until [`unlock`](Self::unlock). Returns whether the state changed.
    pub fn lock(&mut self) -> bool {
        self.set_locked(true)
    }

    pub fn unlock(&mut self) -> bool {
        self.set_locked(false)
    }

    pub fn toggle_lock(&mut self) {
        self.set_locked(!self.locked);
    }

    /// "Set Limits" menu action. Editing limits is not implemented; the
    /// request is only passed on to listeners.
    pub fn set_limits(&mut self) {
        debug!(channel = %self.channel, "set limits requested (not implemented)");
        for listener in &mut self.listeners {
            listener.limits_requested(&self.channel);
        }
    }

    /// Entries for the auxiliary menu of every view of this channel.
    pub fn context_menu(&self) -> ContextMenu {
        ContextMenu::new(vec![
            ContextMenu::lock_entry(self.locked),
            MenuEntry {
                label: "Set Limits",
                action: MenuAction::SetLimits,
            },
        ])
    }

    /// `(lower, upper)` in the hardware unit.
    pub fn hardware_range(&self) -> ChannelResult<(f64, f64)> {
        let (lower, upper) = (self.adjustment.lower(), self.adjustment.upper());
        if self.current_unit == self.hardware_unit {
            return Ok((lower, upper));
        }
        let calibration = self.calibration_for(&self.current_unit)?;
        let a = calibration.to_hardware(&self.current_unit, lower)?;
        let b = calibration.to_hardware(&self.current_unit, upper)?;
        Ok((a.min(b), a.max(b)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel
    }

    pub fn hardware_unit(&self) -> &UnitId {
        &self.hardware_unit
    }

    pub fn current_unit(&self) -> &UnitId {
        &self.current_unit
    }

    /// Units offered by every unit selector of this channel.
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Value model in the current display unit.
    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    pub fn calibration(&self) -> Option<&Arc<dyn Calibration>> {
        self.calibration.as_ref()
    }

    pub fn calibration_status(&self) -> &CalibrationStatus {
        &self.status
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

    /// Events posted by views and not yet dispatched.
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

    fn domain_error(&self, unit: &UnitId) -> ConversionDomainError {
        ConversionDomainError {
            unit: unit.clone(),
            hardware_unit: self.hardware_unit.clone(),
        }
    }

    fn calibration_for(&self, unit: &UnitId) -> Result<&dyn Calibration, ConversionDomainError> {
        self.calibration
            .as_deref()
            .ok_or_else(|| self.domain_error(unit))
    }

    /// Convert every element of `params` from the current unit to `new_unit`.
    fn rescale(&self, mut params: [f64; 5], new_unit: &UnitId) -> ChannelResult<[f64; 5]> {
        let calibration = self.calibration_for(new_unit)?;
        let calibration_unit = calibration.hardware_unit();
        if self.current_unit != *calibration_unit {
            for p in &mut params {
                *p = calibration.to_hardware(&self.current_unit, *p)?;
            }
        }
        if new_unit != calibration_unit {
            for p in &mut params {
                *p = calibration.from_hardware(new_unit, *p)?;
            }
        }
        Ok(params)
    }

    /// Move every selector not already showing `index`. The view the user
    /// operated is skipped this way.
    fn sync_selectors(&mut self, index: usize) {
        self.views.update_each(|v| {
            if v.selected_unit() != Some(index) {
                v.select_unit(index);
            }
        });
    }

    fn apply_display_value(&mut self, value: f64) -> ChannelResult<bool> {
        if !self.adjustment.set_value(value) {
            return Ok(false);
        }
        let adjustment = self.adjustment;
        self.views.update_each(|v| v.render(&adjustment));
        self.forward()?;
        Ok(true)
    }

    fn forward(&mut self) -> ChannelResult<()> {
        if self.value_gate.is_blocked() {
            return Ok(());
        }
        let update = OutputUpdate::Analog {
            channel: self.channel.clone(),
            name: self.name.clone(),
            value: self.value()?,
        };
        debug!(channel = %self.channel, ?update, "forwarding analog target");
        (self.on_update)(&update);
        Ok(())
    }

    fn set_locked(&mut self, locked: bool) -> bool {
        if self.locked == locked {
            return false;
        }
        self.locked = locked;
        self.views.update_each(|v| v.set_sensitive(!locked));
        debug!(channel = %self.channel, locked, "analog lock changed");
        for listener in &mut self.listeners {
            listener.lock_changed(&self.channel, locked);
        }
        true
    }
}

impl fmt::Debug for AnalogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalogChannel")
            .field("name", &self.name)
            .field("channel", &self.channel)
            .field("status", &self.status)
            .field("current_unit", &self.current_unit)
            .field("adjustment", &self.adjustment)
            .field("locked", &self.locked)
            .field("views", &self.views.len())
            .finish()
    }
}
