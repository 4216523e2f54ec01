//! The virtual controller.
//!
//! A virtual controller composes a mapper, per-axis property transforms, a
//! buffered state-change event stream, and force-feedback registration into
//! the object applications interact with. One internal lock serializes every
//! public operation; no operation blocks while holding it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use openpad_errors::{DeviceError, ValidationError};
use openpad_ffb::Device;
use openpad_mapper::Mapper;
use openpad_types::capabilities::Capabilities;
use openpad_types::clock::{Clock, SystemClock};
use openpad_types::element::{Axis, Button, ElementIdentifier};
use openpad_types::host::StateChangeNotify;
use openpad_types::sequence::{event_sequences, SequenceSource};
use openpad_types::state::{PhysicalDeviceStatus, PhysicalState, VirtualState};
use openpad_types::ControllerId;
use tracing::debug;

use crate::event_buffer::{Event, EventData, EventValue, StateChangeEventBuffer};
use crate::properties::AxisProperties;
use crate::registry::ForceFeedbackRegistry;

/// Maximum force-feedback gain property value.
pub const FF_GAIN_MAX: u32 = 10_000;

/// Default force-feedback gain property value (full strength).
pub const FF_GAIN_DEFAULT: u32 = FF_GAIN_MAX;

/// Connection status tracked by a virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    /// No successful poll has been observed yet, or the physical controller
    /// reported itself absent.
    #[default]
    Disconnected,
    /// The last poll succeeded.
    Connected,
    /// The last poll failed transiently; recovery is expected.
    Error,
}

/// Registration tokens for force-feedback bookkeeping.
static REGISTRATION_TOKENS: SequenceSource = SequenceSource::new();

struct ControllerState {
    status: DeviceStatus,
    /// Mapped state before property transforms; the diffing baseline.
    pre_property: VirtualState,
    /// State with property transforms applied; what applications read.
    post_property: VirtualState,
    properties: [AxisProperties; openpad_types::AXIS_COUNT],
    ff_gain: u32,
    event_buffer: StateChangeEventBuffer,
    /// Elements whose changes are withheld from the event buffer.
    event_filter: HashSet<ElementIdentifier>,
    notify: Option<Arc<dyn StateChangeNotify>>,
    ff_device: Option<Weak<Device>>,
}

/// A virtual controller bound to one physical controller.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use openpad_controller::VirtualController;
/// use openpad_mapper::{AxisDirection, ElementMap, ElementMapper, Mapper};
/// use openpad_types::element::Axis;
/// use openpad_types::state::{PhysicalState, PhysicalStick};
///
/// let mapper = Arc::new(Mapper::new(ElementMap {
///     stick_left_x: Some(ElementMapper::Axis {
///         axis: Axis::X,
///         direction: AxisDirection::Both,
///     }),
///     ..Default::default()
/// })?);
///
/// let controller = VirtualController::new(0, mapper);
/// controller.set_all_axis_range(-32768, 32767)?;
///
/// let mut physical = PhysicalState::NEUTRAL;
/// physical.sticks[PhysicalStick::LeftX as usize] = 1111;
/// controller.refresh_state(&physical);
///
/// assert_eq!(controller.state().axis(Axis::X), 1111);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct VirtualController {
    controller_id: ControllerId,
    registration_token: u64,
    mapper: Arc<Mapper>,
    registry: Option<Arc<ForceFeedbackRegistry>>,
    clock: Arc<dyn Clock>,
    sequences: &'static SequenceSource,
    inner: Mutex<ControllerState>,
}

impl std::fmt::Debug for VirtualController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualController")
            .field("controller_id", &self.controller_id)
            .field("status", &self.lock().status)
            .finish()
    }
}

impl VirtualController {
    /// Creates a virtual controller without force-feedback support.
    pub fn new(controller_id: ControllerId, mapper: Arc<Mapper>) -> VirtualController {
        Self::build(controller_id, mapper, None)
    }

    /// Creates a virtual controller that can register against the given
    /// physical controller's force-feedback registry.
    pub fn with_force_feedback(
        controller_id: ControllerId,
        mapper: Arc<Mapper>,
        registry: Arc<ForceFeedbackRegistry>,
    ) -> VirtualController {
        Self::build(controller_id, mapper, Some(registry))
    }

    fn build(
        controller_id: ControllerId,
        mapper: Arc<Mapper>,
        registry: Option<Arc<ForceFeedbackRegistry>>,
    ) -> VirtualController {
        let properties = [AxisProperties::default(); openpad_types::AXIS_COUNT];
        let pre_property = VirtualState::NEUTRAL;
        let post_property =
            apply_properties_to(mapper.capabilities(), &properties, pre_property);

        VirtualController {
            controller_id,
            registration_token: REGISTRATION_TOKENS.next(),
            mapper,
            registry,
            clock: Arc::new(SystemClock::new()),
            sequences: event_sequences(),
            inner: Mutex::new(ControllerState {
                status: DeviceStatus::Disconnected,
                pre_property,
                post_property,
                properties,
                ff_gain: FF_GAIN_DEFAULT,
                event_buffer: StateChangeEventBuffer::new(),
                event_filter: HashSet::new(),
                notify: None,
                ff_device: None,
            }),
        }
    }

    /// Replaces the timestamp clock. Intended for tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> VirtualController {
        self.clock = clock;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Identifier of the physical controller this virtual controller reads.
    pub fn controller_id(&self) -> ControllerId {
        self.controller_id
    }

    /// Token identifying this instance in force-feedback registries.
    pub fn registration_token(&self) -> u64 {
        self.registration_token
    }

    /// Capabilities of the underlying mapper's virtual layout.
    pub fn capabilities(&self) -> &Capabilities {
        self.mapper.capabilities()
    }

    /// Connection status recorded by the most recent refresh.
    pub fn device_status(&self) -> DeviceStatus {
        self.lock().status
    }

    /// Current post-property controller state.
    pub fn state(&self) -> VirtualState {
        self.lock().post_property
    }

    /// Applies this controller's axis properties to a state in place.
    /// Only axes present in the mapper's capabilities are transformed.
    pub fn apply_properties(&self, state: &mut VirtualState) {
        let inner = self.lock();
        *state = apply_properties_to(self.mapper.capabilities(), &inner.properties, *state);
    }

    /// Ingests one physical controller poll: maps it, diffs it against the
    /// previous snapshot, appends buffered events for unfiltered changes,
    /// recomputes the post-property view, and signals the state-change
    /// notification if anything changed. Never blocks and never fails;
    /// polling errors coerce to the neutral state. Returns whether a state
    /// change was observed.
    pub fn refresh_state(&self, physical: &PhysicalState) -> bool {
        let candidate = self.mapper.map_state(physical, self.controller_id);
        let new_status = match physical.status {
            PhysicalDeviceStatus::Ok => DeviceStatus::Connected,
            PhysicalDeviceStatus::NotConnected => DeviceStatus::Disconnected,
            PhysicalDeviceStatus::Error => DeviceStatus::Error,
        };
        let timestamp = self.clock.now_ms();

        let mut inner = self.lock();

        if inner.status != new_status {
            debug!(
                controller = self.controller_id,
                from = ?inner.status,
                to = ?new_status,
                "virtual controller status changed"
            );
            if new_status == DeviceStatus::Disconnected {
                if let Some(device) = registered_device(&inner) {
                    device.stop_all_effects();
                }
            }
            inner.status = new_status;
        }

        let changes = diff_states(&inner.pre_property, &candidate);
        if changes.is_empty() {
            return false;
        }

        for change in &changes {
            if !inner.event_filter.contains(&change.element) {
                inner.event_buffer.append(*change, timestamp, self.sequences);
            }
        }

        inner.pre_property = candidate;
        let transformed =
            apply_properties_to(self.mapper.capabilities(), &inner.properties, candidate);
        inner.post_property = transformed;

        if let Some(notify) = inner.notify.clone() {
            drop(inner);
            notify.signal();
        }
        true
    }

    // ----- Axis properties -----

    /// Deadzone property of one axis.
    pub fn axis_deadzone(&self, axis: Axis) -> u32 {
        self.lock().properties[axis.index()].deadzone
    }

    /// Saturation property of one axis.
    pub fn axis_saturation(&self, axis: Axis) -> u32 {
        self.lock().properties[axis.index()].saturation
    }

    /// Range property of one axis.
    pub fn axis_range(&self, axis: Axis) -> (i32, i32) {
        let inner = self.lock();
        let properties = &inner.properties[axis.index()];
        (properties.range_min, properties.range_max)
    }

    /// Whether transformations are enabled for one axis.
    pub fn axis_transformations_enabled(&self, axis: Axis) -> bool {
        self.lock().properties[axis.index()].transformations_enabled
    }

    /// Sets the deadzone property of one axis. Validates before mutating and
    /// immediately re-applies transforms to the current state.
    pub fn set_axis_deadzone(&self, axis: Axis, deadzone: u32) -> Result<(), ValidationError> {
        AxisProperties::validate_deadzone(deadzone)?;
        self.update_properties(|properties| properties[axis.index()].deadzone = deadzone);
        Ok(())
    }

    /// Sets the deadzone property of every axis.
    pub fn set_all_axis_deadzone(&self, deadzone: u32) -> Result<(), ValidationError> {
        AxisProperties::validate_deadzone(deadzone)?;
        self.update_properties(|properties| {
            for entry in properties.iter_mut() {
                entry.deadzone = deadzone;
            }
        });
        Ok(())
    }

    /// Sets the saturation property of one axis.
    pub fn set_axis_saturation(&self, axis: Axis, saturation: u32) -> Result<(), ValidationError> {
        AxisProperties::validate_saturation(saturation)?;
        self.update_properties(|properties| properties[axis.index()].saturation = saturation);
        Ok(())
    }

    /// Sets the saturation property of every axis.
    pub fn set_all_axis_saturation(&self, saturation: u32) -> Result<(), ValidationError> {
        AxisProperties::validate_saturation(saturation)?;
        self.update_properties(|properties| {
            for entry in properties.iter_mut() {
                entry.saturation = saturation;
            }
        });
        Ok(())
    }

    /// Sets the range property of one axis.
    pub fn set_axis_range(&self, axis: Axis, min: i32, max: i32) -> Result<(), ValidationError> {
        AxisProperties::validate_range(min, max)?;
        self.update_properties(|properties| {
            properties[axis.index()].range_min = min;
            properties[axis.index()].range_max = max;
        });
        Ok(())
    }

    /// Sets the range property of every axis.
    pub fn set_all_axis_range(&self, min: i32, max: i32) -> Result<(), ValidationError> {
        AxisProperties::validate_range(min, max)?;
        self.update_properties(|properties| {
            for entry in properties.iter_mut() {
                entry.range_min = min;
                entry.range_max = max;
            }
        });
        Ok(())
    }

    /// Enables or disables property transformations for one axis.
    pub fn set_axis_transformations_enabled(&self, axis: Axis, enabled: bool) {
        self.update_properties(|properties| {
            properties[axis.index()].transformations_enabled = enabled;
        });
    }

    /// Sets the force-feedback gain property.
    pub fn set_force_feedback_gain(&self, gain: u32) -> Result<(), ValidationError> {
        if gain > FF_GAIN_MAX {
            return Err(ValidationError::out_of_range(
                "force feedback gain",
                gain,
                0,
                FF_GAIN_MAX,
            ));
        }
        self.lock().ff_gain = gain;
        Ok(())
    }

    /// Force-feedback gain property.
    pub fn force_feedback_gain(&self) -> u32 {
        self.lock().ff_gain
    }

    /// Force-feedback gain as a fraction suitable for actuator projection.
    pub fn force_feedback_gain_fraction(&self) -> f64 {
        self.lock().ff_gain as f64 / FF_GAIN_MAX as f64
    }

    fn update_properties(&self, mutate: impl FnOnce(&mut [AxisProperties])) {
        let mut inner = self.lock();
        mutate(&mut inner.properties);
        let transformed = apply_properties_to(
            self.mapper.capabilities(),
            &inner.properties,
            inner.pre_property,
        );
        inner.post_property = transformed;
    }

    // ----- Event buffer -----

    /// Sets the event buffer capacity; 0 disables buffering.
    pub fn set_event_buffer_capacity(&self, capacity: u32) {
        self.lock().event_buffer.set_capacity(capacity);
    }

    /// Declared event buffer capacity.
    pub fn event_buffer_capacity(&self) -> u32 {
        self.lock().event_buffer.capacity()
    }

    /// Number of buffered events.
    pub fn event_buffer_count(&self) -> u32 {
        self.lock().event_buffer.count()
    }

    /// Whether the event buffer has overflowed since it was last drained.
    pub fn event_buffer_overflowed(&self) -> bool {
        self.lock().event_buffer.is_overflowed()
    }

    /// Buffered event by index; 0 is the oldest.
    pub fn event_buffer_event(&self, index: u32) -> Option<Event> {
        self.lock().event_buffer.event(index).copied()
    }

    /// Removes up to `count` of the oldest buffered events, clearing any
    /// overflow condition if something was removed. Returns the number
    /// removed.
    pub fn pop_oldest_events(&self, count: u32) -> u32 {
        self.lock().event_buffer.pop_oldest(count)
    }

    /// Suppresses buffered events for one element. State for the element
    /// still updates.
    pub fn event_filter_add_element(&self, element: ElementIdentifier) {
        self.lock().event_filter.insert(element);
    }

    /// Re-enables buffered events for one element.
    pub fn event_filter_remove_element(&self, element: ElementIdentifier) {
        self.lock().event_filter.remove(&element);
    }

    /// Installs (or clears) the state-change notification handle.
    pub fn set_state_change_notify(&self, notify: Option<Arc<dyn StateChangeNotify>>) {
        self.lock().notify = notify;
    }

    // ----- Force feedback -----

    /// Registers this controller for force feedback. Idempotent; fails with
    /// [`DeviceError::Unsupported`] when no registry was supplied or the
    /// mapper's layout has no force-feedback-capable axes.
    pub fn force_feedback_register(&self) -> Result<(), DeviceError> {
        let registry = self.registry.as_ref().ok_or(DeviceError::Unsupported)?;
        if !self.mapper.capabilities().supports_force_feedback() {
            return Err(DeviceError::Unsupported);
        }

        let mut inner = self.lock();
        if inner.ff_device.is_none() {
            registry.register(self.registration_token, self.controller_id);
            inner.ff_device = Some(Arc::downgrade(registry.device()));
        }
        Ok(())
    }

    /// Unregisters this controller from force feedback. Safe to call when
    /// not registered.
    pub fn force_feedback_unregister(&self) {
        let mut inner = self.lock();
        if inner.ff_device.take().is_some() {
            if let Some(registry) = self.registry.as_ref() {
                registry.unregister(self.registration_token);
            }
        }
    }

    /// Whether this controller is registered for force feedback.
    pub fn force_feedback_is_registered(&self) -> bool {
        self.lock().ff_device.is_some()
    }

    /// The force-feedback device, if registered and still alive.
    pub fn force_feedback_device(&self) -> Option<Arc<Device>> {
        registered_device(&self.lock())
    }
}

impl Drop for VirtualController {
    fn drop(&mut self) {
        // The physical side must never retain a registration for a
        // destroyed controller.
        self.force_feedback_unregister();
    }
}

fn registered_device(state: &ControllerState) -> Option<Arc<Device>> {
    state.ff_device.as_ref().and_then(Weak::upgrade)
}

/// Applies per-axis properties to a state, transforming only axes present in
/// the capabilities.
fn apply_properties_to(
    capabilities: &Capabilities,
    properties: &[AxisProperties],
    mut state: VirtualState,
) -> VirtualState {
    for axis in Axis::ALL {
        if capabilities.has_axis(axis) {
            state.set_axis(axis, properties[axis.index()].transform(state.axis(axis)));
        }
    }
    state
}

/// Element-wise difference between two pre-property states.
fn diff_states(previous: &VirtualState, current: &VirtualState) -> Vec<EventData> {
    let mut changes = Vec::new();

    for axis in Axis::ALL {
        if previous.axis(axis) != current.axis(axis) {
            changes.push(EventData {
                element: ElementIdentifier::Axis(axis),
                value: EventValue::Axis(current.axis(axis)),
            });
        }
    }

    if previous.buttons != current.buttons {
        for index in 0..openpad_types::BUTTON_COUNT_MAX {
            let Some(button) = Button::new(index) else {
                break;
            };
            if previous.button(button) != current.button(button) {
                changes.push(EventData {
                    element: ElementIdentifier::Button(button),
                    value: EventValue::Button(current.button(button)),
                });
            }
        }
    }

    if previous.pov != current.pov {
        changes.push(EventData {
            element: ElementIdentifier::Pov,
            value: EventValue::Pov(current.pov.direction()),
        });
    }

    changes
}
