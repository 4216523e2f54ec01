//! The force-feedback device: a collection of active effects with playback
//! state, global gain, and pause semantics.
//!
//! One device exists per physical controller, owned by the physical-device
//! layer and shared with registered virtual controllers. All state sits
//! behind an interior mutex; no operation blocks or performs I/O while
//! holding it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use openpad_types::clock::Clock;
use openpad_types::constants::{FORCE_MAGNITUDE_MAX, FORCE_MAGNITUDE_MIN};
use openpad_types::force::{
    EffectTimeMs, EffectValue, OrderedMagnitudeComponents, ZERO_MAGNITUDE_COMPONENTS,
};
use openpad_errors::ValidationError;
use tracing::debug;

use crate::effect::{Effect, EffectId};

/// Playback state of one effect on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Running {
        /// Device-clock time at which playback started.
        start_time: EffectTimeMs,
        /// Iterations not yet consumed, including the one in progress.
        iterations_remaining: u32,
        /// Iterations requested at start.
        iterations_total: u32,
    },
}

#[derive(Debug)]
struct EffectSlot {
    effect: Effect,
    state: PlayState,
}

#[derive(Debug)]
struct DeviceState {
    effects: HashMap<EffectId, EffectSlot>,
    gain: EffectValue,
    paused: bool,
    paused_at: EffectTimeMs,
}

/// A force-feedback device holding active effects keyed by identifier.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use openpad_ffb::device::Device;
/// use openpad_ffb::direction::DirectionVector;
/// use openpad_ffb::effect::{CommonParameters, Effect, EffectKind};
/// use openpad_types::clock::SystemClock;
/// use openpad_types::sequence::SequenceSource;
///
/// let device = Device::new(Arc::new(SystemClock::new()));
/// let ids = SequenceSource::new();
///
/// let direction = DirectionVector::from_cartesian(&[1.0, 0.0])?;
/// let effect = Effect::new(
///     &ids,
///     CommonParameters::new(direction),
///     EffectKind::ConstantForce { magnitude: 5_000.0 },
/// )?;
/// let id = effect.id();
///
/// device.add_effect(effect);
/// assert!(device.start_effect(id, 1));
/// assert!(device.is_effect_playing(id));
/// # Ok::<(), openpad_errors::ValidationError>(())
/// ```
pub struct Device {
    clock: Arc<dyn Clock>,
    inner: Mutex<DeviceState>,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Device")
            .field("effects", &state.effects.len())
            .field("gain", &state.gain)
            .field("paused", &state.paused)
            .finish()
    }
}

impl Device {
    /// Creates an empty device driven by the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Device {
        Device {
            clock,
            inner: Mutex::new(DeviceState {
                effects: HashMap::new(),
                gain: 1.0,
                paused: false,
                paused_at: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds an effect, or replaces the parameters of an effect already
    /// present under the same identifier. Replacing a running effect leaves
    /// its playback state untouched.
    pub fn add_effect(&self, effect: Effect) {
        let mut state = self.lock();
        let id = effect.id();
        match state.effects.entry(id) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().effect = effect;
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(EffectSlot {
                    effect,
                    state: PlayState::Stopped,
                });
                debug!(effect = id, "added force feedback effect");
            }
        }
    }

    /// Removes an effect entirely. Returns whether it was present.
    pub fn remove_effect(&self, id: EffectId) -> bool {
        let removed = self.lock().effects.remove(&id).is_some();
        if removed {
            debug!(effect = id, "removed force feedback effect");
        }
        removed
    }

    /// Starts (or restarts) playback of an effect for the given number of
    /// iterations. Returns `false` for an unknown effect or a zero iteration
    /// count.
    pub fn start_effect(&self, id: EffectId, iterations: u32) -> bool {
        if iterations == 0 {
            return false;
        }
        let now = self.clock.now_ms();
        let mut state = self.lock();
        let Some(slot) = state.effects.get_mut(&id) else {
            return false;
        };
        slot.state = PlayState::Running {
            start_time: now,
            iterations_remaining: iterations,
            iterations_total: iterations,
        };
        debug!(effect = id, iterations, "started force feedback effect");
        true
    }

    /// Stops playback of an effect. Returns whether it was present.
    pub fn stop_effect(&self, id: EffectId) -> bool {
        let mut state = self.lock();
        let Some(slot) = state.effects.get_mut(&id) else {
            return false;
        };
        slot.state = PlayState::Stopped;
        debug!(effect = id, "stopped force feedback effect");
        true
    }

    /// Stops playback of every effect, leaving them loaded on the device.
    pub fn stop_all_effects(&self) {
        let mut state = self.lock();
        for slot in state.effects.values_mut() {
            slot.state = PlayState::Stopped;
        }
    }

    /// Removes every effect from the device.
    pub fn clear_effects(&self) {
        let mut state = self.lock();
        let count = state.effects.len();
        state.effects.clear();
        if count > 0 {
            debug!(count, "cleared force feedback effects");
        }
    }

    /// Number of effects currently loaded.
    pub fn effect_count(&self) -> usize {
        self.lock().effects.len()
    }

    /// Whether an effect is loaded on the device.
    pub fn has_effect(&self, id: EffectId) -> bool {
        self.lock().effects.contains_key(&id)
    }

    /// Whether an effect is in the running state. An effect still inside its
    /// start delay counts as playing.
    pub fn is_effect_playing(&self, id: EffectId) -> bool {
        matches!(
            self.lock().effects.get(&id).map(|slot| slot.state),
            Some(PlayState::Running { .. })
        )
    }

    /// Current playback state of an effect, if loaded.
    pub fn effect_play_state(&self, id: EffectId) -> Option<PlayState> {
        self.lock().effects.get(&id).map(|slot| slot.state)
    }

    /// Sets the device-wide gain fraction applied to all output.
    pub fn set_gain(&self, gain: EffectValue) -> Result<(), ValidationError> {
        if !gain.is_finite() || !(0.0..=1.0).contains(&gain) {
            return Err(ValidationError::out_of_range(
                "device gain fraction",
                (gain * 100.0) as i64,
                0,
                100,
            ));
        }
        self.lock().gain = gain;
        Ok(())
    }

    /// Current device-wide gain fraction.
    pub fn gain(&self) -> EffectValue {
        self.lock().gain
    }

    /// Pauses playback. While paused the device outputs zero everywhere and
    /// playback clocks are frozen.
    pub fn pause(&self) {
        let now = self.clock.now_ms();
        let mut state = self.lock();
        if !state.paused {
            state.paused = true;
            state.paused_at = now;
            debug!("paused force feedback device");
        }
    }

    /// Resumes playback. Running effects continue from where they paused.
    pub fn resume(&self) {
        let now = self.clock.now_ms();
        let mut state = self.lock();
        if !state.paused {
            return;
        }
        state.paused = false;
        let pause_duration = now.wrapping_sub(state.paused_at);
        for slot in state.effects.values_mut() {
            if let PlayState::Running { start_time, .. } = &mut slot.state {
                *start_time = start_time.wrapping_add(pause_duration);
            }
        }
        debug!(pause_duration, "resumed force feedback device");
    }

    /// Whether the device is paused.
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Computes the summed per-axis magnitudes of every running effect at
    /// the given device-clock time, in ordered-axis layout. Effects whose
    /// iterations have all elapsed transition to stopped as a side effect.
    /// Per-axis sums clamp to the force magnitude range, then scale by the
    /// device gain.
    pub fn compute_axis_magnitudes(&self, now: EffectTimeMs) -> OrderedMagnitudeComponents {
        let mut state = self.lock();
        if state.paused {
            return ZERO_MAGNITUDE_COMPONENTS;
        }

        let gain = state.gain;
        let mut output = ZERO_MAGNITUDE_COMPONENTS;

        for slot in state.effects.values_mut() {
            let PlayState::Running {
                start_time,
                iterations_remaining,
                iterations_total,
            } = &mut slot.state
            else {
                continue;
            };

            let elapsed_total = now.wrapping_sub(*start_time);
            let delay = slot.effect.common().start_delay_ms;
            if elapsed_total < delay {
                continue;
            }
            let elapsed = elapsed_total - delay;

            let local_time = match slot.effect.common().duration_ms {
                Some(duration) if duration > 0 => {
                    let completed = elapsed / duration;
                    if completed >= *iterations_total {
                        slot.state = PlayState::Stopped;
                        continue;
                    }
                    *iterations_remaining = *iterations_total - completed;
                    elapsed % duration
                }
                Some(_) => {
                    // Zero duration plays nothing.
                    slot.state = PlayState::Stopped;
                    continue;
                }
                None => elapsed,
            };

            let magnitude = slot.effect.compute_magnitude(local_time);
            let components = slot.effect.ordered_components(magnitude);
            for (sum, component) in output.iter_mut().zip(components) {
                *sum += component;
            }
        }

        for component in output.iter_mut() {
            *component = component.clamp(FORCE_MAGNITUDE_MIN, FORCE_MAGNITUDE_MAX) * gain;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::DirectionVector;
    use crate::effect::{CommonParameters, EffectKind};
    use openpad_types::element::Axis;
    use openpad_types::sequence::SequenceSource;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Manually advanced test clock.
    #[derive(Default)]
    struct FakeClock(AtomicU32);

    impl FakeClock {
        fn advance(&self, ms: u32) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn fixture() -> (Arc<FakeClock>, Device, SequenceSource) {
        let clock = Arc::new(FakeClock::default());
        let device = Device::new(clock.clone());
        (clock, device, SequenceSource::new())
    }

    fn constant_effect_on_x(ids: &SequenceSource, magnitude: EffectValue) -> Effect {
        let direction = DirectionVector::from_cartesian(&[1.0]).expect("valid direction");
        Effect::new(
            ids,
            CommonParameters::new(direction),
            EffectKind::ConstantForce { magnitude },
        )
        .expect("valid effect")
    }

    #[test]
    fn add_start_stop_remove_lifecycle() {
        let (_clock, device, ids) = fixture();
        let effect = constant_effect_on_x(&ids, 1_000.0);
        let id = effect.id();

        device.add_effect(effect);
        assert!(device.has_effect(id));
        assert!(!device.is_effect_playing(id));

        assert!(device.start_effect(id, 1));
        assert!(device.is_effect_playing(id));

        assert!(device.stop_effect(id));
        assert!(!device.is_effect_playing(id));

        assert!(device.remove_effect(id));
        assert!(!device.has_effect(id));
        assert!(!device.remove_effect(id));
    }

    #[test]
    fn unknown_effect_operations_fail() {
        let (_clock, device, _ids) = fixture();
        assert!(!device.start_effect(42, 1));
        assert!(!device.stop_effect(42));
        assert!(!device.is_effect_playing(42));
    }

    #[test]
    fn zero_iterations_fail_to_start() {
        let (_clock, device, ids) = fixture();
        let effect = constant_effect_on_x(&ids, 1_000.0);
        let id = effect.id();
        device.add_effect(effect);
        assert!(!device.start_effect(id, 0));
    }

    #[test]
    fn stopped_effects_contribute_nothing() {
        let (_clock, device, ids) = fixture();
        device.add_effect(constant_effect_on_x(&ids, 5_000.0));
        assert_eq!(device.compute_axis_magnitudes(0), ZERO_MAGNITUDE_COMPONENTS);
    }

    #[test]
    fn running_effect_contributes_on_its_axis() {
        let (_clock, device, ids) = fixture();
        let effect = constant_effect_on_x(&ids, 5_000.0);
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 1);

        let output = device.compute_axis_magnitudes(10);
        assert_eq!(output[Axis::X.index()], 5_000.0);
        assert_eq!(output[Axis::Y.index()], 0.0);
    }

    #[test]
    fn device_output_is_linear_in_loaded_effects() {
        let (_clock, device, ids) = fixture();
        let first = constant_effect_on_x(&ids, 3_000.0);
        let second = constant_effect_on_x(&ids, 2_500.0);
        let (id1, id2) = (first.id(), second.id());
        device.add_effect(first);
        device.add_effect(second);
        device.start_effect(id1, 1);
        device.start_effect(id2, 1);

        let output = device.compute_axis_magnitudes(10);
        assert_eq!(output[Axis::X.index()], 5_500.0);
    }

    #[test]
    fn per_axis_sums_clamp_to_force_range() {
        let (_clock, device, ids) = fixture();
        let first = constant_effect_on_x(&ids, 9_000.0);
        let second = constant_effect_on_x(&ids, 9_000.0);
        let (id1, id2) = (first.id(), second.id());
        device.add_effect(first);
        device.add_effect(second);
        device.start_effect(id1, 1);
        device.start_effect(id2, 1);

        let output = device.compute_axis_magnitudes(10);
        assert_eq!(output[Axis::X.index()], FORCE_MAGNITUDE_MAX);
    }

    #[test]
    fn device_gain_scales_output() {
        let (_clock, device, ids) = fixture();
        let effect = constant_effect_on_x(&ids, 8_000.0);
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 1);
        device.set_gain(0.5).expect("valid gain");

        let output = device.compute_axis_magnitudes(10);
        assert_eq!(output[Axis::X.index()], 4_000.0);
    }

    #[test]
    fn invalid_gain_is_rejected() {
        let (_clock, device, _ids) = fixture();
        assert!(device.set_gain(1.5).is_err());
        assert!(device.set_gain(-0.1).is_err());
        assert_eq!(device.gain(), 1.0);
    }

    #[test]
    fn start_delay_suppresses_output() {
        let (_clock, device, ids) = fixture();
        let direction = DirectionVector::from_cartesian(&[1.0]).expect("valid direction");
        let effect = Effect::new(
            &ids,
            CommonParameters::new(direction).with_start_delay(100),
            EffectKind::ConstantForce { magnitude: 5_000.0 },
        )
        .expect("valid effect");
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 1);

        assert_eq!(
            device.compute_axis_magnitudes(99)[Axis::X.index()],
            0.0
        );
        assert_eq!(
            device.compute_axis_magnitudes(100)[Axis::X.index()],
            5_000.0
        );
    }

    #[test]
    fn finite_duration_effects_stop_after_iterations() {
        let (_clock, device, ids) = fixture();
        let direction = DirectionVector::from_cartesian(&[1.0]).expect("valid direction");
        let effect = Effect::new(
            &ids,
            CommonParameters::new(direction).with_duration(100),
            EffectKind::ConstantForce { magnitude: 5_000.0 },
        )
        .expect("valid effect");
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 3);

        // Three iterations of 100 ms each.
        assert_eq!(device.compute_axis_magnitudes(50)[Axis::X.index()], 5_000.0);
        assert_eq!(
            device.compute_axis_magnitudes(250)[Axis::X.index()],
            5_000.0
        );
        match device.effect_play_state(id) {
            Some(PlayState::Running {
                iterations_remaining,
                iterations_total,
                ..
            }) => {
                assert_eq!(iterations_total, 3);
                assert_eq!(iterations_remaining, 1);
            }
            other => panic!("unexpected play state {other:?}"),
        }

        assert_eq!(device.compute_axis_magnitudes(300)[Axis::X.index()], 0.0);
        assert!(!device.is_effect_playing(id));
    }

    #[test]
    fn pause_freezes_playback() {
        let (clock, device, ids) = fixture();
        let direction = DirectionVector::from_cartesian(&[1.0]).expect("valid direction");
        let effect = Effect::new(
            &ids,
            CommonParameters::new(direction).with_duration(100),
            EffectKind::ConstantForce { magnitude: 5_000.0 },
        )
        .expect("valid effect");
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 1);

        clock.advance(50);
        device.pause();
        assert!(device.is_paused());
        assert_eq!(
            device.compute_axis_magnitudes(clock.now_ms()),
            ZERO_MAGNITUDE_COMPONENTS
        );

        // A long pause must not consume playback time.
        clock.advance(10_000);
        device.resume();
        assert!(!device.is_paused());
        assert_eq!(
            device.compute_axis_magnitudes(clock.now_ms())[Axis::X.index()],
            5_000.0
        );
        assert!(device.is_effect_playing(id));
    }

    #[test]
    fn stop_all_and_clear() {
        let (_clock, device, ids) = fixture();
        let first = constant_effect_on_x(&ids, 1_000.0);
        let second = constant_effect_on_x(&ids, 2_000.0);
        let (id1, id2) = (first.id(), second.id());
        device.add_effect(first);
        device.add_effect(second);
        device.start_effect(id1, 1);
        device.start_effect(id2, 1);

        device.stop_all_effects();
        assert!(!device.is_effect_playing(id1));
        assert!(!device.is_effect_playing(id2));
        assert_eq!(device.effect_count(), 2);

        device.clear_effects();
        assert_eq!(device.effect_count(), 0);
    }

    #[test]
    fn multi_axis_effect_distributes_components() {
        let (_clock, device, ids) = fixture();
        let direction = DirectionVector::from_cartesian(&[1.0, 1.0]).expect("valid direction");
        let effect = Effect::new(
            &ids,
            CommonParameters::new(direction),
            EffectKind::ConstantForce { magnitude: 10_000.0 },
        )
        .expect("valid effect");
        let id = effect.id();
        device.add_effect(effect);
        device.start_effect(id, 1);

        let output = device.compute_axis_magnitudes(10);
        let expected = 10_000.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!((output[Axis::X.index()] - expected).abs() < 1.0);
        assert!((output[Axis::Y.index()] - expected).abs() < 1.0);
    }
}
