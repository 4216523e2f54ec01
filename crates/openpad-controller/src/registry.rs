//! Force-feedback registration bookkeeping.
//!
//! Each physical controller owns one force-feedback device and one registry.
//! Virtual controllers register to gain access to the device; the registry
//! retains back-references (by registration token) so the physical side can
//! enumerate the virtual controllers it must distribute effect commands to.
//! Virtual controllers hold only a weak reference to the device and check it
//! before each use, so a vanished physical device degrades gracefully.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use openpad_ffb::Device;
use openpad_types::ControllerId;
use tracing::debug;

/// Registry of virtual controllers registered for force feedback against one
/// physical controller's device.
pub struct ForceFeedbackRegistry {
    device: Arc<Device>,
    registered: Mutex<HashMap<u64, ControllerId>>,
}

impl std::fmt::Debug for ForceFeedbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceFeedbackRegistry")
            .field("registered", &self.lock().len())
            .finish()
    }
}

impl ForceFeedbackRegistry {
    /// Creates a registry fronting the given force-feedback device.
    pub fn new(device: Arc<Device>) -> ForceFeedbackRegistry {
        ForceFeedbackRegistry {
            device,
            registered: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, ControllerId>> {
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The force-feedback device this registry fronts.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Records a registration under the given token. Idempotent.
    pub(crate) fn register(&self, token: u64, controller: ControllerId) {
        if self.lock().insert(token, controller).is_none() {
            debug!(token, controller, "virtual controller registered for force feedback");
        }
    }

    /// Removes a registration. Returns whether the token was registered.
    pub(crate) fn unregister(&self, token: u64) -> bool {
        let removed = self.lock().remove(&token).is_some();
        if removed {
            debug!(token, "virtual controller unregistered from force feedback");
        }
        removed
    }

    /// Whether a registration token is currently registered.
    pub fn is_token_registered(&self, token: u64) -> bool {
        self.lock().contains_key(&token)
    }

    /// Number of registered virtual controllers.
    pub fn registered_count(&self) -> usize {
        self.lock().len()
    }

    /// Physical-controller identifiers of all registered virtual
    /// controllers, in no particular order.
    pub fn registered_controllers(&self) -> Vec<ControllerId> {
        self.lock().values().copied().collect()
    }
}
