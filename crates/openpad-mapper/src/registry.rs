//! Process-wide registry of named mappers.
//!
//! Built-in and runtime-generated mappers are registered once and looked up
//! by name when a virtual controller is configured. The registry also
//! provides the null mapper, a layout affecting no controller elements that
//! serves as a fall-back in the event of a configuration error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::warn;

use crate::mapper::{ElementMap, Mapper};

fn registry() -> &'static Mutex<HashMap<String, Arc<Mapper>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<Mapper>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Registers a mapper under its name. Returns `false` for a mapper without
/// a name, which cannot be registered. Registering a duplicate name replaces
/// the previous mapper.
pub fn register(mapper: Arc<Mapper>) -> bool {
    let Some(name) = mapper.name().map(str::to_owned) else {
        return false;
    };

    let mut map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if map.insert(name.clone(), mapper).is_some() {
        warn!(name = %name, "replacing previously registered mapper");
    }
    true
}

/// Looks up a registered mapper by name.
pub fn by_name(name: &str) -> Option<Arc<Mapper>> {
    let map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.get(name).cloned()
}

/// Looks up a registered mapper by name, producing a typed error when no
/// mapper of that name exists.
pub fn by_name_required(name: &str) -> Result<Arc<Mapper>, openpad_errors::ParseError> {
    by_name(name).ok_or_else(|| openpad_errors::ParseError::UnknownMapper {
        name: name.to_string(),
    })
}

/// Whether a mapper of the given name is registered.
pub fn is_name_known(name: &str) -> bool {
    by_name(name).is_some()
}

/// Names of all registered mappers, sorted.
pub fn names() -> Vec<String> {
    let map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

/// The null mapper: affects no controller elements and has no actuators.
/// Always available, independent of registration state.
pub fn null() -> Arc<Mapper> {
    static NULL_MAPPER: OnceLock<Arc<Mapper>> = OnceLock::new();
    NULL_MAPPER
        .get_or_init(|| {
            let mapper = Mapper::with_actuators(
                ElementMap::default(),
                crate::actuator::ActuatorMap::DISABLED,
            )
            .expect("empty element map is always valid");
            Arc::new(mapper)
        })
        .clone()
}
