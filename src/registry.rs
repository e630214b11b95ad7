use std::{
    any::TypeId, 
    hash::{
        Hash, 
        Hasher
    }, 
    sync::atomic::{
        AtomicUsize, 
        Ordering
    }
};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use thiserror::Error;

use crate::{
    handler_list::HandlerList, 
    Event
};

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum RegistryError {
    #[error("Shard amount must be a power of two greater than 1, got {0}")]
    InvalidShardAmount(usize),
}

/// Identity of a concrete event type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct EventTypeKey {
    id: TypeId,
    name: &'static str,
}

impl EventTypeKey {
    pub fn of<E: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    pub (crate) fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> TypeId { self.id }
    pub fn name(&self) -> &'static str { self.name }
}

impl PartialEq for EventTypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventTypeKey {}

impl Hash for EventTypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for EventTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub capacity: usize,
    pub shard_amount: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            shard_amount: 16,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.shard_amount < 2 || !self.shard_amount.is_power_of_two() {
            return Err(RegistryError::InvalidShardAmount(self.shard_amount));
        }
        Ok(())
    }
}

/// Maps each concrete event type to its one [`HandlerList`].
///
/// Slots are created on first request and live as long as the registry.
/// Creation happens under the shard lock, so concurrent first requests for
/// the same type all receive the same handle.
pub struct EventTypeRegistry {
    slots: DashMap<EventTypeKey, HandlerList, FxBuildHasher>,
    created: AtomicUsize,
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self::build(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RegistryConfig) -> Self {
        Self {
            slots: DashMap::with_capacity_and_hasher_and_shard_amount(
                config.capacity,
                FxBuildHasher,
                config.shard_amount,
            ),
            created: AtomicUsize::new(0),
        }
    }

    pub fn slot_for<E: Event>(&self) -> HandlerList {
        self.slot_for_key(EventTypeKey::of::<E>())
    }

    pub fn slot_for_key(&self, key: EventTypeKey) -> HandlerList {
        if let Some(slot) = self.slots.get(&key) {
            return slot.value().clone();
        }

        self.slots
            .entry(key)
            .or_insert_with(|| {
                self.created.fetch_add(1, Ordering::AcqRel);
                debug!("Created handler list for {}", key);
                HandlerList::new(key)
            })
            .value()
            .clone()
    }

    // Lookup without creating.
    pub fn get(&self, key: &EventTypeKey) -> Option<HandlerList> {
        self.slots.get(key).map(|slot| slot.value().clone())
    }

    pub fn get_for<E: Event>(&self) -> Option<HandlerList> {
        self.get(&EventTypeKey::of::<E>())
    }

    pub fn contains<E: Event>(&self) -> bool {
        self.slots.contains_key(&EventTypeKey::of::<E>())
    }

    pub fn keys(&self) -> Vec<EventTypeKey> {
        self.slots.iter().map(|slot| *slot.key()).collect()
    }

    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    // Number of handler lists this registry has ever created.
    pub fn created(&self) -> usize { self.created.load(Ordering::Acquire) }
}

impl Default for EventTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTypeRegistry")
            .field("slots", &self.len())
            .field("created", &self.created())
            .finish()
    }
}
