//! In-process state store guarded by a single reader/writer lock.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hearth_domain::device::DeviceType;
use hearth_domain::room::{ROOM_COUNT, RoomId};
use hearth_domain::security::LockState;
use hearth_domain::temperature::Temperature;

use crate::ports::HomeStateStore;

#[derive(Debug, Default)]
struct HomeState {
    temperatures: [Temperature; ROOM_COUNT],
    locks: [LockState; ROOM_COUNT],
    online: BTreeMap<DeviceType, RoomId>,
}

/// In-memory [`HomeStateStore`].
///
/// Writers take the lock exclusively for the duration of a single field
/// update, so concurrent readers (stream ticks included) never see a torn
/// value. Construct one per process and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: RwLock<HomeState>,
}

impl InMemoryStateStore {
    /// Create a store with every room unset and unlocked, and no devices online.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the guard cannot leave a field half-written
    // (every write is a single assignment), so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HomeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HomeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HomeStateStore for InMemoryStateStore {
    fn set_temperature(&self, room: RoomId, value: Temperature) {
        self.write().temperatures[room.slot()] = value;
    }

    fn temperature(&self, room: RoomId) -> Temperature {
        self.read().temperatures[room.slot()]
    }

    fn temperatures(&self, rooms: &[Option<RoomId>]) -> Vec<Temperature> {
        let state = self.read();
        rooms
            .iter()
            .map(|room| room.map_or(Temperature::UNSET, |r| state.temperatures[r.slot()]))
            .collect()
    }

    fn set_device_online(&self, device: DeviceType, room: RoomId) -> Option<RoomId> {
        self.write().online.insert(device, room)
    }

    fn set_device_offline(&self, device: &str) -> Option<RoomId> {
        self.write().online.remove(device)
    }

    fn online_devices(&self) -> Vec<(DeviceType, RoomId)> {
        self.read()
            .online
            .iter()
            .map(|(device, room)| (device.clone(), *room))
            .collect()
    }

    fn set_lock(&self, room: RoomId, state: LockState) {
        self.write().locks[room.slot()] = state;
    }

    fn lock_state(&self, room: RoomId) -> LockState {
        self.read().locks[room.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn device(name: &str) -> DeviceType {
        DeviceType::new(name).unwrap()
    }

    #[test]
    fn should_start_with_unset_rooms_and_no_devices() {
        let store = InMemoryStateStore::new();
        for room in RoomId::all() {
            assert_eq!(store.temperature(room), Temperature::UNSET);
            assert_eq!(store.lock_state(room), LockState::Unlocked);
        }
        assert!(store.online_devices().is_empty());
    }

    #[test]
    fn should_return_temperature_that_was_set() {
        let store = InMemoryStateStore::new();
        store.set_temperature(RoomId::Kitchen, Temperature::new(19.5));
        assert_eq!(store.temperature(RoomId::Kitchen), Temperature::new(19.5));
        assert_eq!(store.temperature(RoomId::Garage), Temperature::UNSET);
    }

    #[test]
    fn should_snapshot_in_request_order_with_unknown_rooms_as_unset() {
        let store = InMemoryStateStore::new();
        store.set_temperature(RoomId::LivingRoom, Temperature::new(22.0));
        store.set_temperature(RoomId::Garage, Temperature::new(8.0));

        let snapshot = store.temperatures(&[Some(RoomId::Garage), None, Some(RoomId::LivingRoom)]);
        assert_eq!(
            snapshot,
            vec![
                Temperature::new(8.0),
                Temperature::UNSET,
                Temperature::new(22.0)
            ]
        );
    }

    #[test]
    fn should_overwrite_room_when_device_turned_on_twice() {
        let store = InMemoryStateStore::new();
        assert_eq!(store.set_device_online(device("TV"), RoomId::LivingRoom), None);
        assert_eq!(
            store.set_device_online(device("TV"), RoomId::KidsBedroom),
            Some(RoomId::LivingRoom)
        );
        assert_eq!(store.online_devices(), vec![(device("TV"), RoomId::KidsBedroom)]);
    }

    #[test]
    fn should_remove_device_when_turned_off() {
        let store = InMemoryStateStore::new();
        store.set_device_online(device("TV"), RoomId::LivingRoom);
        store.set_device_online(device("Speaker"), RoomId::MasterBedroom);

        assert_eq!(store.set_device_offline("TV"), Some(RoomId::LivingRoom));
        assert_eq!(store.set_device_offline("TV"), None);
        assert_eq!(
            store.online_devices(),
            vec![(device("Speaker"), RoomId::MasterBedroom)]
        );
    }

    #[test]
    fn should_persist_lock_state_per_room() {
        let store = InMemoryStateStore::new();
        store.set_lock(RoomId::Garage, LockState::Locked);
        assert_eq!(store.lock_state(RoomId::Garage), LockState::Locked);
        assert_eq!(store.lock_state(RoomId::Kitchen), LockState::Unlocked);

        store.set_lock(RoomId::Garage, LockState::Unlocked);
        assert_eq!(store.lock_state(RoomId::Garage), LockState::Unlocked);
    }

    #[test]
    fn should_never_observe_torn_values_under_concurrent_writers() {
        let store = Arc::new(InMemoryStateStore::new());
        let writers: Vec<_> = [10.0, 20.0]
            .into_iter()
            .map(|value| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        store.set_temperature(RoomId::Kitchen, Temperature::new(value));
                    }
                })
            })
            .collect();

        for _ in 0..1_000 {
            let seen = store.temperature(RoomId::Kitchen).celsius();
            assert!([0.0, 10.0, 20.0].contains(&seen));
        }
        for writer in writers {
            writer.join().unwrap();
        }
    }
}
