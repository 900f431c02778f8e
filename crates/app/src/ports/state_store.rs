//! State store port — the shared room and device state every service reads
//! and mutates.

use hearth_domain::device::DeviceType;
use hearth_domain::room::RoomId;
use hearth_domain::security::LockState;
use hearth_domain::temperature::Temperature;

/// Shared, process-lifetime home state.
///
/// Every operation on a single room or device key is atomic with respect to
/// concurrent callers: nobody observes a half-applied update. Rooms are
/// addressed by [`RoomId`], so an unknown room can never be created here;
/// callers validate wire input with [`RoomId::parse`] first.
pub trait HomeStateStore {
    /// Record the temperature of `room`.
    fn set_temperature(&self, room: RoomId, value: Temperature);

    /// Current temperature of `room` ([`Temperature::UNSET`] until set).
    fn temperature(&self, room: RoomId) -> Temperature;

    /// Read several rooms under one consistent view, in request order.
    ///
    /// `None` entries stand for unrecognized rooms and read as
    /// [`Temperature::UNSET`].
    fn temperatures(&self, rooms: &[Option<RoomId>]) -> Vec<Temperature>;

    /// Mark `device` as online in `room`, replacing any earlier room.
    /// Returns the previous room, if the device was already online.
    fn set_device_online(&self, device: DeviceType, room: RoomId) -> Option<RoomId>;

    /// Mark `device` as offline. Returns the room it was in, if any.
    fn set_device_offline(&self, device: &str) -> Option<RoomId>;

    /// All online devices with their rooms, sorted by device type.
    fn online_devices(&self) -> Vec<(DeviceType, RoomId)>;

    /// Record whether `room` is locked.
    fn set_lock(&self, room: RoomId, state: LockState);

    /// Current lock state of `room` ([`LockState::Unlocked`] until set).
    fn lock_state(&self, room: RoomId) -> LockState;
}

impl<T: HomeStateStore + ?Sized> HomeStateStore for std::sync::Arc<T> {
    fn set_temperature(&self, room: RoomId, value: Temperature) {
        (**self).set_temperature(room, value);
    }

    fn temperature(&self, room: RoomId) -> Temperature {
        (**self).temperature(room)
    }

    fn temperatures(&self, rooms: &[Option<RoomId>]) -> Vec<Temperature> {
        (**self).temperatures(rooms)
    }

    fn set_device_online(&self, device: DeviceType, room: RoomId) -> Option<RoomId> {
        (**self).set_device_online(device, room)
    }

    fn set_device_offline(&self, device: &str) -> Option<RoomId> {
        (**self).set_device_offline(device)
    }

    fn online_devices(&self) -> Vec<(DeviceType, RoomId)> {
        (**self).online_devices()
    }

    fn set_lock(&self, room: RoomId, state: LockState) {
        (**self).set_lock(room, state);
    }

    fn lock_state(&self, room: RoomId) -> LockState {
        (**self).lock_state(room)
    }
}
