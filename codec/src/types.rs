//! Core types for the codec.

use std::fmt;

/// A simulation frame number.
///
/// Frames are a logical, monotonically increasing clock shared by every
/// replicated component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimulationFrame(i64);

impl SimulationFrame {
    /// Creates a new simulation frame.
    #[must_use]
    pub const fn new(frame: i64) -> Self {
        Self(frame)
    }

    /// Returns the raw frame value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns the frame `delta` frames after this one, saturating at the
    /// numeric bounds.
    #[must_use]
    pub const fn offset(self, delta: u8) -> Self {
        Self(self.0.saturating_add(delta as i64))
    }
}

impl From<i64> for SimulationFrame {
    fn from(frame: i64) -> Self {
        Self(frame)
    }
}

impl From<SimulationFrame> for i64 {
    fn from(frame: SimulationFrame) -> Self {
        frame.0
    }
}

impl fmt::Display for SimulationFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The frame per-field deltas are measured against, carried once per message.
///
/// An invalid reference still travels on the wire, but every tracked field is
/// then written with a zero delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReferenceFrame {
    pub frame: SimulationFrame,
    pub valid: bool,
}

impl ReferenceFrame {
    #[must_use]
    pub const fn valid(frame: SimulationFrame) -> Self {
        Self { frame, valid: true }
    }

    #[must_use]
    pub const fn invalid(frame: SimulationFrame) -> Self {
        Self {
            frame,
            valid: false,
        }
    }
}

/// An entity identifier carried by entity-reference fields.
///
/// In native layouts the raw value `0` means "no entity", so only
/// non-zero ids survive an export/import round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw entity ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_frame_roundtrip() {
        let frame = SimulationFrame::new(-12);
        assert_eq!(frame.raw(), -12);
        assert_eq!(i64::from(frame), -12);
        assert_eq!(SimulationFrame::from(7).raw(), 7);
    }

    #[test]
    fn simulation_frame_offset_saturates() {
        assert_eq!(SimulationFrame::new(10).offset(255).raw(), 265);
        assert_eq!(SimulationFrame::new(i64::MAX - 1).offset(5).raw(), i64::MAX);
    }

    #[test]
    fn simulation_frame_ordering() {
        assert!(SimulationFrame::new(1) < SimulationFrame::new(2));
        assert_eq!(SimulationFrame::default().raw(), 0);
    }

    #[test]
    fn reference_frame_constructors() {
        let frame = SimulationFrame::new(9);
        assert!(ReferenceFrame::valid(frame).valid);
        assert!(!ReferenceFrame::invalid(frame).valid);
        assert!(!ReferenceFrame::default().valid);
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId::new(42).to_string(), "Entity(42)");
        assert_eq!(u32::from(EntityId::from(9)), 9);
    }
}
