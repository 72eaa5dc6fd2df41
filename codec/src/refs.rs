//! Entity-reference fields: enumeration, replacement and id-space mapping.
//!
//! Only component types that declare at least one entity-reference field
//! expose this capability, through [`DeltaRecord::ref_fields`].

use std::collections::BTreeSet;
use std::fmt;

use schema::{ComponentDescriptor, FieldKind, FieldMask};

use crate::error::{CodecError, CodecResult};
use crate::record::DeltaRecord;
use crate::types::EntityId;
use crate::value::FieldValue;

/// Why an entity id could not be mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The id has no counterpart in the target id space.
    Unknown(EntityId),
    /// The counterpart exists but may not be referenced from here.
    Rejected(EntityId),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "no mapping for {id}"),
            Self::Rejected(id) => write!(f, "mapping for {id} rejected"),
        }
    }
}

impl std::error::Error for MapError {}

/// Translates entity ids between the wire (relative) and local (absolute)
/// id spaces.
pub trait EntityMapper {
    fn to_absolute(&mut self, relative: EntityId) -> Result<EntityId, MapError>;

    fn to_relative(&mut self, absolute: EntityId) -> Result<EntityId, MapError>;
}

/// Mutable view over the entity-reference fields of one record.
pub struct RefFields<'a> {
    record: &'a mut DeltaRecord,
    descriptor: &'a ComponentDescriptor,
}

impl DeltaRecord {
    /// Returns the reference view, or `None` if the type has no reference
    /// fields or `descriptor` does not describe this record.
    pub fn ref_fields<'a>(
        &'a mut self,
        descriptor: &'a ComponentDescriptor,
    ) -> Option<RefFields<'a>> {
        if !descriptor.has_ref_fields() || self.check_descriptor(descriptor).is_err() {
            return None;
        }
        Some(RefFields {
            record: self,
            descriptor,
        })
    }
}

impl RefFields<'_> {
    /// Set of entities referenced by present fields.
    #[must_use]
    pub fn entity_refs(&self) -> BTreeSet<EntityId> {
        self.ref_indices()
            .filter_map(|index| match self.record.values[index] {
                Some(FieldValue::Entity(Some(id))) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Rewrites every present reference to `from` into `to`, returning the
    /// mask of rewritten fields.
    pub fn replace_references(&mut self, from: EntityId, to: EntityId) -> FieldMask {
        let mut replaced = FieldMask::EMPTY;
        for index in self.ref_indices().collect::<Vec<_>>() {
            if self.record.values[index] == Some(FieldValue::Entity(Some(from))) {
                self.record.values[index] = Some(FieldValue::Entity(Some(to)));
                replaced.insert(index);
            }
        }
        replaced
    }

    /// Maps every present reference from the wire id space to local ids.
    ///
    /// Stops at the first failure; fields before it stay mapped.
    pub fn map_to_absolute(&mut self, mapper: &mut dyn EntityMapper) -> CodecResult<()> {
        self.map_with(|id| mapper.to_absolute(id))
    }

    /// Maps every present reference from local ids to the wire id space.
    ///
    /// Stops at the first failure; fields before it stay mapped.
    pub fn map_to_relative(&mut self, mapper: &mut dyn EntityMapper) -> CodecResult<()> {
        self.map_with(|id| mapper.to_relative(id))
    }

    fn map_with(
        &mut self,
        mut map: impl FnMut(EntityId) -> Result<EntityId, MapError>,
    ) -> CodecResult<()> {
        let type_id = self.descriptor.type_id;
        for index in self.ref_indices().collect::<Vec<_>>() {
            if let Some(FieldValue::Entity(Some(id))) = self.record.values[index] {
                let mapped = map(id).map_err(|error| {
                    log::debug!("entity mapping failed for {type_id}:{index}: {error}");
                    CodecError::EntityMapping {
                        type_id,
                        field: index,
                        error,
                    }
                })?;
                self.record.values[index] = Some(FieldValue::Entity(Some(mapped)));
            }
        }
        Ok(())
    }

    fn ref_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.descriptor
            .fields
            .iter()
            .enumerate()
            .filter(|(_, def)| def.kind == FieldKind::EntityRef)
            .map(|(index, _)| index)
            .filter(|index| self.record.fields_mask.contains(*index))
    }
}
