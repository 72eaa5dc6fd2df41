//! Schema registry: the set of component descriptors known to both peers.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::descriptor::ComponentDescriptor;
use crate::error::{SchemaError, SchemaResult};
use crate::ComponentTypeId;

/// A validated collection of component descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    pub components: Vec<ComponentDescriptor>,
}

impl Schema {
    /// Creates a schema from descriptors after validation.
    pub fn new(components: Vec<ComponentDescriptor>) -> SchemaResult<Self> {
        let schema = Self { components };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            components: Vec::new(),
        }
    }

    /// Validates every descriptor and the uniqueness of type ids.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut type_ids = HashSet::new();
        for component in &self.components {
            if !type_ids.insert(component.type_id) {
                return Err(SchemaError::DuplicateTypeId {
                    type_id: component.type_id,
                });
            }
            component.validate()?;
        }
        Ok(())
    }

    /// Looks up the descriptor for `type_id`.
    #[must_use]
    pub fn get(&self, type_id: ComponentTypeId) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.type_id == type_id)
    }

    /// Looks up a descriptor by component name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    components: Vec<ComponentDescriptor>,
}

impl SchemaBuilder {
    /// Adds a component descriptor.
    #[must_use]
    pub fn component(mut self, component: ComponentDescriptor) -> Self {
        self.components.push(component);
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, FieldKind, NativeSlot, NativeType};

    fn flag(type_id: ComponentTypeId, name: &str) -> ComponentDescriptor {
        ComponentDescriptor::builder(type_id, name)
            .field(FieldDef::new(
                "on",
                FieldKind::bool(),
                NativeSlot::new(0, NativeType::Bool8),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn schema_builder_roundtrip() {
        let schema = Schema::builder()
            .component(flag(1, "A"))
            .component(flag(2, "B"))
            .build()
            .unwrap();
        assert_eq!(schema.components.len(), 2);
        assert_eq!(schema.get(2).map(|c| c.name.as_str()), Some("B"));
        assert_eq!(schema.by_name("A").map(|c| c.type_id), Some(1));
        assert!(schema.get(3).is_none());
    }

    #[test]
    fn schema_rejects_duplicate_type_ids() {
        let err = Schema::new(vec![flag(1, "A"), flag(1, "B")]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTypeId { type_id: 1 });
    }

    #[test]
    fn schema_revalidates_descriptors() {
        let mut bad = flag(1, "A");
        bad.native_size = 0;
        let err = Schema::new(vec![bad]).unwrap_err();
        assert!(matches!(err, SchemaError::NativeSlotOutOfBounds { .. }));
    }
}
