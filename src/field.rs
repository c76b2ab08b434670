//! storage for per-node values of fields and numberings

use crate::mesh::Entity;
use crate::traits::{FieldShape, Numeric};
use crate::write_vtk::Precision;
use crate::Error;

use std::collections::HashMap;
use std::sync::Arc;

/// Values attached to the nodes of a mesh.
///
/// Each entity carrying data stores `nodes * components` values, node-major. An entity is
/// covered by the field once values for all of its nodes are stored.
#[derive(Debug, Clone)]
pub struct FieldData<T> {
    name: String,
    shape: Arc<dyn FieldShape>,
    components: usize,
    data: HashMap<Entity, Vec<T>>,
}

/// real valued field, written as `Float64`
pub type Field = FieldData<f64>;

/// integer numbering, written as `Int32`
pub type Numbering = FieldData<i32>;

/// global (wide) numbering, written as `Int64`
pub type GlobalNumbering = FieldData<i64>;

impl<T: Numeric> FieldData<T> {
    /// an empty field with `components` values per node
    pub fn new(name: impl Into<String>, shape: Arc<dyn FieldShape>, components: usize) -> Self {
        Self {
            name: name.into(),
            shape,
            components,
            data: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Arc<dyn FieldShape> {
        &self.shape
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn precision(&self) -> Precision {
        T::as_precision()
    }

    /// whether any value has been assigned on `entity`
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.data.contains_key(&entity)
    }

    /// whether values for the first `nodes` nodes of `entity` are stored
    pub fn covers(&self, entity: Entity, nodes: usize) -> bool {
        self.data
            .get(&entity)
            .map_or(false, |values| values.len() >= nodes * self.components)
    }

    /// the components stored for one node of an entity
    pub fn node_components(&self, entity: Entity, node: usize) -> Option<&[T]> {
        let values = self.data.get(&entity)?;
        let start = node * self.components;
        values.get(start..start + self.components)
    }

    /// assign the components of one node. Other nodes of the entity that have not been
    /// assigned yet read as zero.
    pub fn set_node_components(
        &mut self,
        entity: Entity,
        node: usize,
        values: &[T],
    ) -> Result<(), Error> {
        if values.len() != self.components {
            return Err(self.mismatch(values.len()));
        }

        let start = node * self.components;
        let stored = self.data.entry(entity).or_default();
        if stored.len() < start + self.components {
            stored.resize(start + self.components, T::zero());
        }
        stored[start..start + self.components].copy_from_slice(values);

        Ok(())
    }

    /// assign all nodes of an entity at once, node-major
    pub fn set_entity(&mut self, entity: Entity, values: Vec<T>) -> Result<(), Error> {
        let whole_nodes = match self.components {
            0 => values.is_empty(),
            n => values.len() % n == 0,
        };
        if !whole_nodes {
            return Err(self.mismatch(values.len()));
        }

        self.data.insert(entity, values);
        Ok(())
    }

    /// drop all values of an entity
    pub fn remove_entity(&mut self, entity: Entity) -> Option<Vec<T>> {
        self.data.remove(&entity)
    }

    fn mismatch(&self, actual: usize) -> Error {
        Error::ComponentMismatch {
            field: self.name.clone(),
            expected: self.components,
            actual,
        }
    }
}

/// One of the three kinds of field-like objects registered on a mesh.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Value(&'a Field),
    Numbering(&'a Numbering),
    GlobalNumbering(&'a GlobalNumbering),
}

impl<'a> FieldRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Value(f) => f.name(),
            Self::Numbering(n) => n.name(),
            Self::GlobalNumbering(n) => n.name(),
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            Self::Value(f) => f.precision(),
            Self::Numbering(n) => n.precision(),
            Self::GlobalNumbering(n) => n.precision(),
        }
    }

    pub fn components(&self) -> usize {
        match self {
            Self::Value(f) => f.components(),
            Self::Numbering(n) => n.components(),
            Self::GlobalNumbering(n) => n.components(),
        }
    }

    pub fn shape(&self) -> &'a Arc<dyn FieldShape> {
        match self {
            Self::Value(f) => f.shape(),
            Self::Numbering(n) => n.shape(),
            Self::GlobalNumbering(n) => n.shape(),
        }
    }

    pub fn covers(&self, entity: Entity, nodes: usize) -> bool {
        match self {
            Self::Value(f) => f.covers(entity, nodes),
            Self::Numbering(n) => n.covers(entity, nodes),
            Self::GlobalNumbering(n) => n.covers(entity, nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{IntegrationPoints, Lagrange};

    #[test]
    fn node_components_roundtrip() {
        let shape = Lagrange::shared(1).unwrap();
        let mut field = Field::new("velocity", shape, 2);
        let e = Entity::new(0, 4);

        assert!(!field.has_entity(e));
        field.set_node_components(e, 0, &[1.0, 2.0]).unwrap();
        assert!(field.has_entity(e));
        assert_eq!(field.node_components(e, 0), Some(&[1.0, 2.0][..]));
        assert_eq!(field.node_components(e, 1), None);

        field.set_node_components(e, 2, &[5.0, 6.0]).unwrap();
        assert_eq!(field.node_components(e, 1), Some(&[0.0, 0.0][..]));
        assert_eq!(field.node_components(e, 2), Some(&[5.0, 6.0][..]));
    }

    #[test]
    fn coverage_counts_every_node() {
        let shape = IntegrationPoints::shared(2, 3);
        let mut field = Field::new("stress", shape, 1);
        let e = Entity::new(2, 0);

        assert!(!field.covers(e, 3));
        field.set_node_components(e, 0, &[1.0]).unwrap();
        assert!(field.covers(e, 1));
        assert!(!field.covers(e, 3));

        field.set_entity(e, vec![1.0, 2.0, 3.0]).unwrap();
        assert!(field.covers(e, 3));
        assert!(!FieldRef::Value(&field).covers(Entity::new(2, 1), 3));
    }

    #[test]
    fn wrong_component_count() {
        let shape = Lagrange::shared(1).unwrap();
        let mut numbering = Numbering::new("ids", shape, 1);
        let err = numbering
            .set_node_components(Entity::new(0, 0), 0, &[1, 2])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ComponentMismatch {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(numbering.set_entity(Entity::new(0, 0), vec![1, 2]).is_ok());
    }

    #[test]
    fn tagged_dispatch() {
        let shape = Lagrange::shared(1).unwrap();
        let global = GlobalNumbering::new("gid", shape.clone(), 1);
        let field_ref = FieldRef::GlobalNumbering(&global);

        assert_eq!(field_ref.name(), "gid");
        assert_eq!(field_ref.precision(), Precision::Int64);
        assert!(Arc::ptr_eq(field_ref.shape(), &shape));
    }
}
