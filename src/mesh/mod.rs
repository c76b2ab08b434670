//! # Mesh Information
//!
//! The writer reads meshes through the [Mesh](`crate::Mesh`) trait. This module holds the
//! vocabulary that trait is expressed in ([`Entity`] handles, [`EntityType`] and its local
//! numbering tables, the [`Lagrange`] and [`IntegrationPoints`] node distributions) and an
//! in-memory [`UnstructuredMesh`] implementation of it.
//!
//! ## Defining your own mesh
//!
//! Any partition data structure can be written once it can
//!
//! * count its entities per dimension and hand them out as dense `Entity` indices
//! * report the type of every entity and its canonical downward adjacency
//! * provide the coordinate shape, the coordinate field and the registered fields
//!
//! Entity order matters: every array of a piece file is written in the order entities
//! are indexed.

mod shape;
mod topology;
mod unstructured;

pub use shape::{IntegrationPoints, Lagrange};
pub use topology::{vtk_cell_type, EntityType};
pub use unstructured::{MeshBuilder, UnstructuredMesh};

use derive_more::Constructor;

/// Handle of one mesh entity: its dimension and its index among the entities of that
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Constructor)]
pub struct Entity {
    pub dim: usize,
    pub index: usize,
}

/// Iterator over all entities of one dimension in mesh order
#[derive(Debug, Clone)]
pub struct EntityIter {
    dim: usize,
    range: std::ops::Range<usize>,
}

impl EntityIter {
    pub fn new(dim: usize, count: usize) -> Self {
        Self {
            dim,
            range: 0..count,
        }
    }
}

impl Iterator for EntityIter {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        self.range.next().map(|index| Entity::new(self.dim, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for EntityIter {}

#[test]
fn entity_iter_in_index_order() {
    let entities: Vec<_> = EntityIter::new(2, 3).collect();
    assert_eq!(
        entities,
        vec![Entity::new(2, 0), Entity::new(2, 1), Entity::new(2, 2)]
    );
    assert_eq!(EntityIter::new(1, 0).len(), 0);
}
