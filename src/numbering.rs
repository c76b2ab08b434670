//! Overlap node numbering: the row order of every point array in a piece.

use crate::mesh::Entity;
use crate::traits::{FieldShape, Mesh};
use crate::Error;

use derive_more::Constructor;
use std::collections::HashMap;

/// One node of a field shape: a node index local to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
pub struct Node {
    pub entity: Entity,
    pub node: usize,
}

/// Consecutive numbers for every node of the coordinate shape visible to a partition.
///
/// Nodes are numbered by ascending dimension, then mesh order, then local node index. The
/// numbering is rebuilt for every write and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct NodeNumbering {
    nodes: Vec<Node>,
    numbers: HashMap<Node, usize>,
}

impl NodeNumbering {
    /// number every node of the mesh coordinate shape, owned or ghosted
    pub fn overlap<M: Mesh + ?Sized>(mesh: &M) -> Self {
        let shape = mesh.shape();
        let mut numbering = Self::default();

        for dim in 0..=mesh.dimension() {
            if !shape.has_nodes_in(dim) {
                continue;
            }
            for entity in mesh.entities(dim) {
                for node in 0..shape.count_nodes_on(mesh.entity_type(entity)) {
                    numbering.push(Node::new(entity, node));
                }
            }
        }

        numbering
    }

    fn push(&mut self, node: Node) {
        self.numbers.insert(node, self.nodes.len());
        self.nodes.push(node);
    }

    /// all numbered nodes, in number order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn number(&self, node: Node) -> Option<usize> {
        self.numbers.get(&node).copied()
    }

    /// Numbers of the nodes in the closure of an element, in connectivity order: vertices,
    /// edges, faces and finally the element itself, each in canonical local order.
    pub fn element_numbers<M: Mesh + ?Sized>(
        &self,
        mesh: &M,
        element: Entity,
    ) -> Result<Vec<usize>, Error> {
        let shape = mesh.shape();
        let mut numbers = Vec::with_capacity(shape.count_element_nodes(mesh.entity_type(element)));

        for dim in 0..=element.dim {
            if !shape.has_nodes_in(dim) {
                continue;
            }

            let closure = if dim == element.dim {
                std::slice::from_ref(&element)
            } else {
                mesh.downward(element, dim)
            };

            for entity in closure {
                self.push_entity_numbers(mesh, &**shape, *entity, &mut numbers)?;
            }
        }

        Ok(numbers)
    }

    fn push_entity_numbers<M: Mesh + ?Sized>(
        &self,
        mesh: &M,
        shape: &dyn FieldShape,
        entity: Entity,
        numbers: &mut Vec<usize>,
    ) -> Result<(), Error> {
        for node in 0..shape.count_nodes_on(mesh.entity_type(entity)) {
            let number = self
                .number(Node::new(entity, node))
                .ok_or_else(|| Error::MissingNodeData {
                    field: String::from("node numbering"),
                    entity,
                    node,
                })?;
            numbers.push(number);
        }
        Ok(())
    }
}
