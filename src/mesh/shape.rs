use super::EntityType;
use crate::traits::FieldShape;
use crate::Error;

use std::sync::Arc;

/// Continuous Lagrange node distribution: one node per vertex, plus one node per edge for
/// the quadratic shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lagrange {
    order: usize,
    name: String,
}

impl Lagrange {
    /// Lagrange shape of order 1 or 2
    pub fn new(order: usize) -> Result<Self, Error> {
        if !(1..=2).contains(&order) {
            return Err(Error::UnsupportedOrder(order));
        }

        Ok(Self {
            order,
            name: format!("Lagrange_{order}"),
        })
    }

    /// shared handle to a new Lagrange shape
    pub fn shared(order: usize) -> Result<Arc<dyn FieldShape>, Error> {
        Ok(Arc::new(Self::new(order)?))
    }
}

impl FieldShape for Lagrange {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> usize {
        self.order
    }

    fn has_nodes_in(&self, dim: usize) -> bool {
        dim == 0 || (dim == 1 && self.order == 2)
    }

    fn count_nodes_on(&self, entity_type: EntityType) -> usize {
        match entity_type {
            EntityType::Vertex => 1,
            EntityType::Edge if self.order == 2 => 1,
            _ => 0,
        }
    }
}

/// Sample points inside the entities of one dimension, usually the integration points of
/// the elements. Values on such a shape are not associated with any mesh node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationPoints {
    dimension: usize,
    points: usize,
    name: String,
}

impl IntegrationPoints {
    /// `points` sample points in every entity of dimension `dimension`
    pub fn new(dimension: usize, points: usize) -> Self {
        Self {
            dimension,
            points,
            name: format!("IPs_{dimension}_{points}"),
        }
    }

    /// a single value per entity of dimension `dimension`
    pub fn constant(dimension: usize) -> Self {
        let mut shape = Self::new(dimension, 1);
        shape.name = format!("Constant_{dimension}");
        shape
    }

    /// shared handle to a new integration point shape
    pub fn shared(dimension: usize, points: usize) -> Arc<dyn FieldShape> {
        Arc::new(Self::new(dimension, points))
    }
}

impl FieldShape for IntegrationPoints {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> usize {
        // values are piecewise constant around each point
        0
    }

    fn has_nodes_in(&self, dim: usize) -> bool {
        dim == self.dimension && self.points > 0
    }

    fn count_nodes_on(&self, entity_type: EntityType) -> usize {
        if entity_type.dimension() == self.dimension {
            self.points
        } else {
            0
        }
    }
}
