use super::{Entity, EntityType, Lagrange};
use crate::field::{Field, GlobalNumbering, Numbering};
use crate::traits::{FieldShape, Mesh};
use crate::Error;

use std::collections::HashMap;
use std::sync::Arc;

/// name of the coordinate field of an [`UnstructuredMesh`]
pub const COORDINATES: &str = "coordinates";

#[derive(Debug, Clone)]
struct EntityRecord {
    entity_type: EntityType,
    // downward[d] holds the bounding entities of dimension d
    downward: [Vec<Entity>; 3],
}

impl EntityRecord {
    fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            downward: Default::default(),
        }
    }
}

/// In-memory unstructured mesh partition with its registered fields.
///
/// Built with a [`MeshBuilder`]. Edges, and faces of 3D meshes, are derived from the
/// element vertices so that every entity of the closure of an element can be numbered.
#[derive(Debug, Clone)]
pub struct UnstructuredMesh {
    dimension: usize,
    shape: Arc<dyn FieldShape>,
    entities: [Vec<EntityRecord>; 4],
    coordinates: Field,
    fields: Vec<Field>,
    numberings: Vec<Numbering>,
    global_numberings: Vec<GlobalNumbering>,
}

impl UnstructuredMesh {
    /// register a value field. Fields are written in registration order.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// register an integer numbering
    pub fn add_numbering(&mut self, numbering: Numbering) {
        self.numberings.push(numbering);
    }

    /// register a global numbering
    pub fn add_global_numbering(&mut self, numbering: GlobalNumbering) {
        self.global_numberings.push(numbering);
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    pub fn numbering_mut(&mut self, name: &str) -> Option<&mut Numbering> {
        self.numberings.iter_mut().find(|n| n.name() == name)
    }

    pub fn global_numbering_mut(&mut self, name: &str) -> Option<&mut GlobalNumbering> {
        self.global_numberings.iter_mut().find(|n| n.name() == name)
    }

    pub fn coordinates_mut(&mut self) -> &mut Field {
        &mut self.coordinates
    }

    /// remove a field-like object of any kind by name, returns whether one was found
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.fields.len() + self.numberings.len() + self.global_numberings.len();
        self.fields.retain(|f| f.name() != name);
        self.numberings.retain(|n| n.name() != name);
        self.global_numberings.retain(|n| n.name() != name);
        before != self.fields.len() + self.numberings.len() + self.global_numberings.len()
    }

    /// the coordinates of a vertex
    pub fn point(&self, vertex: Entity) -> Option<[f64; 3]> {
        let xyz = self.coordinates.node_components(vertex, 0)?;
        Some([xyz[0], xyz[1], xyz[2]])
    }
}

impl Mesh for UnstructuredMesh {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn count(&self, dim: usize) -> usize {
        self.entities.get(dim).map(Vec::len).unwrap_or(0)
    }

    fn entity_type(&self, entity: Entity) -> EntityType {
        self.entities[entity.dim][entity.index].entity_type
    }

    fn downward(&self, entity: Entity, dim: usize) -> &[Entity] {
        if dim >= entity.dim {
            return &[];
        }
        &self.entities[entity.dim][entity.index].downward[dim]
    }

    fn shape(&self) -> &Arc<dyn FieldShape> {
        &self.shape
    }

    fn coordinates(&self) -> &Field {
        &self.coordinates
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn numberings(&self) -> &[Numbering] {
        &self.numberings
    }

    fn global_numberings(&self) -> &[GlobalNumbering] {
        &self.global_numberings
    }
}

/// Assemble an [`UnstructuredMesh`] from points and element vertex lists.
///
/// ```
/// use mesh_vtk::{EntityType, Mesh, MeshBuilder};
///
/// let mesh = MeshBuilder::new(2)
///     .add_point([0., 0., 0.])
///     .add_point([1., 0., 0.])
///     .add_point([0., 1., 0.])
///     .add_element(EntityType::Triangle, &[0, 1, 2])
///     .build()
///     .unwrap();
///
/// assert_eq!(mesh.count(2), 1);
/// assert_eq!(mesh.count(1), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    dimension: usize,
    order: usize,
    points: Vec<[f64; 3]>,
    elements: Vec<(EntityType, Vec<usize>)>,
}

impl MeshBuilder {
    /// a builder for a mesh whose elements have dimension `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            order: 1,
            points: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// interpolation order of the coordinate field, 1 (default) or 2
    pub fn order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn add_point(mut self, point: [f64; 3]) -> Self {
        self.points.push(point);
        self
    }

    pub fn add_points<I: IntoIterator<Item = [f64; 3]>>(mut self, points: I) -> Self {
        self.points.extend(points);
        self
    }

    /// add an element by the indices of its vertices, in VTK local order
    pub fn add_element(mut self, entity_type: EntityType, vertices: &[usize]) -> Self {
        self.elements.push((entity_type, vertices.to_vec()));
        self
    }

    pub fn build(self) -> Result<UnstructuredMesh, Error> {
        let shape = Lagrange::shared(self.order)?;
        let dimension = self.dimension;

        if !(1..=3).contains(&dimension) {
            return Err(Error::InvalidElement(format!(
                "mesh dimension must be 1, 2 or 3, got {dimension}"
            )));
        }

        let mut entities: [Vec<EntityRecord>; 4] = Default::default();
        entities[0] = vec![EntityRecord::new(EntityType::Vertex); self.points.len()];

        // sorted vertex indices -> entity index, for edges (1) and faces (2)
        let mut lookup: [HashMap<Vec<usize>, usize>; 3] = Default::default();

        for (entity_type, vertices) in &self.elements {
            validate_element(dimension, *entity_type, vertices, self.points.len())?;

            let vertex_entities: Vec<Entity> =
                vertices.iter().map(|v| Entity::new(0, *v)).collect();

            let mut record = EntityRecord::new(*entity_type);

            if dimension > 1 {
                for edge in entity_type.edges() {
                    let local = [vertices[edge[0]], vertices[edge[1]]];
                    let index = find_or_insert(
                        &mut entities,
                        &mut lookup,
                        EntityType::Edge,
                        &local,
                    );
                    record.downward[1].push(Entity::new(1, index));
                }
            }

            if dimension > 2 {
                for (face_type, face) in entity_type.faces() {
                    let local: Vec<usize> = face.iter().map(|v| vertices[*v]).collect();
                    let index = find_or_insert(&mut entities, &mut lookup, *face_type, &local);
                    record.downward[2].push(Entity::new(2, index));
                }
            }

            record.downward[0] = vertex_entities;
            entities[dimension].push(record);
        }

        let mut coordinates = Field::new(COORDINATES, shape.clone(), 3);
        for (index, point) in self.points.iter().enumerate() {
            coordinates.set_node_components(Entity::new(0, index), 0, point)?;
        }

        // quadratic meshes carry a node at the middle of every edge
        if shape.has_nodes_in(1) {
            for (index, edge) in entities[1].iter().enumerate() {
                let a = self.points[edge.downward[0][0].index];
                let b = self.points[edge.downward[0][1].index];
                let middle = [
                    0.5 * (a[0] + b[0]),
                    0.5 * (a[1] + b[1]),
                    0.5 * (a[2] + b[2]),
                ];
                coordinates.set_node_components(Entity::new(1, index), 0, &middle)?;
            }
        }

        Ok(UnstructuredMesh {
            dimension,
            shape,
            entities,
            coordinates,
            fields: Vec::new(),
            numberings: Vec::new(),
            global_numberings: Vec::new(),
        })
    }
}

fn validate_element(
    dimension: usize,
    entity_type: EntityType,
    vertices: &[usize],
    point_count: usize,
) -> Result<(), Error> {
    if entity_type.dimension() != dimension {
        return Err(Error::InvalidElement(format!(
            "{entity_type} element in a mesh of dimension {dimension}"
        )));
    }

    if vertices.len() != entity_type.vertex_count() {
        return Err(Error::InvalidElement(format!(
            "{entity_type} element needs {} vertices, got {}",
            entity_type.vertex_count(),
            vertices.len()
        )));
    }

    if let Some(v) = vertices.iter().find(|v| **v >= point_count) {
        return Err(Error::InvalidElement(format!(
            "vertex {v} out of range for {point_count} points"
        )));
    }

    Ok(())
}

/// index of the edge or face with the given vertices, created with its own downward
/// adjacency if it does not exist yet
fn find_or_insert(
    entities: &mut [Vec<EntityRecord>; 4],
    lookup: &mut [HashMap<Vec<usize>, usize>; 3],
    entity_type: EntityType,
    vertices: &[usize],
) -> usize {
    let dim = entity_type.dimension();
    let mut key = vertices.to_vec();
    key.sort_unstable();

    if let Some(index) = lookup[dim].get(&key) {
        return *index;
    }

    let mut record = EntityRecord::new(entity_type);
    record.downward[0] = vertices.iter().map(|v| Entity::new(0, *v)).collect();

    if dim == 2 {
        for edge in entity_type.edges() {
            let mut edge_key = vec![vertices[edge[0]], vertices[edge[1]]];
            edge_key.sort_unstable();
            // faces are only created after all edges of their element
            if let Some(edge_index) = lookup[1].get(&edge_key) {
                record.downward[1].push(Entity::new(1, *edge_index));
            }
        }
    }

    let index = entities[dim].len();
    entities[dim].push(record);
    lookup[dim].insert(key, index);
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> UnstructuredMesh {
        MeshBuilder::new(2)
            .add_points([[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]])
            .add_element(EntityType::Triangle, &[0, 1, 2])
            .add_element(EntityType::Triangle, &[0, 2, 3])
            .build()
            .unwrap()
    }

    #[test]
    fn shared_edges_are_derived_once() {
        let mesh = two_triangles();
        assert_eq!(mesh.count(0), 4);
        assert_eq!(mesh.count(1), 5);
        assert_eq!(mesh.count(2), 2);

        let first = Entity::new(2, 0);
        let second = Entity::new(2, 1);
        // edge (2, 0) of the first triangle is edge (0, 1) of the second
        assert_eq!(mesh.downward(first, 1)[2], mesh.downward(second, 1)[0]);
        assert_eq!(
            mesh.downward(second, 0),
            &[Entity::new(0, 0), Entity::new(0, 2), Entity::new(0, 3)]
        );
    }

    #[test]
    fn tet_faces_and_edges() {
        let mesh = MeshBuilder::new(3)
            .add_points([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]])
            .add_element(EntityType::Tet, &[0, 1, 2, 3])
            .build()
            .unwrap();

        assert_eq!(mesh.count(1), 6);
        assert_eq!(mesh.count(2), 4);
        let face = Entity::new(2, 0);
        assert_eq!(mesh.entity_type(face), EntityType::Triangle);
        assert_eq!(mesh.downward(face, 1).len(), 3);
    }

    #[test]
    fn quadratic_coordinates_on_edges() {
        let mesh = MeshBuilder::new(1)
            .order(2)
            .add_points([[0., 0., 0.], [2., 0., 0.]])
            .add_element(EntityType::Edge, &[0, 1])
            .build()
            .unwrap();

        // a 1D mesh has no derived edges, its elements are the edges
        assert_eq!(mesh.count(1), 1);
        assert_eq!(mesh.shape().order(), 2);
        assert_eq!(mesh.point(Entity::new(0, 1)), Some([2., 0., 0.]));
    }

    #[test]
    fn rejects_bad_elements() {
        let wrong_dim = MeshBuilder::new(3)
            .add_points([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]])
            .add_element(EntityType::Triangle, &[0, 1, 2])
            .build();
        assert!(matches!(wrong_dim, Err(Error::InvalidElement(_))));

        let out_of_range = MeshBuilder::new(2)
            .add_points([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]])
            .add_element(EntityType::Triangle, &[0, 1, 7])
            .build();
        assert!(matches!(out_of_range, Err(Error::InvalidElement(_))));

        assert!(matches!(
            MeshBuilder::new(2).order(3).build(),
            Err(Error::UnsupportedOrder(3))
        ));
    }

    #[test]
    fn remove_by_name() {
        let mut mesh = two_triangles();
        let shape = mesh.shape().clone();
        mesh.add_numbering(Numbering::new("ids", shape, 1));
        assert!(mesh.remove("ids"));
        assert!(!mesh.remove("ids"));
        assert!(mesh.numberings().is_empty());
    }
}
