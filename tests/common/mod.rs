#![allow(dead_code)]

use mesh_vtk::{Entity, EntityType, Field, Mesh, MeshBuilder, UnstructuredMesh};

use std::path::Path;

/// five points fanned into three triangles around point 0
pub fn fan(order: usize) -> UnstructuredMesh {
    MeshBuilder::new(2)
        .order(order)
        .add_points([
            [0., 0., 0.],
            [1., 0., 0.],
            [1., 1., 0.],
            [0., 1., 0.],
            [-1., 1., 0.],
        ])
        .add_element(EntityType::Triangle, &[0, 1, 2])
        .add_element(EntityType::Triangle, &[0, 2, 3])
        .add_element(EntityType::Triangle, &[0, 3, 4])
        .build()
        .unwrap()
}

pub fn single_triangle() -> UnstructuredMesh {
    MeshBuilder::new(2)
        .add_points([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]])
        .add_element(EntityType::Triangle, &[0, 1, 2])
        .build()
        .unwrap()
}

/// a nodal field on a linear mesh, `value(vertex)` giving the components of each vertex
pub fn vertex_field<F>(mesh: &UnstructuredMesh, name: &str, components: usize, value: F) -> Field
where
    F: Fn(usize) -> Vec<f64>,
{
    let mut field = Field::new(name, mesh.shape().clone(), components);
    for vertex in 0..mesh.count(0) {
        field
            .set_node_components(Entity::new(0, vertex), 0, &value(vertex))
            .unwrap();
    }
    field
}

pub fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// the text between the opening tag of the named array and its closing tag
pub fn payload<'a>(text: &'a str, name: &str) -> &'a str {
    let start = text.find(&format!("Name=\"{name}\"")).unwrap();
    let open = start + text[start..].find('>').unwrap() + 1;
    let close = open + text[open..].find("</DataArray>").unwrap();
    text[open..close].trim()
}
