//! Decide which field-like objects are written, and where.
//!
//! A field is written as point data when it shares the coordinate shape of the mesh and as
//! cell data when its nodes sit only on the top dimension entities. Either way it is only
//! written when it is printable: every node its shape puts on the mesh has data assigned.

use crate::field::FieldRef;
use crate::mesh::EntityType;
use crate::traits::{FieldShape, Mesh};
use crate::Error;

use std::sync::Arc;

fn same_shape(a: &Arc<dyn FieldShape>, b: &Arc<dyn FieldShape>) -> bool {
    // compare the data pointers only, vtables may be duplicated across codegen units
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// whether the field uses the node distribution of the mesh coordinates
pub fn is_nodal<M: Mesh + ?Sized>(mesh: &M, field: FieldRef<'_>) -> bool {
    same_shape(field.shape(), mesh.shape())
}

/// whether the field only has nodes inside the top dimension entities of the mesh
///
/// Assumes all elements have the same type.
pub fn is_integration_point<M: Mesh + ?Sized>(mesh: &M, field: FieldRef<'_>) -> bool {
    let shape = field.shape();
    let d = mesh.dimension();

    if (0..d).any(|dim| shape.has_nodes_in(dim)) {
        return false;
    }

    shape.has_nodes_in(d)
}

/// whether every node of every entity carrying nodes of the field's shape has data
pub fn is_printable<M: Mesh + ?Sized>(mesh: &M, field: FieldRef<'_>) -> bool {
    let shape = field.shape();

    for dim in 0..=mesh.dimension() {
        if !shape.has_nodes_in(dim) {
            continue;
        }

        for entity in mesh.entities(dim) {
            let nodes = shape.count_nodes_on(mesh.entity_type(entity));
            if nodes == 0 {
                continue;
            }
            if !field.covers(entity, nodes) {
                return false;
            }
        }
    }

    true
}

/// number of integration points of the field, sampled on the first element
pub fn count_integration_points<M: Mesh + ?Sized>(mesh: &M, field: FieldRef<'_>) -> usize {
    mesh.entities(mesh.dimension())
        .next()
        .map(|element| field.shape().count_nodes_on(mesh.entity_type(element)))
        .unwrap_or(0)
}

/// fail unless every element of the mesh has the same type
pub fn check_uniform_topology<M: Mesh + ?Sized>(mesh: &M) -> Result<(), Error> {
    let mut elements = mesh.entities(mesh.dimension());

    let first: EntityType = match elements.next() {
        Some(element) => mesh.entity_type(element),
        None => return Ok(()),
    };

    for element in elements {
        let other = mesh.entity_type(element);
        if other != first {
            return Err(Error::MixedTopology { first, other });
        }
    }

    Ok(())
}

/// the field-like objects written as point data, in output order
pub fn point_data_fields<M: Mesh + ?Sized>(mesh: &M) -> Vec<FieldRef<'_>> {
    mesh.field_refs()
        .into_iter()
        .filter(|f| is_nodal(mesh, *f) && printable_or_skip(mesh, *f))
        .collect()
}

/// the field-like objects written as cell data, in output order
pub fn cell_data_fields<M: Mesh + ?Sized>(mesh: &M) -> Vec<FieldRef<'_>> {
    mesh.field_refs()
        .into_iter()
        .filter(|f| is_integration_point(mesh, *f) && printable_or_skip(mesh, *f))
        .collect()
}

/// the visible name of the array holding integration point `point` of a field
pub fn integration_point_name(field: FieldRef<'_>, point: usize) -> String {
    // one based, zero based names confuse people reading the files
    format!("{}_{}", field.name(), point + 1)
}

fn printable_or_skip<M: Mesh + ?Sized>(mesh: &M, field: FieldRef<'_>) -> bool {
    let printable = is_printable(mesh, field);
    if !printable {
        log::debug!("skipping `{}`: not every entity has data", field.name());
    }
    printable
}
