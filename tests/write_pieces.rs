mod common;

use common::{fan, payload, read_text, single_triangle, vertex_field};

use mesh_vtk::parse::{parse_pvtu, parse_vtu, ArrayValues};
use mesh_vtk::prelude::*;
use mesh_vtk::{read_vtu, Error, GlobalNumbering};

#[test]
fn three_vertices_three_rows() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("tri");
    let prefix = prefix.to_str().unwrap();

    write_vtk_files(prefix, &single_triangle(), &SerialComm::new()).unwrap();

    let text = read_text(&dir.path().join("tri0.vtu"));
    assert_eq!(
        payload(&text, "coordinates"),
        "0.0 0.0 0.0 \n1.0 0.0 0.0 \n0.0 1.0 0.0"
    );

    let piece = parse_vtu(&text).unwrap();
    assert_eq!(piece.number_of_points, 3);
    assert_eq!(piece.points.components, 3);
    assert_eq!(piece.points.rows(), 3);

    let summary = parse_pvtu(&read_text(&dir.path().join("tri.pvtu"))).unwrap();
    assert_eq!(summary.sources, vec!["tri0.vtu"]);
}

#[test]
fn binary_length_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("fan");

    let mut mesh = fan(1);
    let velocity = vertex_field(&mesh, "velocity", 2, |v| vec![v as f64, -(v as f64)]);
    mesh.add_field(velocity);

    write_binary_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let text = read_text(&dir.path().join("fan0.vtu"));
    let encoded = payload(&text, "velocity");
    let header = base64::decode(&encoded[..8]).unwrap();
    let declared = u32::from_ne_bytes([header[0], header[1], header[2], header[3]]);
    assert_eq!(declared, 2 * 5 * 8);
    assert_eq!(base64::decode(&encoded[8..]).unwrap().len(), 80);
}

#[test]
fn binary_and_ascii_agree() {
    let dir = tempfile::tempdir().unwrap();
    let ascii = dir.path().join("ascii");
    let binary = dir.path().join("binary");

    let mut mesh = fan(2);
    let mut ids = GlobalNumbering::new("global", mesh.shape().clone(), 1);
    let numbering = mesh_vtk::NodeNumbering::overlap(&mesh);
    for (i, node) in numbering.nodes().iter().enumerate() {
        ids.set_node_components(node.entity, node.node, &[1000 + i as i64])
            .unwrap();
    }
    mesh.add_global_numbering(ids);

    let comm = SerialComm::new();
    write_vtk_files(ascii.to_str().unwrap(), &mesh, &comm).unwrap();
    write_binary_vtk_files(binary.to_str().unwrap(), &mesh, &comm).unwrap();

    let ascii = read_vtu(&dir.path().join("ascii0.vtu")).unwrap();
    let binary = read_vtu(&dir.path().join("binary0.vtu")).unwrap();

    assert_eq!(ascii.points.format, Encoding::Ascii);
    assert_eq!(binary.points.format, Encoding::Base64);
    assert_eq!(ascii.points.values, binary.points.values);

    for (a, b) in ascii.cells.iter().zip(&binary.cells) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.values, b.values);
    }
    for (a, b) in ascii.point_data.iter().zip(&binary.point_data) {
        assert_eq!(a.values, b.values);
    }
    for (a, b) in ascii.cell_data.iter().zip(&binary.cell_data) {
        assert_eq!(a.values, b.values);
    }
    assert_eq!(ascii.point_data.len(), 1);
    assert_eq!(binary.cell_data.len(), 1);
}

#[test]
fn quadratic_triangles() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("quad");
    write_vtk_files(prefix.to_str().unwrap(), &fan(2), &SerialComm::new()).unwrap();

    let piece = read_vtu(&dir.path().join("quad0.vtu")).unwrap();
    // 5 vertices and 7 edges
    assert_eq!(piece.number_of_points, 12);
    assert_eq!(
        piece.cell_array("types").unwrap().values,
        ArrayValues::UInt8(vec![22, 22, 22])
    );
    assert_eq!(
        piece.cell_array("offsets").unwrap().values,
        ArrayValues::Int32(vec![6, 12, 18])
    );

    let connectivity = piece.cell_array("connectivity").unwrap();
    assert_eq!(connectivity.values.len(), 18);
    // corner nodes come first in every cell
    assert_eq!(
        &connectivity.values.as_i32().unwrap()[..3],
        &[0, 1, 2]
    );
}

#[test]
fn point_rows_match_points() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("rows");

    let mut mesh = fan(1);
    let pressure = vertex_field(&mesh, "pressure", 1, |v| vec![v as f64 * 0.5]);
    let velocity = vertex_field(&mesh, "velocity", 3, |v| vec![v as f64, 0., 1.]);
    mesh.add_field(pressure);
    mesh.add_field(velocity);

    write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let text = read_text(&dir.path().join("rows0.vtu"));
    let piece = parse_vtu(&text).unwrap();
    assert_eq!(piece.point_data.len(), 2);
    for array in &piece.point_data {
        assert_eq!(array.rows(), piece.points.rows());
        assert_eq!(array.rows(), piece.number_of_points);
    }

    // one row per line in ascii mode
    assert_eq!(payload(&text, "velocity").lines().count(), 5);
}

#[test]
fn integration_point_arrays_per_point() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("ip");

    let mut mesh = fan(1);
    let mut stress = Field::new("stress", IntegrationPoints::shared(2, 3), 2);
    for element in 0..3 {
        let values = (0..6).map(|i| (10 * element + i) as f64).collect();
        stress.set_entity(Entity::new(2, element), values).unwrap();
    }
    mesh.add_field(stress);

    write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let piece = read_vtu(&dir.path().join("ip0.vtu")).unwrap();
    let names: Vec<_> = piece.cell_data.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["stress_1", "stress_2", "stress_3", "apf_part"]);

    for array in &piece.cell_data {
        assert_eq!(array.rows(), piece.number_of_cells);
    }
    assert_eq!(
        piece.cell_data_array("stress_2").unwrap().values,
        ArrayValues::Float64(vec![2., 3., 12., 13., 22., 23.])
    );
}

#[test]
fn constant_cell_field() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("constant");

    let mut mesh = fan(1);
    let shape = std::sync::Arc::new(IntegrationPoints::constant(2));
    let mut material = Numbering::new("material", shape, 1);
    for element in 0..3 {
        material
            .set_node_components(Entity::new(2, element), 0, &[7])
            .unwrap();
    }
    mesh.add_numbering(material);

    write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let piece = read_vtu(&dir.path().join("constant0.vtu")).unwrap();
    let material = piece.cell_data_array("material_1").unwrap();
    assert_eq!(material.precision, Precision::Int32);
    assert_eq!(material.values, ArrayValues::Int32(vec![7, 7, 7]));
}

#[test]
fn same_state_same_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut mesh = fan(1);
    let field = vertex_field(&mesh, "u", 1, |v| vec![v as f64 / 3.0]);
    mesh.add_field(field);

    let comm = SerialComm::new();
    for prefix in ["first", "second"] {
        let prefix = dir.path().join(prefix);
        write_binary_vtk_files(prefix.to_str().unwrap(), &mesh, &comm).unwrap();
    }

    let first = std::fs::read(dir.path().join("first0.vtu")).unwrap();
    let second = std::fs::read(dir.path().join("second0.vtu")).unwrap();
    assert_eq!(first, second);

    let first = read_text(&dir.path().join("first.pvtu"));
    let second = read_text(&dir.path().join("second.pvtu"));
    assert_eq!(first.replace("first0.vtu", "second0.vtu"), second);
}

#[test]
fn empty_payloads_are_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("empty");

    // points but no elements
    let mut mesh = MeshBuilder::new(2)
        .add_points([[0., 0., 0.], [1., 0., 0.]])
        .build()
        .unwrap();
    let mut flags = Field::new("flags", mesh.shape().clone(), 0);
    for vertex in 0..2 {
        flags.set_entity(Entity::new(0, vertex), Vec::new()).unwrap();
    }
    mesh.add_field(flags);

    for encoding in [Encoding::Ascii, Encoding::Base64] {
        let options = WriteOptions::new().encoding(encoding);
        write_with_options(prefix.to_str().unwrap(), &mesh, &SerialComm::new(), &options)
            .unwrap();

        let text = read_text(&dir.path().join("empty0.vtu"));
        let piece = parse_vtu(&text).unwrap();
        assert_eq!(piece.number_of_cells, 0);
        assert!(piece.cell_array("connectivity").unwrap().values.is_empty());
        assert!(piece.cell_data_array("apf_part").unwrap().values.is_empty());

        let flags = piece.point_array("flags").unwrap();
        assert_eq!(flags.components, 0);
        assert!(flags.values.is_empty());
    }
}

#[test]
fn single_file_has_no_summary() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("one");

    write_one_vtk_file(prefix.to_str().unwrap(), &fan(1), &SerialComm::new()).unwrap();

    assert!(dir.path().join("one0.vtu").exists());
    assert!(!dir.path().join("one.pvtu").exists());
}

#[test]
fn quadratic_prism_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("prism");

    let mesh = MeshBuilder::new(3)
        .order(2)
        .add_points([
            [0., 0., 0.],
            [1., 0., 0.],
            [0., 1., 0.],
            [0., 0., 1.],
            [1., 0., 1.],
            [0., 1., 1.],
        ])
        .add_element(EntityType::Prism, &[0, 1, 2, 3, 4, 5])
        .build()
        .unwrap();

    let result = write_one_vtk_file(prefix.to_str().unwrap(), &mesh, &SerialComm::new());
    assert!(matches!(
        result,
        Err(Error::UnsupportedCellType {
            entity_type: EntityType::Prism,
            order: 2
        })
    ));
    assert!(!dir.path().join("prism0.vtu").exists());
}

#[test]
fn mixed_topology_needs_no_integration_points() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("mixed");
    let prefix = prefix.to_str().unwrap();

    let mut mesh = MeshBuilder::new(2)
        .add_points([[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.], [2., 0., 0.]])
        .add_element(EntityType::Quad, &[0, 1, 2, 3])
        .add_element(EntityType::Triangle, &[1, 4, 2])
        .build()
        .unwrap();

    write_vtk_files(prefix, &mesh, &SerialComm::new()).unwrap();
    let piece = read_vtu(&std::path::PathBuf::from(format!("{prefix}0.vtu"))).unwrap();
    assert_eq!(
        piece.cell_array("offsets").unwrap().values,
        ArrayValues::Int32(vec![4, 7])
    );

    let mut ip = Field::new("ip", IntegrationPoints::shared(2, 1), 1);
    ip.set_entity(Entity::new(2, 0), vec![1.0]).unwrap();
    ip.set_entity(Entity::new(2, 1), vec![2.0]).unwrap();
    mesh.add_field(ip);

    assert!(matches!(
        write_one_vtk_file(prefix, &mesh, &SerialComm::new()),
        Err(Error::MixedTopology { .. })
    ));
}

#[test]
fn linear_tet() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("tet");

    let mesh = MeshBuilder::new(3)
        .add_points([[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]])
        .add_element(EntityType::Tet, &[0, 1, 2, 3])
        .build()
        .unwrap();

    write_binary_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let piece = read_vtu(&dir.path().join("tet0.vtu")).unwrap();
    assert_eq!(piece.big_endian, Some(cfg!(target_endian = "big")));
    assert_eq!(
        piece.cell_array("connectivity").unwrap().values,
        ArrayValues::Int32(vec![0, 1, 2, 3])
    );
    assert_eq!(
        piece.cell_array("types").unwrap().values,
        ArrayValues::UInt8(vec![10])
    );
}

#[test]
fn partially_filled_integration_points_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("ip");

    let mut mesh = single_triangle();
    let mut stress = Field::new("stress", IntegrationPoints::shared(2, 3), 1);
    // only the first of three points
    stress
        .set_node_components(Entity::new(2, 0), 0, &[1.0])
        .unwrap();
    mesh.add_field(stress);

    write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let summary = read_text(&dir.path().join("ip.pvtu"));
    let piece = read_text(&dir.path().join("ip0.vtu"));
    assert!(!summary.contains("stress"));
    assert!(!piece.contains("stress"));

    let names: Vec<_> = parse_pvtu(&summary)
        .unwrap()
        .cell_data
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["apf_part"]);
}

#[test]
fn quadratic_tets_follow_vtk_edge_order() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("p2tet");

    let mesh = MeshBuilder::new(3)
        .order(2)
        .add_points([
            [0., 0., 0.],
            [1., 0., 0.],
            [0., 1., 0.],
            [0., 0., 1.],
            [1., 1., 1.],
        ])
        .add_element(EntityType::Tet, &[0, 1, 2, 3])
        .add_element(EntityType::Tet, &[1, 2, 3, 4])
        .build()
        .unwrap();

    write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new()).unwrap();

    let piece = read_vtu(&dir.path().join("p2tet0.vtu")).unwrap();
    // 5 vertices and 9 edges
    assert_eq!(piece.number_of_points, 14);
    assert_eq!(
        piece.cell_array("types").unwrap().values,
        ArrayValues::UInt8(vec![24, 24])
    );
    assert_eq!(
        piece.cell_array("offsets").unwrap().values,
        ArrayValues::Int32(vec![10, 20])
    );

    let connectivity = piece.cell_array("connectivity").unwrap();
    let connectivity = connectivity.values.as_i32().unwrap();
    assert_eq!(
        connectivity,
        &[0, 1, 2, 3, 5, 6, 7, 8, 9, 10, 1, 2, 3, 4, 6, 10, 9, 11, 12, 13]
    );

    // mid-edge nodes sit between (0,1), (1,2), (2,0), (0,3), (1,3), (2,3)
    let points = piece.points.values.as_f64().unwrap();
    let point = |n: i32| points[3 * n as usize..3 * n as usize + 3].to_vec();
    let edges = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
    for cell in connectivity.chunks(10) {
        for (k, [a, b]) in edges.iter().enumerate() {
            let (a, b) = (point(cell[*a]), point(cell[*b]));
            let middle: Vec<f64> = (0..3).map(|i| 0.5 * (a[i] + b[i])).collect();
            assert_eq!(point(cell[4 + k]), middle);
        }
    }
}
