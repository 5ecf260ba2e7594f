use super::*;

#[test]
fn test_triangle_bounds_from_vertices() {
  let tri = Triangle::new(
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-2.0, 3.0, 0.0),
    Vec3::new(0.0, 1.0, 4.0),
  );
  assert_eq!(tri.bounds.min, Vec3::new(-2.0, 0.0, -1.0));
  assert_eq!(tri.bounds.max, Vec3::new(1.0, 3.0, 4.0));
}

#[test]
fn test_push_grows_bounds() {
  let mut mesh = TriangleMesh::new();
  assert!(mesh.is_empty());

  mesh.push(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y));
  mesh.push(Triangle::new(Vec3::splat(2.0), Vec3::splat(3.0), Vec3::splat(2.5)));

  assert_eq!(mesh.len(), 2);
  assert_eq!(mesh.bounds().min, Vec3::ZERO);
  assert_eq!(mesh.bounds().max, Vec3::splat(3.0));
}

#[test]
fn test_from_indexed() {
  let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
  let mesh = TriangleMesh::from_indexed(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();

  assert_eq!(mesh.triangle_count(), 2);
  assert_eq!(mesh.triangles()[1].vertices, [Vec3::ZERO, Vec3::Y, Vec3::Z]);
  assert_eq!(mesh.triangle_bounds(1).max, Vec3::new(0.0, 1.0, 1.0));
}

#[test]
fn test_from_indexed_rejects_missing_vertex() {
  let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y];
  let err = TriangleMesh::from_indexed(&vertices, &[[0, 1, 2], [1, 2, 9]]).unwrap_err();
  assert!(matches!(
    err,
    BuildError::IndexOutOfRange {
      triangle: 1,
      index: 9
    }
  ));
}

#[test]
fn test_box_slice_default_bounds() {
  let boxes = vec![
    BoundingBox::new(Vec3::ZERO, Vec3::ONE),
    BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(0.5)),
  ];
  let bounds = boxes.as_slice().bounds();
  assert_eq!(bounds.min, Vec3::splat(-1.0));
  assert_eq!(bounds.max, Vec3::ONE);
  assert_eq!(boxes.triangle_count(), 2);
}
