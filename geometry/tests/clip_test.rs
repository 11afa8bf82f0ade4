use geometry::{
    categorize_halfspace, clip, AffineTransform, Camera, Frustum, Halfspace, Plane, Polygon,
    Projection, Transform,
};
use math::{assert_close, assert_le, vec3, Degree, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn ground_quad(half: f32) -> Polygon {
    Polygon::new(vec![
        vec3(-half, 0.0, half),
        vec3(half, 0.0, half),
        vec3(half, 0.0, -half),
        vec3(-half, 0.0, -half),
    ])
}

/// Every vertex of a clipped polygon lies on the kept side of every plane.
#[test]
fn clipped_vertices_are_inside_all_planes() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let planes = (0..3)
            .map(|_| {
                let normal = vec3(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                Plane::new(normal, rng.gen_range(-0.5..0.5)).normalized()
            })
            .filter_map(Result::ok)
            .collect::<Vec<_>>();
        let clipped = clip(&ground_quad(2.0), &planes);
        for p in clipped.points() {
            for plane in planes.iter() {
                assert!(
                    plane.signed_distance(*p) > -1e-4,
                    "{} is behind {}",
                    p,
                    plane
                );
            }
        }
        assert_le!(clipped.area(), 16.0 + 1e-3);
    }
}

/// Clipping by a plane and by its flipped twin partitions the polygon.
#[test]
fn flipped_planes_partition_area() {
    let mut rng = StdRng::seed_from_u64(4);
    let quad = ground_quad(1.5);
    for _ in 0..50 {
        let normal = vec3(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
        let plane = match Plane::new(normal, rng.gen_range(-1.0..1.0)).normalized() {
            Ok(plane) => plane,
            Err(_) => continue,
        };
        let front = clip(&quad, &[plane]);
        let back = clip(&quad, &[plane.flipped()]);
        assert_close!(front.area() + back.area(), quad.area(), 1e-6);
    }
}

#[test]
fn camera_frustum_clips_ground() {
    let camera = Camera::looking_at(vec3(0.0, 5.0, 10.0), Vec3::ZERO, Vec3::Y)
        .unwrap()
        .with_projection(Projection::Perspective {
            fov_y: Degree(45.0),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 50.0,
        });
    let frustum = camera.frustum().unwrap();

    let ground = ground_quad(100.0);
    let visible = frustum.clip(&ground);
    assert!(!visible.is_empty());
    assert!(visible.area() < ground.area());
    for p in visible.points() {
        let ndc = camera.view_projection().unwrap().project_point(*p).unwrap();
        for i in 0..3 {
            assert_le!(ndc[i].abs(), 1.0 + 1e-3);
        }
    }

    // Clipping in world space agrees with clipping in eye space.
    let view = AffineTransform::from_matrix(camera.view_matrix().unwrap()).unwrap();
    let eye_frustum = Frustum::from_matrix(&camera.projection_matrix()).unwrap();
    let eye_visible = eye_frustum.clip(&view.apply(ground));
    assert_close!(eye_visible.area(), visible.area(), 1e-1);

    // The ground behind the camera is invisible.
    let behind = Polygon::new(
        ground_quad(1.0)
            .points()
            .iter()
            .map(|p| *p + vec3(0.0, 5.0, 20.0))
            .collect(),
    );
    assert!(frustum.clip(&behind).is_empty());
}

#[test]
fn transformed_plane_classifies_like_original() {
    let trans = AffineTransform::translater(vec3(2.0, -1.0, 0.5)).rotate_y(Degree(30.0));
    let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::Z).unwrap().flipped();
    let moved = trans.apply(plane);
    for p in [vec3(0.3, 2.0, 1.0), vec3(-4.0, -0.7, 2.0)].iter() {
        assert_ne!(categorize_halfspace(*p, &plane), Halfspace::Coincident);
        assert_eq!(
            categorize_halfspace(*p, &plane),
            categorize_halfspace(trans.apply_point(*p), &moved)
        );
    }
}
