use super::cube;
use rand::SeedableRng;
use rand_isaac::IsaacRng;
use shard3d::bounding_volume::Aabb;
use shard3d::math::{Point, Vector};
use shard3d::projection::{project_aabb, Camera, OrbitCamera, Viewport, YoloRecord};
use shard3d::shatter::{ShatterConfig, ShatterSession};

fn camera(viewport: &Viewport) -> Camera {
    Camera::look_at(Point::new(0.0, 0.0, 10.0), Point::origin(), viewport.aspect())
}

#[test]
fn boxes_outside_the_frustum_are_rejected() {
    let viewport = Viewport::new(800, 600);
    let camera = camera(&viewport);

    for center in [
        Point::new(100.0, 0.0, 0.0),
        Point::new(-100.0, 0.0, 0.0),
        Point::new(0.0, 100.0, 0.0),
        Point::new(0.0, -100.0, 0.0),
        Point::new(0.0, 0.0, 50.0),
    ] {
        let aabb = Aabb::from_half_extents(center, Vector::repeat(1.0));
        assert!(project_aabb(&aabb, &camera, &viewport, "out").is_none());
    }
}

#[test]
fn boxes_straddling_the_frustum_are_clipped() {
    let viewport = Viewport::new(800, 600);
    let camera = camera(&viewport);

    for center in [
        Point::new(5.0, 0.0, 0.0),
        Point::new(-5.0, 3.0, 0.0),
        Point::new(0.0, -4.5, 2.0),
        Point::new(0.0, 0.0, 10.0),
    ] {
        let aabb = Aabb::from_half_extents(center, Vector::repeat(1.5));
        let projected = project_aabb(&aabb, &camera, &viewport, "edge").unwrap();

        assert!(projected.left >= 0.0 && projected.top >= 0.0);
        assert!(projected.width > 0.0 && projected.height > 0.0);
        assert!(projected.right() <= 800.0 && projected.bottom() <= 600.0);

        let rec = projected.yolo(0);
        for v in [rec.cx, rec.cy, rec.w, rec.h] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

#[test]
fn yolo_normalization_from_pixels() {
    let rec = YoloRecord::from_pixel_rect(2, [100.0, 50.0, 200.0, 150.0], &Viewport::new(1000, 800));

    assert_relative_eq!(rec.cx, 0.2, epsilon = 1.0e-4);
    assert_relative_eq!(rec.cy, 0.15625, epsilon = 1.0e-4);
    assert_relative_eq!(rec.w, 0.2, epsilon = 1.0e-4);
    assert_relative_eq!(rec.h, 0.1875, epsilon = 1.0e-4);
    assert_eq!(format!("{}", rec), "2 0.200000 0.156250 0.200000 0.187500");
}

#[test]
fn yolo_from_ndc_matches_yolo_from_pixels() {
    let viewport = Viewport::new(1000, 800);
    let camera = camera(&viewport);
    let aabb = Aabb::new(Point::new(-2.0, -1.0, -1.0), Point::new(1.0, 2.5, 0.5));
    let projected = project_aabb(&aabb, &camera, &viewport, "box").unwrap();

    let from_ndc = projected.yolo(0);
    let from_pixels = YoloRecord::from_pixel_rect(
        0,
        [projected.left, projected.top, projected.width, projected.height],
        &viewport,
    );

    assert_relative_eq!(from_ndc.cx, from_pixels.cx, epsilon = 1.0e-4);
    assert_relative_eq!(from_ndc.cy, from_pixels.cy, epsilon = 1.0e-4);
    assert_relative_eq!(from_ndc.w, from_pixels.w, epsilon = 1.0e-4);
    assert_relative_eq!(from_ndc.h, from_pixels.h, epsilon = 1.0e-4);
}

#[test]
fn higher_boxes_are_drawn_higher() {
    let viewport = Viewport::new(640, 480);
    let camera = camera(&viewport);
    let low = Aabb::from_half_extents(Point::new(0.0, -2.0, 0.0), Vector::repeat(0.5));
    let high = Aabb::from_half_extents(Point::new(0.0, 2.0, 0.0), Vector::repeat(0.5));

    let low = project_aabb(&low, &camera, &viewport, "").unwrap();
    let high = project_aabb(&high, &camera, &viewport, "").unwrap();

    // Image rows grow downward.
    assert!(high.bottom() < low.top);
}

#[test]
fn session_boxes_are_labeled_by_fragment() {
    let mut session = ShatterSession::new(
        cube(),
        ShatterConfig {
            fragment_count: 4,
            ..ShatterConfig::default()
        },
    );
    let count = session.shatter(&mut IsaacRng::seed_from_u64(8)).len();
    let viewport = Viewport::new(320, 240);
    let camera = OrbitCamera::default().to_camera(viewport.aspect());

    let boxes = session.boxes(&camera, &viewport, 0.0, 0.0);
    assert_eq!(boxes.len(), count);

    for (i, b) in boxes.iter().enumerate() {
        assert_eq!(b.label, format!("fragment_{}", i));
    }
}
