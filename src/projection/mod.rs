//! Cameras and the projection of world-space boxes to image-space annotations.

pub use self::camera::{Camera, CameraJitter, OrbitCamera, Viewport};
pub use self::projected_box::{
    label_text, project_aabb, project_fragments, NdcRect, ProjectedBox, YoloRecord,
};

mod camera;
mod projected_box;
