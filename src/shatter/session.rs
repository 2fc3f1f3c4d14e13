use super::{build_fragments, partition, Fragment, PosePlanner, ShatterConfig};
use crate::math::{Isometry, Real};
use crate::projection::{project_fragments, Camera, ProjectedBox, Viewport};
use crate::shape::{GeometryLedger, TriangleSoup};
use rand::Rng;

/// Runs a full shatter of `mesh`: partition, fragment construction, and pose planning.
///
/// The geometry of every returned fragment is registered in `ledger`.
pub fn shatter<R: Rng + ?Sized>(
    mesh: &TriangleSoup,
    config: &ShatterConfig,
    ledger: &GeometryLedger,
    rng: &mut R,
) -> Vec<Fragment> {
    let buckets = partition(mesh, config.fragment_count, rng);
    let mut fragments = build_fragments(&buckets, mesh, config, ledger, rng);
    PosePlanner::from_config(config).plan_all(&mut fragments, rng);

    log::debug!(
        "Shattered {} triangles into {} fragments ({} seeds).",
        mesh.len(),
        fragments.len(),
        buckets.len()
    );

    fragments
}

/// The active fragment set of an interactive scene.
///
/// The set is only ever replaced as a whole: readers see either the previous shatter or
/// the next one, never a mix.
#[derive(Debug)]
pub struct ShatterSession {
    mesh: TriangleSoup,
    config: ShatterConfig,
    ledger: GeometryLedger,
    fragments: Vec<Fragment>,
}

impl ShatterSession {
    /// A session with no fragment yet.
    pub fn new(mesh: TriangleSoup, config: ShatterConfig) -> Self {
        Self::with_ledger(mesh, config, GeometryLedger::new())
    }

    /// A session registering its geometry in an existing ledger.
    pub fn with_ledger(mesh: TriangleSoup, config: ShatterConfig, ledger: GeometryLedger) -> Self {
        Self {
            mesh,
            config,
            ledger,
            fragments: Vec::new(),
        }
    }

    /// The mesh being shattered.
    pub fn mesh(&self) -> &TriangleSoup {
        &self.mesh
    }

    /// The configuration of the next shatters.
    pub fn config(&self) -> &ShatterConfig {
        &self.config
    }

    /// Replaces the configuration used by the next shatters.
    pub fn set_config(&mut self, config: ShatterConfig) {
        self.config = config;
    }

    /// The ledger tracking the geometry of this session.
    pub fn ledger(&self) -> &GeometryLedger {
        &self.ledger
    }

    /// The active fragments.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Discards the active fragments and shatters the mesh again.
    ///
    /// The geometry of the previous set is released before the new one is built.
    pub fn shatter<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Fragment] {
        self.reset();
        self.fragments = shatter(&self.mesh, &self.config, &self.ledger, rng);
        &self.fragments
    }

    /// Discards every fragment.
    pub fn reset(&mut self) {
        self.fragments.clear();
    }

    /// The rigid pose of every fragment, in fragment order.
    pub fn poses(&self, force: Real, rot_force: Real) -> Vec<Isometry<Real>> {
        self.fragments
            .iter()
            .map(|fragment| fragment.world_pose(force, rot_force))
            .collect()
    }

    /// The screen-space boxes of the visible fragments.
    pub fn boxes(
        &self,
        camera: &Camera,
        viewport: &Viewport,
        force: Real,
        rot_force: Real,
    ) -> Vec<ProjectedBox> {
        project_fragments(&self.fragments, force, rot_force, camera, viewport)
    }
}
