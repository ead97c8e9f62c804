use anyhow::Result;
use glam::Vec3;

use orrery_engine::driver::SceneCycle;
use orrery_engine::render::Renderer;
use orrery_engine::scene::{Color, ContainerValues, Geometry, Grid, Node, NodeId, Scene, TorusKnot, Transform};
use orrery_engine::viewport::{PerspectiveCamera, ViewportManager, ViewportSource};

/// Name of the animated container, shared with the timeline object.
pub const CONTAINER: &str = "Camera Container";

/// Scene, camera and renderer for one window.
pub struct Stage<R> {
    scene: Scene,
    container: NodeId,
    viewport: ViewportManager,
    renderer: R,
}

impl<R: Renderer> Stage<R> {
    /// Grid floor plus a torus knot held 50 units ahead inside the container.
    pub fn new(renderer: R) -> Self {
        let mut scene = Scene::new();
        scene.background = Color::from_hex(0x05060c);

        scene.add(None, Node::with_geometry("Grid", Geometry::Grid(Grid::new(1000.0, 100))));
        let container = scene.add(None, Node::group(CONTAINER));
        scene.add(
            Some(container),
            Node::with_geometry("Knot", Geometry::TorusKnot(TorusKnot::new(5.0, 1.0, 100, 16)))
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -50.0))),
        );

        let camera = PerspectiveCamera::new(60.0, 1.0, 1.0, 1000.0)
            .with_position(Vec3::new(0.0, 6.0, 0.0));

        Self {
            scene,
            container,
            viewport: ViewportManager::new(camera),
            renderer,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.viewport.camera()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn container_transform(&self) -> Option<&Transform> {
        self.scene.node(self.container).map(|n| &n.transform)
    }

    pub fn apply_container(&mut self, values: &ContainerValues) {
        if let Some(node) = self.scene.node_mut(self.container) {
            values.apply_to(&mut node.transform);
        }
    }

    /// Follows the host viewport. Returns whether anything changed.
    pub fn resize(&mut self, source: &dyn ViewportSource) -> Result<bool> {
        self.viewport.on_resize(source, &mut self.renderer)
    }
}

impl<R: Renderer> SceneCycle for Stage<R> {
    fn draw(&mut self) -> Result<()> {
        self.renderer.render(&self.scene, self.viewport.camera())
    }
}
