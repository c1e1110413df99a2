//! Round-robin camera selection

use crate::scene::{NodeId, SceneError, SceneGraphVisitor, SceneNode, SceneResult};

/// Collects cameras and hands them out round-robin
#[derive(Debug, Default, Clone)]
pub struct CameraSelector {
    cameras: Vec<NodeId>,
    current: usize,
}

impl CameraSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected cameras in traversal order
    pub fn cameras(&self) -> &[NodeId] {
        &self.cameras
    }

    /// Camera at the cursor
    ///
    /// # Errors
    /// [`SceneError::CameraNotFound`] when no camera was collected.
    pub fn current_camera(&self) -> SceneResult<NodeId> {
        self.cameras.get(self.current).copied().ok_or(SceneError::CameraNotFound)
    }

    /// Camera at the cursor, then advance the cursor with wrap-around
    ///
    /// # Errors
    /// [`SceneError::CameraNotFound`] when no camera was collected.
    pub fn next_camera(&mut self) -> SceneResult<NodeId> {
        let camera = self.current_camera()?;
        self.current = (self.current + 1) % self.cameras.len();
        Ok(camera)
    }

    /// Move the cursor back to the first camera
    pub fn reset_current_camera(&mut self) {
        self.current = 0;
    }
}

impl SceneGraphVisitor for CameraSelector {
    fn visit_down(&mut self, id: NodeId, node: &SceneNode) {
        if node.as_camera().is_some() {
            self.cameras.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Actor, Camera, SceneGraph};

    fn selector_with(count: usize) -> (CameraSelector, Vec<NodeId>) {
        let mut graph = SceneGraph::new("scene");
        graph.add_node(Actor::with_id("not a camera"));
        let ids = (0..count)
            .map(|i| {
                let camera =
                    Camera::with_id(format!("cam{i}"), 1.0, 1.0, 0.1, 10.0).expect("camera");
                graph.add_node(camera)
            })
            .collect();
        let mut selector = CameraSelector::new();
        graph.accept_down(&mut selector);
        (selector, ids)
    }

    #[test]
    fn test_round_robin_wraps() {
        let (mut selector, ids) = selector_with(3);
        let picked: Vec<NodeId> = (0..4).map(|_| selector.next_camera().expect("camera")).collect();
        assert_eq!(picked, vec![ids[0], ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_current_does_not_advance() {
        let (mut selector, ids) = selector_with(2);
        assert_eq!(selector.current_camera(), Ok(ids[0]));
        assert_eq!(selector.current_camera(), Ok(ids[0]));
        selector.next_camera().expect("camera");
        assert_eq!(selector.current_camera(), Ok(ids[1]));
        selector.reset_current_camera();
        assert_eq!(selector.current_camera(), Ok(ids[0]));
    }

    #[test]
    fn test_empty_selector_fails() {
        let (mut selector, _) = selector_with(0);
        assert_eq!(selector.current_camera(), Err(SceneError::CameraNotFound));
        assert_eq!(selector.next_camera(), Err(SceneError::CameraNotFound));
        assert_eq!(SceneError::CameraNotFound.to_string(), "Camera is not found");
    }
}
