//! Blend shape weights
//!
//! One weight per morph target, addressed by name. The animation system eases
//! each weight toward its target.

use crate::ecs::Component;

/// Named morph-target weights
#[derive(Debug, Clone, PartialEq)]
pub struct BlendShapesComponent {
    /// Morph target names in geometry order
    pub names: Vec<String>,
    /// Current weights
    pub weights: Vec<f32>,
    /// Weights the animation system is easing toward
    pub targets: Vec<f32>,
    /// Maximum weight change per second
    pub blend_speed: f32,
}

impl Component for BlendShapesComponent {}

impl Default for BlendShapesComponent {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            weights: Vec::new(),
            targets: Vec::new(),
            blend_speed: 2.0,
        }
    }
}

impl BlendShapesComponent {
    /// Register a shape at weight zero
    pub fn add_shape(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
        self.weights.push(0.0);
        self.targets.push(0.0);
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Current weight of a named shape
    pub fn weight(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.weights[i])
    }

    /// Ease a named shape toward `weight`; returns false for unknown names
    pub fn set_target(&mut self, name: &str, weight: f32) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.targets[i] = weight.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Snap a named shape to `weight` immediately
    pub fn set_weight(&mut self, name: &str, weight: f32) -> bool {
        match self.index_of(name) {
            Some(i) => {
                let weight = weight.clamp(0.0, 1.0);
                self.weights[i] = weight;
                self.targets[i] = weight;
                true
            }
            None => false,
        }
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no shapes are registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_shapes_start_at_zero() {
        let mut shapes = BlendShapesComponent::default();
        shapes.add_shape("happy");
        shapes.add_shape("angry");

        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes.weight("happy"), Some(0.0));
        assert_eq!(shapes.weight("sad"), None);
    }

    #[test]
    fn test_targets_are_clamped() {
        let mut shapes = BlendShapesComponent::default();
        shapes.add_shape("happy");

        assert!(shapes.set_target("happy", 3.0));
        assert_eq!(shapes.targets[0], 1.0);
        assert!(!shapes.set_target("missing", 0.5));
    }
}
