//! Lighting component for ECS
//!
//! Pure data component; the graphics system reads it when building a frame.

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Types of lights supported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Directional light (like sunlight) with parallel rays
    Directional,
    /// Point light that radiates in all directions from a position
    Point,
}

/// Pure data component for lights
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// The type of light
    pub light_type: LightType,
    /// RGB color values (0.0 to 1.0 range)
    pub color: Vec3,
    /// Light intensity multiplier
    pub intensity: f32,
    /// Direction for directional lights in world space
    pub direction: Vec3,
    /// Range for point lights
    pub range: f32,
    /// Whether the light is currently enabled
    pub enabled: bool,
    /// Whether this light should cast shadows
    pub cast_shadows: bool,
}

impl Component for LightComponent {}

impl Default for LightComponent {
    /// White directional light angled down into the scene
    fn default() -> Self {
        LightFactory::directional(Vec3::new(-0.5, -1.0, -0.3), Vec3::new(1.0, 1.0, 1.0), 1.0)
    }
}

/// Factory functions for creating light components
pub struct LightFactory;

impl LightFactory {
    /// Create directional light component with world-space direction
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Directional,
            color,
            intensity,
            direction: direction.normalize(),
            range: 0.0,
            enabled: true,
            cast_shadows: true,
        }
    }

    /// Create point light component; position comes from the entity transform
    pub fn point(color: Vec3, intensity: f32, range: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Point,
            color,
            intensity,
            direction: Vec3::new(0.0, -1.0, 0.0),
            range,
            enabled: true,
            cast_shadows: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_light_is_directional_and_normalized() {
        let light = LightComponent::default();

        assert_eq!(light.light_type, LightType::Directional);
        assert!(light.enabled);
        assert_relative_eq!(light.direction.norm(), 1.0, epsilon = 1e-6);
    }
}
