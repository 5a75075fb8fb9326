//! Frame stage ordering
//!
//! The per-frame pipeline is one declarative list. Each stage names the
//! stages that must run before it, and a schedule is rejected if it breaks
//! one of those constraints.

use thiserror::Error;

/// One subsystem step of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStage {
    /// Input and camera movement
    Control,
    /// Ray collider resolution
    Collision,
    /// Blend-shape easing
    Animation,
    /// User scripts
    Scripting,
    /// Draw list construction
    Rendering,
    /// Particle simulation
    Particles,
    /// Screen labels
    Gui,
    /// Debug overlay
    Debug,
}

impl FrameStage {
    /// Stages that must already have run this frame, when present in the schedule
    pub fn must_follow(self) -> &'static [FrameStage] {
        use FrameStage::*;
        match self {
            Control | Particles => &[],
            Collision | Animation => &[Control],
            Scripting => &[Collision, Animation],
            Rendering => &[Control, Collision, Animation, Scripting],
            Gui => &[Rendering],
            Debug => &[Rendering, Particles],
        }
    }
}

/// Rejected schedule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A stage appears twice
    #[error("Stage {0:?} is scheduled more than once")]
    Duplicate(FrameStage),

    /// A stage runs before one it depends on
    #[error("Stage {stage:?} is scheduled before {required:?}")]
    OutOfOrder {
        /// Stage that runs too early
        stage: FrameStage,
        /// Stage it must follow
        required: FrameStage,
    },
}

/// Ordered list of stages run every frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSchedule {
    stages: Vec<FrameStage>,
}

impl FrameSchedule {
    /// control → collision → animation → scripting → rendering → particles → gui → debug
    pub fn standard() -> Self {
        use FrameStage::*;
        Self {
            stages: vec![Control, Collision, Animation, Scripting, Rendering, Particles, Gui, Debug],
        }
    }

    /// Custom ordering, validated
    pub fn from_stages(stages: Vec<FrameStage>) -> Result<Self, ScheduleError> {
        let schedule = Self { stages };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check for repeats and broken predecessor constraints
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (position, &stage) in self.stages.iter().enumerate() {
            if self.stages[..position].contains(&stage) {
                return Err(ScheduleError::Duplicate(stage));
            }
            for &required in stage.must_follow() {
                if self.stages[position + 1..].contains(&required) {
                    return Err(ScheduleError::OutOfOrder { stage, required });
                }
            }
        }
        Ok(())
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[FrameStage] {
        &self.stages
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the schedule runs nothing
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for FrameSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FrameStage::*;

    #[test]
    fn test_standard_schedule_is_valid() {
        let schedule = FrameSchedule::standard();
        assert_eq!(schedule.validate(), Ok(()));
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule.stages()[0], Control);
        assert_eq!(schedule.stages()[7], Debug);
    }

    #[test]
    fn test_collision_before_control_is_rejected() {
        let err = FrameSchedule::from_stages(vec![Collision, Control]).unwrap_err();
        assert_eq!(err, ScheduleError::OutOfOrder { stage: Collision, required: Control });
    }

    #[test]
    fn test_debug_before_rendering_is_rejected() {
        let err = FrameSchedule::from_stages(vec![Control, Debug, Rendering]).unwrap_err();
        assert_eq!(err, ScheduleError::OutOfOrder { stage: Debug, required: Rendering });
    }

    #[test]
    fn test_duplicate_stage_is_rejected() {
        let err = FrameSchedule::from_stages(vec![Control, Gui, Control]).unwrap_err();
        assert_eq!(err, ScheduleError::Duplicate(Control));
    }

    #[test]
    fn test_partial_schedule_only_orders_present_stages() {
        assert!(FrameSchedule::from_stages(vec![Rendering, Gui]).is_ok());
    }
}
