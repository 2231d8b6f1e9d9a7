//! The five scenes and the engine each one hosts.

use crate::timeline::TimelineSnapshot;
use crate::viz::{
    ConvergingOrbit, FlowPipeline, GravityDrop, SpringNetwork, Visualization, WaveField,
    WaveVariant,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneId {
    MessyToday,
    WorkingSession,
    Prototype,
    Decision,
    Cta,
}

impl SceneId {
    pub const ALL: [SceneId; 5] = [
        SceneId::MessyToday,
        SceneId::WorkingSession,
        SceneId::Prototype,
        SceneId::Decision,
        SceneId::Cta,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            SceneId::MessyToday => "Messy today",
            SceneId::WorkingSession => "Working session",
            SceneId::Prototype => "Prototype",
            SceneId::Decision => "Decision",
            SceneId::Cta => "Get started",
        }
    }

    pub fn visualization(self) -> VisualizationKind {
        match self {
            SceneId::MessyToday => VisualizationKind::Waves(WaveVariant::Chaos),
            SceneId::WorkingSession => VisualizationKind::Network,
            SceneId::Prototype => VisualizationKind::Pipeline,
            SceneId::Decision => VisualizationKind::Gravity,
            SceneId::Cta => VisualizationKind::Converging,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualizationKind {
    Waves(WaveVariant),
    Network,
    Pipeline,
    Gravity,
    Converging,
}

impl VisualizationKind {
    pub fn build(self) -> Box<dyn Visualization> {
        match self {
            VisualizationKind::Waves(variant) => Box::new(WaveField::new(variant)),
            VisualizationKind::Network => Box::new(SpringNetwork::new()),
            VisualizationKind::Pipeline => Box::new(FlowPipeline::new()),
            VisualizationKind::Gravity => Box::new(GravityDrop::new()),
            VisualizationKind::Converging => Box::new(ConvergingOrbit::new()),
        }
    }
}

/// What one scene container receives after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneSignals {
    pub is_active: bool,
    pub show_drop: bool,
}

/// Signals for every scene, all derived from the same snapshot.
pub fn scene_signals(snapshot: &TimelineSnapshot) -> [SceneSignals; 5] {
    let mut signals = [SceneSignals::default(); 5];
    for scene in SceneId::ALL {
        let is_active = snapshot.scene == scene.index();
        signals[scene.index()] = SceneSignals {
            is_active,
            show_drop: scene == SceneId::Decision && snapshot.show_drop,
        };
    }
    signals
}
