use super::World;

/// The fixed, load-bearing system order.
///
/// Registration order is *not* the execution order: every system declares
/// which stage it belongs to, and [`World::process_systems`] always walks
/// stages in this sequence regardless of the order `register_system` was
/// called in. This is what the design notes mean by "out-of-order
/// registration must not silently produce wrong results" — there is no
/// "out of order" to silently get wrong.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SystemStage {
    EventConsume,
    Input,
    AiStimuli,
    AiPerception,
    AiStateTransition,
    BehaviorTree,
    AiMotion,
    Physics,
    Collision,
    Trigger,
    Movement,
    PlayerControl,
    Camera,
    GridDebug,
    RenderWorld,
    RenderUi,
}

/// Canonical execution order. See the system-ordering table in the engine
/// design notes: intents flow into motion, positions stabilize before
/// rendering samples them.
pub const STAGE_ORDER: [SystemStage; 16] = [
    SystemStage::EventConsume,
    SystemStage::Input,
    SystemStage::AiStimuli,
    SystemStage::AiPerception,
    SystemStage::AiStateTransition,
    SystemStage::BehaviorTree,
    SystemStage::AiMotion,
    SystemStage::Physics,
    SystemStage::Collision,
    SystemStage::Trigger,
    SystemStage::Movement,
    SystemStage::PlayerControl,
    SystemStage::Camera,
    SystemStage::GridDebug,
    SystemStage::RenderWorld,
    SystemStage::RenderUi,
];

/// A unit of per-frame logic that operates on entities matching a required
/// [`super::Signature`].
///
/// Systems never hold their own copy of component data between frames —
/// cross-system communication goes through intent components read back out
/// of `world`, preserving a single write-owner per component family.
pub trait System: 'static {
    /// Human-readable name, used in log messages when a system is skipped
    /// or errors.
    fn name(&self) -> &str;

    /// Run one tick of this system against `world`.
    fn process(&mut self, world: &mut World, dt: f32);
}

pub(super) struct RegisteredSystem {
    pub stage: SystemStage,
    pub system: Box<dyn System>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_has_no_duplicates_and_covers_every_variant() {
        let mut seen = std::collections::HashSet::new();
        for stage in STAGE_ORDER {
            assert!(seen.insert(stage), "duplicate stage in STAGE_ORDER: {stage:?}");
        }
        assert_eq!(seen.len(), STAGE_ORDER.len());
    }
}
