use skirmish_engine::ecs::signature::Signature;
use skirmish_engine::ecs::system::{System, SystemStage};
use skirmish_engine::ecs::World;

#[derive(Debug, PartialEq, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, PartialEq)]
struct Health(i32);

#[derive(Debug, PartialEq)]
struct Name(String);

// -- spawn / despawn / generational safety ------------------------------

#[test]
fn spawn_returns_unique_entities() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    assert_ne!(a, b);
}

#[test]
fn despawn_marks_entity_dead() {
    let mut world = World::new();
    let e = world.spawn();
    assert!(world.is_alive(e));
    assert!(world.despawn(e));
    assert!(!world.is_alive(e));
}

#[test]
fn despawn_dead_entity_returns_false() {
    let mut world = World::new();
    let e = world.spawn();
    world.despawn(e);
    assert!(!world.despawn(e));
}

#[test]
fn generation_prevents_stale_access() {
    let mut world = World::new();
    let old = world.spawn();
    world.add_component(old, Health(100)).unwrap();
    world.despawn(old);

    let new = world.spawn();
    assert_eq!(old.id(), new.id()); // recycled slot
    assert_ne!(old.generation(), new.generation());

    assert!(!world.is_alive(old));
    assert!(world.get_component::<Health>(old).is_none());
}

// -- add_component / get_component / remove_component --------------------

#[test]
fn add_and_get_component() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
    assert_eq!(world.get_component::<Position>(e), Some(&Position { x: 1.0, y: 2.0 }));
}

#[test]
fn add_component_overwrites_existing() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Health(100)).unwrap();
    world.add_component(e, Health(50)).unwrap();
    assert_eq!(world.get_component::<Health>(e), Some(&Health(50)));
}

#[test]
fn get_component_mut_modifies_in_place() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Health(100)).unwrap();
    world.get_component_mut::<Health>(e).unwrap().0 -= 30;
    assert_eq!(world.get_component::<Health>(e), Some(&Health(70)));
}

#[test]
fn remove_component_returns_it() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Health(42)).unwrap();
    assert_eq!(world.remove_component::<Health>(e), Some(Health(42)));
    assert!(world.get_component::<Health>(e).is_none());
}

#[test]
fn remove_component_missing_returns_none() {
    let mut world = World::new();
    let e = world.spawn();
    assert!(world.remove_component::<Health>(e).is_none());
}

#[test]
fn add_component_on_dead_entity_is_rejected() {
    let mut world = World::new();
    let e = world.spawn();
    world.despawn(e);
    assert!(world.add_component(e, Health(1)).is_err());
}

#[test]
fn despawn_cleans_up_all_components() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add_component(e, Health(100)).unwrap();
    world.despawn(e);

    let new = world.spawn();
    assert!(world.get_component::<Position>(new).is_none());
    assert!(world.get_component::<Health>(new).is_none());
}

// -- query iteration -------------------------------------------------------

#[test]
fn query_iterates_all_components() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    world.add_component(a, Health(10)).unwrap();
    world.add_component(b, Health(20)).unwrap();

    let mut results: Vec<_> = world.query::<Health>().collect();
    results.sort_by_key(|(e, _)| e.id());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], (a, &Health(10)));
    assert_eq!(results[1], (b, &Health(20)));
}

#[test]
fn query_mut_modifies_components() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    world.add_component(a, Health(10)).unwrap();
    world.add_component(b, Health(20)).unwrap();

    for (_, hp) in world.query_mut::<Health>() {
        hp.0 *= 2;
    }

    assert_eq!(world.get_component::<Health>(a), Some(&Health(20)));
    assert_eq!(world.get_component::<Health>(b), Some(&Health(40)));
}

#[test]
fn query_empty_world() {
    let world = World::new();
    assert_eq!(world.query::<Health>().count(), 0);
}

// -- has_component ----------------------------------------------------------

#[test]
fn has_component_true_for_present_component() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Health(1)).unwrap();
    assert!(world.has_component::<Health>(e));
}

#[test]
fn has_component_false_for_missing_component() {
    let mut world = World::new();
    let e = world.spawn();
    assert!(!world.has_component::<Health>(e));
}

#[test]
fn has_component_false_for_dead_entity() {
    let mut world = World::new();
    let e = world.spawn();
    world.add_component(e, Health(1)).unwrap();
    world.despawn(e);
    assert!(!world.has_component::<Health>(e));
}

#[test]
fn remove_missing_type_leaves_no_trace() {
    let mut world = World::new();
    let e = world.spawn();
    world.remove_component::<Name>(e);
    assert_eq!(world.query::<Name>().count(), 0);
    assert!(!world.has_component::<Name>(e));
}

// -- multi-component matching via Signature / entities_matching -----------

#[test]
fn entities_matching_requires_every_bit() {
    let mut world = World::new();

    let player = world.spawn();
    world.add_component(player, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add_component(player, Health(100)).unwrap();

    let tree = world.spawn();
    world.add_component(tree, Position { x: 5.0, y: 5.0 }).unwrap();
    // tree has no Health

    let pos_bit = world.component_bit::<Position>();
    let hp_bit = world.component_bit::<Health>();
    let mut required = Signature::EMPTY;
    required.set(pos_bit);
    required.set(hp_bit);

    let matches = world.entities_matching(required);
    assert_eq!(matches, vec![player]);
}

#[test]
fn entities_matching_three_components() {
    let mut world = World::new();

    let full = world.spawn();
    world.add_component(full, Position { x: 1.0, y: 2.0 }).unwrap();
    world.add_component(full, Health(50)).unwrap();
    world.add_component(full, Name("Hero".into())).unwrap();

    let partial = world.spawn();
    world.add_component(partial, Position { x: 3.0, y: 4.0 }).unwrap();
    world.add_component(partial, Health(25)).unwrap();
    // no Name

    let mut required = Signature::EMPTY;
    required.set(world.component_bit::<Position>());
    required.set(world.component_bit::<Health>());
    required.set(world.component_bit::<Name>());

    assert_eq!(world.entities_matching(required), vec![full]);
}

#[test]
fn entities_matching_empty_signature_returns_every_alive_entity() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    let c = world.spawn();
    world.despawn(c);

    let mut matches = world.entities_matching(Signature::EMPTY);
    matches.sort_by_key(|e| e.id());
    let mut expected = vec![a, b];
    expected.sort_by_key(|e| e.id());
    assert_eq!(matches, expected);
}

// -- system registration / stage ordering ----------------------------------

struct RecordingSystem {
    label: &'static str,
    log: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
}

impl System for RecordingSystem {
    fn name(&self) -> &str {
        self.label
    }

    fn process(&mut self, _world: &mut World, _dt: f32) {
        self.log.borrow_mut().push(self.label);
    }
}

#[test]
fn process_systems_runs_in_stage_order_not_registration_order() {
    let mut world = World::new();
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

    // Registered out of stage order on purpose.
    world.register_system(
        SystemStage::RenderWorld,
        Box::new(RecordingSystem { label: "render", log: log.clone() }),
    );
    world.register_system(
        SystemStage::Camera,
        Box::new(RecordingSystem { label: "camera", log: log.clone() }),
    );
    world.register_system(
        SystemStage::EventConsume,
        Box::new(RecordingSystem { label: "event_consume", log: log.clone() }),
    );

    world.process_systems(1.0 / 60.0);

    assert_eq!(*log.borrow(), vec!["event_consume", "camera", "render"]);
}

#[test]
fn component_bit_is_stable_across_calls() {
    let mut world = World::new();
    let first = world.component_bit::<Health>();
    let second = world.component_bit::<Health>();
    assert_eq!(first, second);
}
