//! Sparse-set ECS world with signature-based system matching.
//!
//! Entity storage, insertion, removal and querying follow a plain
//! generational sparse-set design. Every entity also carries a
//! [`Signature`] bitset so that systems can declare a required signature
//! and be matched against "every entity whose signature is a superset",
//! per the scheduler design notes.

pub mod components;
pub mod signature;
pub mod system;

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
pub use signature::{ComponentRegistry, Signature};
pub use system::{System, SystemStage, STAGE_ORDER};
use system::RegisteredSystem;

// ---------------------------------------------------------------------------
// Entity — generational index
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u32,
    generation: u32,
}

impl Entity {
    pub fn id(self) -> u32 {
        self.id
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Hooks the content-editor UI uses to mirror world structure. Compiled out
/// entirely when the `editor-bridge` feature is disabled — the "no other
/// coupling" collaborator interface for that out-of-scope tool.
#[cfg(feature = "editor-bridge")]
pub trait EditorBridge {
    fn on_entity_created(&mut self, id: Entity);
    fn on_entity_destroyed(&mut self, id: Entity);
}

// ---------------------------------------------------------------------------
// ComponentStore — trait object interface for type-erased sparse sets
// ---------------------------------------------------------------------------

trait ComponentStore {
    fn remove_entity(&mut self, id: u32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// SparseSet<T> — per-component storage
// ---------------------------------------------------------------------------

struct SparseSet<T> {
    sparse: Vec<u32>,
    dense: Vec<u32>,
    data: Vec<T>,
}

const EMPTY: u32 = u32::MAX;

impl<T: 'static> SparseSet<T> {
    fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            data: Vec::new(),
        }
    }

    fn contains(&self, id: u32) -> bool {
        let idx = id as usize;
        idx < self.sparse.len() && self.sparse[idx] != EMPTY
    }

    fn insert(&mut self, id: u32, value: T) {
        let idx = id as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, EMPTY);
        }
        if self.sparse[idx] != EMPTY {
            let dense_idx = self.sparse[idx] as usize;
            self.data[dense_idx] = value;
        } else {
            self.sparse[idx] = self.dense.len() as u32;
            self.dense.push(id);
            self.data.push(value);
        }
    }

    fn remove(&mut self, id: u32) -> Option<T> {
        let idx = id as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        let dense_idx = self.sparse[idx] as usize;
        self.sparse[idx] = EMPTY;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            let moved_id = self.dense[last] as usize;
            self.sparse[moved_id] = dense_idx as u32;
        }
        self.dense.swap_remove(dense_idx);
        Some(self.data.swap_remove(dense_idx))
    }

    fn get(&self, id: u32) -> Option<&T> {
        let idx = id as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        Some(&self.data[self.sparse[idx] as usize])
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        let idx = id as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        Some(&mut self.data[self.sparse[idx] as usize])
    }

    fn iter(&self) -> SparseSetIter<'_, T> {
        SparseSetIter {
            dense: &self.dense,
            data: &self.data,
            index: 0,
        }
    }

    fn iter_mut(&mut self) -> SparseSetIterMut<'_, T> {
        SparseSetIterMut {
            dense: &self.dense,
            data: self.data.as_mut_ptr(),
            len: self.data.len(),
            index: 0,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: 'static> ComponentStore for SparseSet<T> {
    fn remove_entity(&mut self, id: u32) {
        self.remove(id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

struct SparseSetIter<'a, T> {
    dense: &'a [u32],
    data: &'a [T],
    index: usize,
}

impl<'a, T> Iterator for SparseSetIter<'a, T> {
    type Item = (u32, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.dense.len() {
            return None;
        }
        let i = self.index;
        self.index += 1;
        Some((self.dense[i], &self.data[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dense.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SparseSetIter<'_, T> {}

struct SparseSetIterMut<'a, T> {
    dense: &'a [u32],
    data: *mut T,
    len: usize,
    index: usize,
    _marker: std::marker::PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for SparseSetIterMut<'a, T> {
    type Item = (u32, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let i = self.index;
        self.index += 1;
        // SAFETY: each index in 0..len is visited exactly once and len
        // matches the backing Vec's length, so no alias is produced.
        let val = unsafe { &mut *self.data.add(i) };
        Some((self.dense[i], val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SparseSetIterMut<'_, T> {}

/// Iterator over `(Entity, &T)` pairs from a query.
pub struct QueryIter<'a, T> {
    inner: SparseSetIter<'a, T>,
    generations: &'a [u32],
}

impl<'a, T: 'static> Iterator for QueryIter<'a, T> {
    type Item = (Entity, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, data) = self.inner.next()?;
        let entity = Entity {
            id,
            generation: self.generations[id as usize],
        };
        Some((entity, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: 'static> ExactSizeIterator for QueryIter<'_, T> {}

/// Iterator over `(Entity, &mut T)` pairs from a query.
pub struct QueryIterMut<'a, T> {
    inner: SparseSetIterMut<'a, T>,
    generations: &'a [u32],
}

impl<'a, T: 'static> Iterator for QueryIterMut<'a, T> {
    type Item = (Entity, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, data) = self.inner.next()?;
        let entity = Entity {
            id,
            generation: self.generations[id as usize],
        };
        Some((entity, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: 'static> ExactSizeIterator for QueryIterMut<'_, T> {}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
    next_id: u32,
}

impl EntityAllocator {
    fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self) -> Entity {
        if let Some(id) = self.free.pop() {
            Entity {
                id,
                generation: self.generations[id as usize],
            }
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.generations.push(0);
            Entity { id, generation: 0 }
        }
    }

    fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.id as usize] += 1;
        self.free.push(entity.id);
        true
    }

    fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.id as usize;
        idx < self.generations.len() && self.generations[idx] == entity.generation
    }
}

// ---------------------------------------------------------------------------
// World — central container
// ---------------------------------------------------------------------------

/// Sparse-set ECS world.
///
/// Owns entity identity, per-component pools, each entity's [`Signature`],
/// and the ordered system registry. Components can be any `'static` type —
/// no derive macros or registration required beyond the first
/// `add_component`/`component_bit` call, which assigns that type's
/// signature bit.
pub struct World {
    allocator: EntityAllocator,
    stores: HashMap<TypeId, Box<dyn ComponentStore>>,
    registry: ComponentRegistry,
    /// Indexed by entity id; recycled slots are reset to `Signature::EMPTY`
    /// on despawn so a stale read never observes a reused id's new data.
    signatures: Vec<Signature>,
    systems: Vec<RegisteredSystem>,
    #[cfg(feature = "editor-bridge")]
    bridge: Option<Box<dyn EditorBridge>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            stores: HashMap::new(),
            registry: ComponentRegistry::new(),
            signatures: Vec::new(),
            systems: Vec::new(),
            #[cfg(feature = "editor-bridge")]
            bridge: None,
        }
    }

    #[cfg(feature = "editor-bridge")]
    pub fn set_editor_bridge(&mut self, bridge: Box<dyn EditorBridge>) {
        self.bridge = Some(bridge);
    }

    // -- Entity lifecycle ---------------------------------------------------

    /// `CreateEntity`: allocates a fresh id with an empty signature. Never
    /// fails — ids are recycled from a free list.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let idx = entity.id as usize;
        if idx >= self.signatures.len() {
            self.signatures.resize(idx + 1, Signature::EMPTY);
        } else {
            self.signatures[idx] = Signature::EMPTY;
        }
        #[cfg(feature = "editor-bridge")]
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.on_entity_created(entity);
        }
        entity
    }

    /// `DestroyEntity`: removes all components, recycles the id, notifies
    /// the editor bridge. Idempotent — returns `false` on an already-dead
    /// or never-allocated id.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.allocator.deallocate(entity) {
            return false;
        }
        for store in self.stores.values_mut() {
            store.remove_entity(entity.id);
        }
        self.signatures[entity.id as usize] = Signature::EMPTY;
        #[cfg(feature = "editor-bridge")]
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.on_entity_destroyed(entity);
        }
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    pub fn signature_of(&self, entity: Entity) -> Signature {
        if !self.is_alive(entity) {
            return Signature::EMPTY;
        }
        self.signatures[entity.id as usize]
    }

    // -- Components ---------------------------------------------------------

    /// `AddComponent<T>`: inserts into pool `T`, sets `T`'s bit in the
    /// entity's signature, and overwrites any existing value. Fails with
    /// [`EngineError::InvalidEntity`] on a dead id — the one structural
    /// operation that errors rather than silently no-op'ing, since a
    /// silently dropped write would hide content bugs that should surface
    /// during load.
    pub fn add_component<T: 'static>(&mut self, entity: Entity, component: T) -> EngineResult<()> {
        if !self.is_alive(entity) {
            return Err(EngineError::InvalidEntity(entity));
        }
        let bit = self.registry.bit_of::<T>();
        self.storage_mut::<T>().insert(entity.id, component);
        self.signatures[entity.id as usize].set(bit);
        Ok(())
    }

    /// `RemoveComponent<T>`: no-op if absent or the entity is dead.
    pub fn remove_component<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        let removed = self.storage_mut::<T>().remove(entity.id);
        if removed.is_some() {
            let bit = self.registry.bit_of::<T>();
            self.signatures[entity.id as usize].clear(bit);
        }
        removed
    }

    pub fn get_component<T: 'static>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity.id)
    }

    pub fn get_component_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>().get_mut(entity.id)
    }

    pub fn has_component<T: 'static>(&self, entity: Entity) -> bool {
        self.is_alive(entity)
            && self
                .storage::<T>()
                .map(|s| s.contains(entity.id))
                .unwrap_or(false)
    }

    // -- Queries ------------------------------------------------------------

    pub fn query<T: 'static>(&self) -> QueryIter<'_, T> {
        match self.storage::<T>() {
            Some(set) => QueryIter {
                inner: set.iter(),
                generations: &self.allocator.generations,
            },
            None => QueryIter {
                inner: SparseSetIter {
                    dense: &[],
                    data: &[],
                    index: 0,
                },
                generations: &self.allocator.generations,
            },
        }
    }

    pub fn query_mut<T: 'static>(&mut self) -> QueryIterMut<'_, T> {
        let generations = &self.allocator.generations;
        let set = self
            .stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.as_any_mut().downcast_mut::<SparseSet<T>>());

        match set {
            Some(s) => QueryIterMut {
                inner: s.iter_mut(),
                generations,
            },
            None => QueryIterMut {
                inner: SparseSetIterMut {
                    dense: &[],
                    data: std::ptr::null_mut(),
                    len: 0,
                    index: 0,
                    _marker: std::marker::PhantomData,
                },
                generations,
            },
        }
    }

    /// Returns the signature bit assigned to `T`, registering it on first
    /// use. Lets systems build their required [`Signature`] without ever
    /// inserting a component of that type themselves.
    pub fn component_bit<T: 'static>(&mut self) -> usize {
        self.registry.bit_of::<T>()
    }

    /// Every living entity whose signature is a superset of `required`.
    /// O(N) over allocated entity slots — the design notes explicitly
    /// sanction a linear scan at engine scale; the interface allows a
    /// later archetype/index-backed implementation without changing call
    /// sites.
    pub fn entities_matching(&self, required: Signature) -> Vec<Entity> {
        let mut out = Vec::new();
        for (id, sig) in self.signatures.iter().enumerate() {
            if sig.is_superset_of(&required) {
                let entity = Entity {
                    id: id as u32,
                    generation: self.allocator.generations[id],
                };
                if self.allocator.is_alive(entity) {
                    out.push(entity);
                }
            }
        }
        out
    }

    // -- Systems --------------------------------------------------------------

    /// `RegisterSystem`: appends `system` to the stage's run list.
    /// Execution order always follows the canonical [`STAGE_ORDER`], never
    /// registration order — see [`system`]'s module docs.
    pub fn register_system(&mut self, stage: SystemStage, system: Box<dyn System>) {
        self.systems.push(RegisteredSystem { stage, system });
    }

    /// `ProcessSystems`: invokes every registered system's `process` in
    /// canonical stage order, passing this frame's `dt` in seconds.
    pub fn process_systems(&mut self, dt: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        for &stage in STAGE_ORDER.iter() {
            for registered in systems.iter_mut() {
                if registered.stage == stage {
                    registered.system.process(self, dt);
                }
            }
        }
        self.systems = systems;
    }

    /// `Reset`: destroys all entities and drops component pools, but keeps
    /// registered systems (and component-type bit assignments) so a freshly
    /// loaded scene's systems keep matching without re-registering.
    pub fn reset(&mut self) {
        self.allocator = EntityAllocator::new();
        self.stores.clear();
        self.signatures.clear();
    }

    // -- Internal helpers -----------------------------------------------------

    fn storage<T: 'static>(&self) -> Option<&SparseSet<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|b| b.as_any().downcast_ref::<SparseSet<T>>())
    }

    fn storage_mut<T: 'static>(&mut self) -> &mut SparseSet<T> {
        self.stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("type mismatch in component store")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Clone)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    #[derive(Debug, PartialEq)]
    struct Name(String);

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
        assert_eq!(old.id(), new.id());
        assert_ne!(old.generation(), new.generation());

        assert!(!world.is_alive(old));
        assert!(world.get_component::<Health>(old).is_none());
    }

    #[test]
    fn add_component_on_dead_entity_errors() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);
        assert!(matches!(
            world.add_component(e, Health(1)),
            Err(EngineError::InvalidEntity(_))
        ));
    }

    #[test]
    fn insert_overwrites_existing() {
        let mut world = World::new();
        let e = world.spawn();
        world.add_component(e, Health(100)).unwrap();
        world.add_component(e, Health(50)).unwrap();
        assert_eq!(world.get_component::<Health>(e), Some(&Health(50)));
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

    #[test]
    fn signature_tracks_add_and_remove() {
        let mut world = World::new();
        let e = world.spawn();
        let pos_bit = world.component_bit::<Position>();
        let hp_bit = world.component_bit::<Health>();

        assert!(!world.signature_of(e).has(pos_bit));
        world.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        assert!(world.signature_of(e).has(pos_bit));
        assert!(!world.signature_of(e).has(hp_bit));

        world.add_component(e, Health(10)).unwrap();
        assert!(world.signature_of(e).has(hp_bit));

        world.remove_component::<Health>(e);
        assert!(!world.signature_of(e).has(hp_bit));
        assert!(world.signature_of(e).has(pos_bit));
    }

    #[test]
    fn entities_matching_is_exact_subset_superset_relation() {
        let mut world = World::new();
        let mut required = Signature::EMPTY;
        required.set(world.component_bit::<Position>());
        required.set(world.component_bit::<Health>());

        let both = world.spawn();
        world.add_component(both, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(both, Health(1)).unwrap();

        let only_pos = world.spawn();
        world.add_component(only_pos, Position { x: 0.0, y: 0.0 }).unwrap();

        let neither = world.spawn();
        world.add_component(neither, Name("tree".into())).unwrap();

        let matched = world.entities_matching(required);
        assert_eq!(matched, vec![both]);
    }

    #[test]
    fn entities_matching_excludes_despawned_entities() {
        let mut world = World::new();
        let mut required = Signature::EMPTY;
        required.set(world.component_bit::<Health>());

        let e = world.spawn();
        world.add_component(e, Health(1)).unwrap();
        world.despawn(e);

        assert!(world.entities_matching(required).is_empty());
    }

    #[test]
    fn process_systems_runs_in_canonical_stage_order_regardless_of_registration_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recording {
            label: &'static str,
            log: Rc<RefCell<Vec<&'static str>>>,
        }
        impl System for Recording {
            fn name(&self) -> &str {
                self.label
            }
            fn process(&mut self, _world: &mut World, _dt: f32) {
                self.log.borrow_mut().push(self.label);
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();

        // Register a late stage before an early stage.
        world.register_system(
            SystemStage::RenderWorld,
            Box::new(Recording { label: "render", log: log.clone() }),
        );
        world.register_system(
            SystemStage::Input,
            Box::new(Recording { label: "input", log: log.clone() }),
        );
        world.register_system(
            SystemStage::AiMotion,
            Box::new(Recording { label: "ai_motion", log: log.clone() }),
        );

        world.process_systems(1.0 / 60.0);

        assert_eq!(*log.borrow(), vec!["input", "ai_motion", "render"]);
    }

    #[test]
    fn reset_destroys_entities_but_keeps_systems_registered() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct Counter(Rc<Cell<u32>>);
        impl System for Counter {
            fn name(&self) -> &str {
                "counter"
            }
            fn process(&mut self, _world: &mut World, _dt: f32) {
                self.0.set(self.0.get() + 1);
            }
        }

        let count = Rc::new(Cell::new(0));
        let mut world = World::new();
        let e = world.spawn();
        world.add_component(e, Health(5)).unwrap();
        world.register_system(SystemStage::Movement, Box::new(Counter(count.clone())));

        world.reset();
        assert!(!world.is_alive(e));

        world.process_systems(1.0 / 60.0);
        assert_eq!(count.get(), 1);
    }

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
    fn swap_remove_preserves_other_entries() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.add_component(a, Position { x: 1.0, y: 0.0 }).unwrap();
        world.add_component(b, Position { x: 2.0, y: 0.0 }).unwrap();
        world.add_component(c, Position { x: 3.0, y: 0.0 }).unwrap();

        world.remove_component::<Position>(b);

        assert_eq!(world.get_component::<Position>(a), Some(&Position { x: 1.0, y: 0.0 }));
        assert!(world.get_component::<Position>(b).is_none());
        assert_eq!(world.get_component::<Position>(c), Some(&Position { x: 3.0, y: 0.0 }));
        assert_eq!(world.query::<Position>().count(), 2);
    }
}
