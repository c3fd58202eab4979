//! Double-buffered typed message bus.
//!
//! Systems write into the active buffer during frame N; at the frame
//! boundary [`EventQueue::swap`] exchanges read/write buffers, so consumer
//! systems drain frame N's messages at the start of frame N+1. This gives
//! 1-frame latency by construction — no reentrancy, no mid-frame ordering
//! ambiguity.

use std::any::Any;

use crate::ecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Gameplay,
    Input,
    Ui,
    System,
}

/// A typed event payload. Consumers downcast via [`Event::payload`].
pub struct Event {
    pub domain: Domain,
    payload: Box<dyn Any + Send>,
}

impl Event {
    pub fn new<T: Any + Send>(domain: Domain, payload: T) -> Self {
        Self {
            domain,
            payload: Box::new(payload),
        }
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Noise {
    pub location: (f32, f32),
    pub strength: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    pub location: (f32, f32),
    pub radius: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
}

/// Double-buffered message bus with domain routing.
pub struct EventQueue {
    write_buf: Vec<Event>,
    read_buf: Vec<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            write_buf: Vec::new(),
            read_buf: Vec::new(),
        }
    }

    /// Appends to the write buffer. Visible to [`Self::read`] only after the
    /// next [`Self::swap`].
    pub fn emit(&mut self, event: Event) {
        self.write_buf.push(event);
    }

    pub fn emit_typed<T: Any + Send>(&mut self, domain: Domain, payload: T) {
        self.emit(Event::new(domain, payload));
    }

    /// Every event available for draining this frame (written last frame).
    pub fn read(&self) -> &[Event] {
        &self.read_buf
    }

    pub fn read_domain(&self, domain: Domain) -> impl Iterator<Item = &Event> {
        self.read_buf.iter().filter(move |e| e.domain == domain)
    }

    /// Frame-boundary exchange: last frame's write buffer becomes this
    /// frame's read buffer, and the old read buffer (already drained) is
    /// cleared and reused as the new write buffer.
    pub fn swap(&mut self) {
        self.read_buf.clear();
        std::mem::swap(&mut self.read_buf, &mut self.write_buf);
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Swaps the shared queue at the start of every tick, so systems scheduled
/// after [`crate::ecs::system::SystemStage::EventConsume`] read what was
/// emitted last frame. Registered once per [`crate::ecs::World`]; holds no
/// state of its own beyond the shared handle.
pub struct EventConsumeSystem {
    queue: std::rc::Rc<std::cell::RefCell<EventQueue>>,
}

impl EventConsumeSystem {
    pub fn new(queue: std::rc::Rc<std::cell::RefCell<EventQueue>>) -> Self {
        Self { queue }
    }
}

impl crate::ecs::system::System for EventConsumeSystem {
    fn name(&self) -> &str {
        "EventConsume"
    }

    fn process(&mut self, _world: &mut crate::ecs::World, _dt: f32) {
        self.queue.borrow_mut().swap();
    }
}
