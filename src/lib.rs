pub mod ai;
pub mod assets;
pub mod audio;
pub mod camera;
pub mod config;
pub mod content;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod pathfinding;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod window;
