pub mod camera;
pub mod combat;
pub mod engine;
pub mod entity;
pub mod error;
pub mod geom;
pub mod input;
pub mod level;
pub mod render;
pub mod script;
pub mod sprite;
