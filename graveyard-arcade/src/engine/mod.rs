pub mod camera;
pub mod core;
pub mod loading;
pub mod scheduler;
pub mod systems;
