pub mod player;
pub mod screen;
pub mod viewer;
pub mod windows;
