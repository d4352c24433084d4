pub mod attribution;
pub mod config;
pub mod events;
pub mod reset;
pub mod track;
pub mod visit;
