pub mod base;
pub mod group;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod tile;
pub mod vector;
