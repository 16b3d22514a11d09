//! Scenes: triangle containers, the RON scene format and the built-in demo

mod demo;
mod file;
mod object;

pub use demo::*;
pub use file::*;
pub use object::*;
