mod component;

pub use component::{GraphCommand, ZigzagGraph};
