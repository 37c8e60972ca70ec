pub mod display;
pub mod tree;
