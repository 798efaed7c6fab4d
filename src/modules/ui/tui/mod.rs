pub mod renderer;
pub mod tower;
