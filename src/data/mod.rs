pub mod compound;
pub mod export;
pub mod point;
