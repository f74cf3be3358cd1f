pub mod frame;
pub mod seed;
