pub mod given;
pub mod then;
