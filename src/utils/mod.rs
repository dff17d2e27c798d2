pub mod constants;
pub mod duration;
