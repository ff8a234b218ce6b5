pub mod led;
pub mod radio;
pub mod sensors;
