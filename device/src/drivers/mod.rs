pub mod i2c;
pub mod led;
pub mod sensors;
