pub mod si7005;
