//! AT-SPI 无障碍树动态绑定

pub mod atspi;
pub mod config;
