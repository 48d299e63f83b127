//! Human play from the terminal

pub mod console;
