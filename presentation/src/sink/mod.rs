//! Presentation sinks

pub mod console;
