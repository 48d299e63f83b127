//! Phase progress display

pub mod reporter;
