//! Settings shared by the outer layers (file config and the CLI)

mod output_format;

pub use output_format::OutputFormat;
