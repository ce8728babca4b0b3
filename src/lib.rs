#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assembler;
pub mod config;
pub mod filters;
pub mod fsops;
pub mod layout;
pub mod platform;
pub mod report;
pub mod variant;

pub use assembler::DistAssembler;
pub use config::ProjectConfig;
pub use layout::SourceLayout;
pub use platform::{Architecture, Platform};
pub use report::RunReport;
pub use variant::Variant;
