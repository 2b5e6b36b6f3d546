pub mod analyzer;
pub mod classify;
pub mod cycles;
pub mod input;
pub mod lookup;
pub mod model;
pub mod resolver;
pub mod scanner;

pub use analyzer::load_project;
pub use input::LoadOptions;
pub use model::{target_from, Component, ComponentId, ComponentKind, File, FileId, LookupEntry, Project};
pub use resolver::Resolution;
pub use scanner::{scan_bytes, scan_file, RawInclude, ScanOptions, ScanResult};
