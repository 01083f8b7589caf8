// file: src/report/mod.rs
// description: grouped report assembly, rendering and export module exports
// reference: internal module structure

pub mod assembler;
pub mod export;
pub mod renderer;

pub use assembler::assemble;
pub use export::{DeliveryManifest, ReportWriter, full_subject, to_csv};
pub use renderer::{header, render_html, rows};
