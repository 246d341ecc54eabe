// Customized exports: selection filtering, saved templates, preview and file generation.

pub mod filter;
pub mod handlers;
