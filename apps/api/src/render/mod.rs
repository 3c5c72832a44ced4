// Document stage: LaTeX rendering per region, PDF compilation with a backend
// fallback chain, and the per-run zip bundle.

pub mod bundler;
pub mod compiler;
pub mod latex;
pub mod templates;
