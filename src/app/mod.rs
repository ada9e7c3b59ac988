// Application layer: concrete pipelines and one-shot file tasks built on the core.

pub mod pipelines;
pub mod tasks;
