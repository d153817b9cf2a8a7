pub mod gemini;
pub mod generation;

pub use generation::GenerationConfig;
