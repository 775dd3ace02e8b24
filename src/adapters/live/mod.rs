//! Live adapters for real external interactions.

pub mod clock;
pub mod describer;
pub mod filesystem;
pub mod gemini;
pub mod openai;

pub use describer::LiveDescriber;
