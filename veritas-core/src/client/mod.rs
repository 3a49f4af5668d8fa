pub mod gemini;
pub mod schema;

pub use gemini::GeminiClassifier;
