//! Rule-based report analysis.
//!
//! Every function here is pure and total: any text, including an empty one,
//! produces a complete result.

pub mod diet;
pub mod diseases;
pub mod follow_up;
pub mod knowledge;
pub mod medications;
pub mod recovery;
pub mod sections;
pub mod summary;

pub use knowledge::KnowledgeBase;
pub use summary::Summarizer;
