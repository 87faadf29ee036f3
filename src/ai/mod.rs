pub mod eval;
pub mod search;

pub use eval::{Evaluation, evaluate, evaluation};
pub use search::Searcher;
