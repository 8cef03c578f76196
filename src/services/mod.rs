pub mod corpus;
pub mod normalizer;
pub mod preferences;
pub mod recommendations;
pub mod tokenizer;

pub use corpus::{load_corpus, CorpusHandle, RecipeSource};
pub use normalizer::compute_base_scores;
pub use preferences::build_word_score_map;
pub use recommendations::recommend_recipes;
pub use tokenizer::Tokenizer;
