pub mod calculation;
pub mod definition;
pub mod elimination;
pub mod results;
pub mod scoring;
pub mod taxonomy_tree;

pub use calculation::AssessmentScoringService;
pub use definition::AssessmentDefinitionService;
pub use elimination::EliminationFilter;
pub use results::ResultPersister;
pub use scoring::ScoringEngine;
