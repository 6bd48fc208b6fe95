mod assessment;
mod calculation;
mod result;
mod taxonomy;

pub use assessment::PgAssessmentRepository;
pub use calculation::PgCalculationBaseRepository;
pub use result::PgResultRepository;
pub use taxonomy::PgTaxonomyRepository;
