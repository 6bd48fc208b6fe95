pub mod assessment;
pub mod assessment_result;
pub mod calculation_base;
pub mod dimension;
pub mod taxonomy;
pub mod timestamps;
pub mod tool;

pub use assessment::*;
pub use assessment_result::*;
pub use calculation_base::*;
pub use dimension::*;
pub use taxonomy::*;
pub use timestamps::*;
pub use tool::*;
