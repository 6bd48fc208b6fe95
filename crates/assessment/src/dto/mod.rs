pub mod assessment;
pub mod scores;
pub mod taxonomy;

pub use assessment::*;
pub use scores::*;
pub use taxonomy::*;
