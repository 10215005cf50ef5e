pub mod analysis;
pub mod geo;
pub mod scenario;
pub mod vessel;

pub use analysis::*;
pub use geo::*;
pub use scenario::*;
pub use vessel::*;
