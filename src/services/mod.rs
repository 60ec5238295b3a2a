pub mod analysis;
pub mod moving_average;
pub mod price_change;
pub mod signals;

pub use analysis::{AnalysisOptions, AnalysisService};
pub use moving_average::{annotate, moving_average, MA_WINDOWS};
pub use price_change::{price_change, price_changes};
pub use signals::Indicator;
