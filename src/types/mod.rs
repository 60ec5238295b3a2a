pub mod bar;
pub mod chart;
pub mod signals;

pub use bar::*;
pub use chart::*;
pub use signals::*;
