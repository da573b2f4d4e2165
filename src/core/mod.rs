pub mod confidence;
pub mod key_levels;
pub mod position_sizer;
pub mod regime;

pub use confidence::ConfidenceScorer;
pub use key_levels::{FlipZone, FlipZones, KeyLevel, KeyLevelRegistry};
pub use position_sizer::{PipValueTable, PositionSizer};
pub use regime::{RegimeProfile, RegimeTable};
