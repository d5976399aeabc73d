pub mod source;
pub mod status;

pub use source::{dominant_source, source_glyph, DominantSource, SourceCategory};
pub use status::{classify, kpi_status, ramp_color, severity_color, status_color, Classification, StatusTier};
