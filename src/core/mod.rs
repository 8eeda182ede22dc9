pub mod analysis;
pub mod metrics;
pub mod sample;

pub use crate::domain::model::{
    BiodiversityScore, CarbonCreditQuote, ConservationStatus, DiversityMetrics,
    SpeciesObservation,
};
pub use crate::domain::ports::{ConfigProvider, ConservationSource, OccurrenceSource};
pub use crate::utils::error::Result;
