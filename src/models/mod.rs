mod observation;
mod series;

pub use observation::Observation;
pub use series::CaseSeries;
