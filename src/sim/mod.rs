pub mod driver;
pub mod policy;
pub mod result;
pub mod tension;

pub use driver::Batch;
pub use driver::Driver;
pub use policy::AiKind;
pub use result::AggregatedStats;
pub use result::GameResult;
pub use tension::LeaderMetric;
pub use tension::TensionMetrics;
