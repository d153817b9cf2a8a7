pub mod aggregate;
pub mod fragment;
pub mod parser;

pub use aggregate::{AggregatedResponse, Aggregation, AggregationState, ResponseAggregator};
pub use fragment::{FragmentText, MissingText, ResponseFragment};
pub use parser::StreamingJsonParser;
