//! The ideapool asset pool.
//!
//! [`AssetPool`] owns three record collections (ideas, executions and
//! revenue), each persisted as a pretty-printed JSON array in its own file.

mod clock;
mod error;
mod record;
mod stats;
mod store;

pub use clock::{format_timestamp, id_stamp, Clock, SteppingClock, SystemClock};
pub use error::StoreError;
pub use record::{
    ExecutionRecord, ExecutionStatus, IdeaRecord, IdeaStatus, LogEntry, NewIdea, RevenueRecord,
    StepEntry,
};
pub use stats::{ExecutionCounts, IdeaCounts, Overview, RevenueStats};
pub use store::{
    AssetPool, LoadReport, LoadStatus, DEFAULT_LIST_LIMIT, EXECUTIONS_FILE, IDEAS_FILE,
    REVENUE_FILE,
};
