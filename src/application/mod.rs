//! Application services (use cases).
//!
//! These services implement the reconciliation core and coordinate the
//! outbound ports to run one alert tick.

pub mod filter;
pub mod pagination;
pub mod publish;
pub mod reconcile;
pub mod service;

pub use filter::{order, select};
pub use pagination::KeyPager;
pub use publish::{
    AlertOutcome, AlertResult, PublishReport, Publisher, PublisherConfig, SkipReason,
    DEFAULT_POST_INTERVAL,
};
pub use reconcile::{cold_start, diff, Baseline, ReconcilePlan, ReconciliationEngine};
pub use service::{AlertService, RunOutcome};
