//! Feed-agnostic domain types: alerts, snapshots, identifiers, post drafts.

pub mod alert;
pub mod error;
pub mod id;
pub mod post;
pub mod snapshot;

pub use alert::{ActivePeriod, Alert, AlertType, Effect, RouteType};
pub use error::DomainError;
pub use id::{AlertId, ContainerId, PostId};
pub use post::{PostDraft, MAX_POST_CHARS};
pub use snapshot::{decode_alerts, AlertSnapshot, SnapshotKey, KEY_WIDTH};
