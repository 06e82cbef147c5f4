//! Migration planning domain models.
//!
//! Inputs (`ResourceRecord`, `TargetProfile`, `ScenarioInput`) are read-only
//! snapshots supplied by the caller. Everything else is derived.
//!
//! # Domain Mappings
//!
//! | Model | Scheduling analogue |
//! |-------|---------------------|
//! | ResourceRecord | Job |
//! | PerVMEstimate | Job processing time |
//! | Batch | Parallel machine slot set |
//! | Wave | Release phase |
//! | Timeline | Schedule |

mod estimate;
mod plan;
mod resource;
mod result;
mod scenario;
mod target;
mod timeline;

pub use estimate::{PerVMEstimate, WeightedVm};
pub use plan::{Batch, PlanGroup, Wave};
pub use resource::{PowerState, ResourceRecord, MIB_PER_GIB};
pub use result::{
    CostBreakdown, CostCategory, DurationSummary, RiskAssessment, RiskFactor, RiskLevel,
    ScenarioResult,
};
pub use scenario::{MigrationStrategy, ScenarioInput, ScenarioOptions};
pub use target::TargetProfile;
pub use timeline::{EntryKind, Timeline, TimelineEntry};
