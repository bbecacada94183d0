//! Barrett's surveillance engine: status resolution, interval advice, and
//! plan/recall reconciliation.
//!
//! Everything here is plain request/response over the store — no prompts,
//! no widgets. Where the workflow asks the user something ("also create a
//! recall?", "also delete the linked recall?"), the answer arrives as a
//! boolean from the caller.

mod advisor;
mod reconciler;
mod status;
mod types;

pub use advisor::{recommend, recommended_due_date};
pub use reconciler::{delete_plan, linked_recall, save_plan};
pub use status::resolve_status;
pub use types::{
    BarrettStatus, EngineError, IntervalAdvice, PlanDeleteResult, PlanDue, PlanSaveResult,
    SurveillanceUrgency,
};
