//! Report projections over the store: the recall queue and the Barrett's
//! surveillance report. Pure reads — plain data in, ordered rows out.

mod barretts;
mod recall_queue;
mod types;

pub use barretts::project_barretts_report;
pub use recall_queue::project_recall_queue;
pub use types::{BarrettsRow, RecallPriority, RecallRow, RecallStatus};
