//! Domain types and models

pub mod contact;
pub mod deal;
pub mod notification;
pub mod report;
pub mod stage;

pub use contact::{Company, CompanySummary, Contact, ContactDraft, ContactSummary};
pub use deal::{Deal, DealDraft, DealOwner, ProbabilityBand, StageUpdate};
pub use notification::{Notification, NotificationLevel};
pub use report::{DashboardMetrics, DashboardReport, DealSummary, PipelineStageReport, RecentActivity};
pub use stage::Stage;
