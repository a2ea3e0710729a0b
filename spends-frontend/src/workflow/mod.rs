pub mod progress;
pub mod state;

pub use progress::{
    WorkflowProgress, WorkflowStep, estimated_time_remaining, progress_percentage,
    workflow_bottlenecks, workflow_progress,
};
pub use state::{
    StatusDescriptor, TransitionLookup, distribution_status, is_valid_transition,
    next_valid_statuses, responsible_roles, sort_reports,
};
