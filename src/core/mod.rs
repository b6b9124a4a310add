// Workflow core exports
pub mod machine;
pub mod outreach;
pub mod session;
pub mod state;
pub mod steps;
pub mod validation;

pub use machine::{begin, resolve, Command, Intent, Transition, WorkflowError};
pub use outreach::{ContactPolicy, OutreachPolicy};
pub use session::Session;
pub use state::{
    Action, Notice, NoticeLevel, Reply, Request, Response, TransportFailure, WorkflowState,
};
pub use steps::{is_final_step, next_step, step_index, Step, WORKFLOW_STEPS};
