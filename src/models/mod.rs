mod user;
mod forms;
mod job;
mod resource;
pub mod api;

pub use user::{User, Role};
pub use forms::{LoginReq, JobCreateReq, StatusUpdateReq, ResCreateReq};
pub use job::{Job, JobStatus};
pub use resource::{Resource, Tool};
