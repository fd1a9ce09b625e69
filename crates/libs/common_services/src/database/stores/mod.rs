mod quiz_response_store;
mod report_job_store;

pub use quiz_response_store::*;
pub use report_job_store::*;
