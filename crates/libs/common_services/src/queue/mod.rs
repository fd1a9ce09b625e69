mod enqueue_job;

pub use enqueue_job::*;
