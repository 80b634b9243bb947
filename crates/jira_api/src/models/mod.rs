mod worklog;

pub use worklog::{Worklog, WorklogPage, WorklogPayload};
