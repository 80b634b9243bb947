mod time_entry;

pub use time_entry::TimeEntry;
