//! Job scheduling.
//!
//! Records for the work calendar: what is booked, where, for whom, and how
//! far along it is. Calendar rendering is a caller concern.

pub mod job;

pub use job::{Job, JobId, JobStatus, jobs_on};
