pub mod artifact;
pub mod job;
pub mod output;
pub mod profile;
