pub mod advisor;
pub mod odds;
pub mod search;
