pub mod buckets;
pub mod commit;
pub mod config;
pub mod doctor;
pub mod items;
pub mod model;
pub mod preview;
pub mod run_log;
#[cfg(test)]
pub(crate) mod test_support;
pub mod workflow;
