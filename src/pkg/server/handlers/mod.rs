pub mod api;
pub mod candidates;
pub mod criteria;
pub mod evaluations;
pub mod probes;
pub mod processes;
pub mod ui;
