pub mod candidates;
pub mod criteria;
pub mod processes;
pub mod rankings;
pub mod scores;
