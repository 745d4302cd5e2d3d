pub mod aggregates;
pub mod matchday;
pub mod score;
pub mod standings;
pub mod statistics;
