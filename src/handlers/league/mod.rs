pub mod match_handler;
pub mod standings_handler;
pub mod stats_handler;
pub mod team_handler;
