pub mod auth;
pub mod common;
pub mod fan;
pub mod game_events;
pub mod goal_event;
pub mod league;
pub mod stats;
pub mod team;
pub mod user;
