pub mod game_management_handler;
pub mod league_handler;
pub mod review_handler;
pub mod team_handler;
