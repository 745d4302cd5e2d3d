pub mod goal_generator;
pub mod weighted;
