pub mod reward_file;
pub mod rewards_import;
