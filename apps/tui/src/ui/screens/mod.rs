pub mod dashboard;
pub mod export;
pub mod help;
pub mod maintenance;
pub mod records;
pub mod users;
