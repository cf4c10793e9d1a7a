pub mod credit_card;
pub mod db;
pub mod log_entry;
pub mod models;
