pub mod moneris;
pub mod postgres;
