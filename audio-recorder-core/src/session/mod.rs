pub mod capture;
pub mod producer;
