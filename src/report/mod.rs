pub mod manifest;
pub mod xlsx;
