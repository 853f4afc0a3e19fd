pub mod columns;
pub mod events;
pub mod summary;
