pub mod config;
pub mod fetch;
pub mod geometry;
pub mod normalize;
pub mod paginate;
pub mod schema;
pub mod sink;
pub mod source;
pub mod task;
pub mod types;
