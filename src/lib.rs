pub mod corpus;
pub mod matrix;
pub mod parallel;
pub mod pipeline;
pub mod progress;
pub mod queue;
pub mod render;
pub mod settings;
pub mod types;
pub mod vocab;
pub mod writer;
