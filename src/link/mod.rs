pub mod finalize;
pub mod open_graph;
pub mod processor;

pub use finalize::generate_previews_from_image;
pub use processor::OpenGraphProcessor;
