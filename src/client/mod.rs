pub mod vertex;

pub use vertex::VertexClient;
