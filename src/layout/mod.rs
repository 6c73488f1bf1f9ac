pub mod clusters;
pub mod lines;
pub mod reading_order;

pub use clusters::build_clusters;
pub use lines::segment_lines;
pub use reading_order::line_tokens;
