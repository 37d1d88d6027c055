pub mod dataset;
pub mod error;
pub mod filter;
pub mod geo;
pub mod ingest;
pub mod markers;
pub mod popup;
pub mod session;
pub mod table;

// Re-exports for convenience
pub use companymap_types::{CoordinateAliases, MapConfig, ViewerConfig};
pub use dataset::{Dataset, HeaderSet, Row};
pub use error::IngestError;
pub use filter::{FilterId, FilterRow, FilterSet};
pub use geo::LatLng;
pub use ingest::{ACCEPTED_EXTENSIONS, FileKind, SourceFile, read_dataset};
pub use markers::{Marker, MarkerBatch, PopupLine};
pub use popup::PopupColumns;
pub use session::{LoadSummary, PageSession};
pub use table::TableView;
