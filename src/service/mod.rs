pub mod labels;
pub mod normalizer;
pub mod resolver;
pub mod stock_export;
pub mod stock_import;
pub mod variant;

pub use labels::{FileSink, LabelRenderer, PrintSink};
pub use normalizer::{codes_match, normalize_oem};
pub use resolver::PartResolver;
pub use stock_import::StockImportService;
