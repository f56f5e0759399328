pub mod label;
pub mod part;
pub mod resolution;
pub mod stock_move;
pub mod vehicle;

pub use label::{LabelLanguage, PartSticker, StockMoveLabel};
pub use part::PartRecord;
pub use resolution::{NotFoundReason, ResolutionRequest, ResolutionResult};
pub use stock_move::{
    ExportHeader, ExportLine, ImportBatch, ImportLayout, RawImportRow, RowStatus, StockMoveRow,
};
pub use vehicle::{GovVehicleRecord, Vehicle};
