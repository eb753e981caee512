//! Reference Data Access
//!
//! Loads region climate/soil attributes, crop profiles and baseline grades
//! from CSV sources with Polars. Loading never fails outward: a missing or
//! undecodable source becomes an empty table.
//!
//! ## Architecture
//! - `table.rs` - Keyed CSV tables, UTF-8/EUC-KR decoding
//! - `cache.rs` - `TableCache`, parse-once memoization per source path
//! - `reference.rs` - Typed `Region`, `CropProfile`, `BaselineTable`, `ReferenceData`

pub mod table;
pub mod cache;
pub mod reference;

pub use table::{
    decode_source, load_reference_data, parse_table_bytes, try_load_table, CellValue, KeyedTable,
    Record, SourceEncoding,
};
pub use cache::TableCache;
pub use reference::{
    BaselineTable, CropProfile, CultivationDifficulty, Level, ReferenceData, Region,
    CROP_COLUMNS, REGION_COLUMNS,
};
