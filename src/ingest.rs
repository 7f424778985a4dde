// CSV ingestion: encoding fallback, delimiter sniffing and header extraction

pub mod delimiter;
pub mod encoding;
pub mod loader;

// Re-export commonly used items
pub use delimiter::{detect_delimiter, DELIMITER_CANDIDATES};
pub use encoding::{TextEncoding, ENCODINGS};
pub use loader::{load_bytes, load_csv, parse_table, LoadError, LoadedCsv};
