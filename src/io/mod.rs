//! Reading and writing tables as delimited text

mod csv;

pub use self::csv::{read_csv, read_csv_from_reader, write_csv, CsvOptions};
