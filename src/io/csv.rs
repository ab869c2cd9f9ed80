//! CSV adapter

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{Column, ColumnKind, Table, Value};

/// Options for reading delimited text
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Cell contents read as null, compared after trimming
    pub na_values: Vec<String>,
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: vec![String::new(), "NA".to_string()],
            has_headers: true,
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_na_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    fn is_na(&self, cell: &str) -> bool {
        self.na_values.iter().any(|na| na == cell)
    }
}

/// Read a CSV file into a table
pub fn read_csv(path: &Path, options: &CsvOptions) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_csv_from_reader(BufReader::new(file), options)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))
}

/// Read CSV data from any reader.
///
/// Every column takes the most specific kind its cells parse into; columns
/// mixing incompatible kinds are kept as text.
pub fn read_csv_from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .from_reader(reader);

    let mut names: Vec<String> = if options.has_headers {
        csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", line + 1))?;
        while cells.len() < record.len() {
            // rows wider than the header get generated names
            names.push(format!("X{}", names.len() + 1));
            cells.push(vec![None; line]);
        }
        for (i, column) in cells.iter_mut().enumerate() {
            let cell = record.get(i).map(str::trim).filter(|c| !options.is_na(c));
            column.push(cell.map(str::to_string));
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| build_column(name, raw))
        .collect();
    Table::new(columns).context("Invalid CSV table")
}

/// Parse a single non-null cell
fn parse_cell(cell: &str) -> Value {
    if let Ok(i) = cell.parse::<i32>() {
        return Value::Int(i);
    }
    if let Ok(l) = cell.parse::<i64>() {
        return Value::Long(l);
    }
    if let Ok(d) = cell.parse::<f64>() {
        return Value::Double(d);
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::Str(cell.to_string())
}

fn build_column(name: String, raw: Vec<Option<String>>) -> Column {
    let parsed: Vec<Value> = raw
        .iter()
        .map(|c| c.as_deref().map_or(Value::Null, parse_cell))
        .collect();
    let column = Column::infer(name.as_str(), parsed);
    if column.kind() == ColumnKind::Any {
        Column::strings(name, raw)
    } else {
        column
    }
}

/// Write a table as CSV with a header row; nulls are written as `NA`
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(table.names())
        .context("Failed to write CSV header")?;
    for row in 0..table.nrow() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.get(row).unwrap_or_default().display().into_owned())
            .collect();
        csv_writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row {}", row + 1))?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> Table {
        read_csv_from_reader(data.as_bytes(), &CsvOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("42"), Value::Int(42));
        assert_eq!(parse_cell("4000000000"), Value::Long(4_000_000_000));
        assert_eq!(parse_cell("3.5"), Value::Double(3.5));
        assert_eq!(parse_cell("TRUE"), Value::Bool(true));
        assert_eq!(parse_cell("hello"), Value::from("hello"));
    }

    #[test]
    fn test_read_infers_kinds() {
        let t = read("id,score,name,flag\n1,2.5,ann,true\n2,NA,bob,false\n3,4,,true\n");
        assert_eq!(t.nrow(), 3);
        assert_eq!(
            t.schema(),
            vec![
                ("id".to_string(), ColumnKind::Int),
                ("score".to_string(), ColumnKind::Double),
                ("name".to_string(), ColumnKind::Str),
                ("flag".to_string(), ColumnKind::Bool),
            ]
        );
        assert_eq!(t.column("score").unwrap().get(1), Some(Value::Null));
        assert_eq!(t.column("name").unwrap().get(2), Some(Value::Null));
    }

    #[test]
    fn test_mixed_columns_stay_text() {
        let t = read("code\n1\nx1\nNA\n");
        let code = t.column("code").unwrap();
        assert_eq!(code.kind(), ColumnKind::Str);
        assert_eq!(code.get(0), Some(Value::from("1")));
        assert_eq!(code.get(2), Some(Value::Null));
    }

    #[test]
    fn test_custom_delimiter_and_na() {
        let options = CsvOptions::new()
            .with_delimiter(b';')
            .with_na_values(["-"]);
        let t = read_csv_from_reader("a;b\n1;-\n".as_bytes(), &options).unwrap();
        assert_eq!(t.column("b").unwrap().get(0), Some(Value::Null));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = read("a,b\n1,2\n3\n");
        assert_eq!(t.column("b").unwrap().get(1), Some(Value::Null));
    }

    #[test]
    fn test_write_csv() {
        let t = read("a,b\n1,x\n2,NA\n");
        let mut out = Vec::new();
        write_csv(&t, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\n1,x\n2,NA\n");
    }
}
