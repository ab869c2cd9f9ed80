//! Configuration handling for the colframe command line

use std::path::PathBuf;

/// Output format for the resulting table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file to read
    pub input: PathBuf,
    /// Field delimiter of the input
    pub delimiter: u8,
    /// Cell contents read as missing values
    pub na_values: Vec<String>,
    /// Columns to keep, applied first
    pub select: Vec<String>,
    /// Columns to group by
    pub group_by: Vec<String>,
    /// Replace the rows by their count per group
    pub count: bool,
    /// Columns to sort by
    pub sort_by: Vec<String>,
    /// Sort in descending order
    pub descending: bool,
    /// Keep only the first rows (per group when grouped)
    pub head: Option<usize>,
    /// Output format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            delimiter: b',',
            na_values: vec![String::new(), "NA".to_string()],
            select: Vec::new(),
            group_by: Vec::new(),
            count: false,
            sort_by: Vec::new(),
            descending: false,
            head: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config reading `input`
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        self
    }

    pub fn with_select(mut self, columns: Vec<String>) -> Self {
        self.select = columns;
        self
    }

    pub fn with_group_by(mut self, columns: Vec<String>) -> Self {
        self.group_by = columns;
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Set sort columns and direction
    pub fn with_sort_by(mut self, columns: Vec<String>, descending: bool) -> Self {
        self.sort_by = columns;
        self.descending = descending;
        self
    }

    pub fn with_head(mut self, n: usize) -> Self {
        self.head = Some(n);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// CSV reader options for the input
    pub fn csv_options(&self) -> crate::io::CsvOptions {
        crate::io::CsvOptions::new()
            .with_delimiter(self.delimiter)
            .with_na_values(self.na_values.iter().cloned())
    }
}
