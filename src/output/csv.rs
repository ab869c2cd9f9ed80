//! CSV output

use std::io::Write;

use anyhow::Result;

use crate::io::write_csv;
use crate::model::Table;

use super::TableFormatter;

pub struct CsvOutput;

impl TableFormatter for CsvOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        write_csv(table, writer)
    }
}
