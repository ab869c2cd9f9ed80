//! JSON output as an array of row records

use std::io::Write;

use anyhow::Result;
use serde_json::{Map, Value as JsonValue};

use crate::model::Table;

use super::TableFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// One JSON object per row, keys in column order
fn records(table: &Table) -> Result<JsonValue> {
    let rows = table
        .rows()
        .map(|row| {
            let object = row
                .into_iter()
                .map(|(name, value)| Ok((name, serde_json::to_value(value)?)))
                .collect::<Result<Map<String, JsonValue>>>()?;
            Ok(JsonValue::Object(object))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(JsonValue::Array(rows))
}

impl TableFormatter for JsonOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let json = records(table)?;
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &json)?;
        } else {
            serde_json::to_writer(&mut *writer, &json)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_records_keep_column_order_and_nulls() {
        let t = crate::table_of!("b", "a"; 1, "x", 2, Value::Null).unwrap();
        let mut out = Vec::new();
        JsonOutput::compact().render(&t, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[{\"b\":1,\"a\":\"x\"},{\"b\":2,\"a\":null}]\n"
        );
    }
}
