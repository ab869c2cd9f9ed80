//! Summary statistics over numeric columns

use super::column::Column;
use crate::error::{FrameError, Result};

impl Column {
    /// Numeric cells as `f64`; nulls are dropped when `remove_na` is set
    fn numeric_values(&self, remove_na: bool) -> Result<Vec<f64>> {
        if !self.kind().is_numeric() {
            return Err(FrameError::UnsupportedOperation(format!(
                "column '{}' of kind {} is not numeric",
                self.name(),
                self.kind()
            )));
        }

        let mut out = Vec::with_capacity(self.len());
        for value in self.iter() {
            match value.as_f64() {
                Some(x) => out.push(x),
                None if remove_na => {}
                None => return Err(FrameError::MissingValue(self.name().to_string())),
            }
        }
        Ok(out)
    }

    /// Sum of the cells; an empty column sums to zero
    pub fn sum(&self, remove_na: bool) -> Result<f64> {
        Ok(self.numeric_values(remove_na)?.iter().sum())
    }

    pub fn min(&self, remove_na: bool) -> Result<Option<f64>> {
        Ok(self
            .numeric_values(remove_na)?
            .into_iter()
            .reduce(f64::min))
    }

    pub fn max(&self, remove_na: bool) -> Result<Option<f64>> {
        Ok(self
            .numeric_values(remove_na)?
            .into_iter()
            .reduce(f64::max))
    }

    /// Arithmetic mean, `None` for an empty column
    pub fn mean(&self, remove_na: bool) -> Result<Option<f64>> {
        let values = self.numeric_values(remove_na)?;
        Ok(mean(&values))
    }

    /// Middle value; the mean of the two middle values for even counts
    pub fn median(&self, remove_na: bool) -> Result<Option<f64>> {
        let mut values = self.numeric_values(remove_na)?;
        if values.is_empty() {
            return Ok(None);
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Ok(Some((values[mid - 1] + values[mid]) / 2.0))
        } else {
            Ok(Some(values[mid]))
        }
    }

    /// Population standard deviation, `None` for fewer than two values
    pub fn sd(&self, remove_na: bool) -> Result<Option<f64>> {
        let values = self.numeric_values(remove_na)?;
        if values.len() < 2 {
            return Ok(None);
        }
        let Some(mean) = mean(&values) else {
            return Ok(None);
        };
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
        Ok(Some(variance.sqrt()))
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates() {
        let col = Column::ints("x", [4, 1, 3, 2]);
        assert_eq!(col.sum(false).unwrap(), 10.0);
        assert_eq!(col.min(false).unwrap(), Some(1.0));
        assert_eq!(col.max(false).unwrap(), Some(4.0));
        assert_eq!(col.mean(false).unwrap(), Some(2.5));
        assert_eq!(col.median(false).unwrap(), Some(2.5));
    }

    #[test]
    fn test_median_odd() {
        let col = Column::doubles("x", [5.0, 1.0, 3.0]);
        assert_eq!(col.median(false).unwrap(), Some(3.0));
    }

    #[test]
    fn test_sd_is_population() {
        let col = Column::doubles("x", [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(col.sd(false).unwrap(), Some(2.0));
        assert_eq!(Column::doubles("x", [1.0]).sd(false).unwrap(), None);
    }

    #[test]
    fn test_missing_values() {
        let col = Column::ints("x", vec![Some(1), None, Some(3)]);
        assert_eq!(
            col.mean(false),
            Err(FrameError::MissingValue("x".to_string()))
        );
        assert_eq!(col.mean(true).unwrap(), Some(2.0));
        assert_eq!(Column::ints("x", Vec::<i32>::new()).mean(true).unwrap(), None);
    }

    #[test]
    fn test_non_numeric_column() {
        let col = Column::strings("s", ["a"]);
        assert!(matches!(col.max(true), Err(FrameError::UnsupportedOperation(_))));
    }
}
