//! Category/value datasets shown as bar charts.

use serde::{Deserialize, Serialize};

/// One bar of a chart.
///
/// Field names follow the wire format used by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

impl ChartEntry {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// Ordered mapping from category label to value.
///
/// Insertion order is the x-axis order. Labels are expected to be unique;
/// that is the producer's responsibility and is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartDataset {
    entries: Vec<ChartEntry>,
}

impl ChartDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from parallel category and value lists.
    ///
    /// Extra items in the longer list are ignored.
    pub fn from_columns<S: Into<String>>(
        categories: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        let entries = categories
            .into_iter()
            .zip(values)
            .map(|(category, value)| ChartEntry::new(category, value))
            .collect();
        Self { entries }
    }

    pub fn push(&mut self, category: impl Into<String>, value: f64) {
        self.entries.push(ChartEntry::new(category, value));
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    /// Largest value, or 0.0 for an empty dataset.
    pub fn max_value(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ChartEntry> for ChartDataset {
    fn from_iter<T: IntoIterator<Item = ChartEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_keeps_order() {
        let data = ChartDataset::from_columns(["B", "A", "C"], [2.0, 1.0, 3.0]);
        let cats: Vec<&str> = data.categories().collect();
        assert_eq!(cats, vec!["B", "A", "C"]);
        assert_eq!(data.max_value(), 3.0);
    }

    #[test]
    fn test_wire_format() {
        let json = r#"[{"Category":"A","Value":120},{"Category":"B","Value":75.5}]"#;
        let data: ChartDataset = serde_json::from_str(json).expect("parse");
        assert_eq!(data.len(), 2);
        assert_eq!(data.entries()[0], ChartEntry::new("A", 120.0));
        assert_eq!(data.entries()[1].value, 75.5);
    }

    #[test]
    fn test_empty_max_value() {
        assert_eq!(ChartDataset::new().max_value(), 0.0);
    }
}
