use ahash::AHashMap;
use std::io::Read;
use thiserror::Error;

/// Errors raised while parsing a compatibility matrix CSV. These are
/// structural: the run aborts before any geometric work starts.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("matrix CSV could not be read: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "matrix row {row} ('{row_class}'), column '{column}': cell value '{value}' is not numeric"
    )]
    BadCell {
        row: usize,
        row_class: String,
        column: String,
        value: String,
    },
}

/// Policy table scoring ordered pairs of land-use classes.
///
/// The mapping is directional: `(A, B)` and `(B, A)` are independent entries
/// and are never symmetrized, even though matrices are symmetric in practice.
/// A missing pair yields `None` (unresolved), which is not an error and not
/// a score; the aggregator applies its own default policy to it.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    scores: AHashMap<String, AHashMap<String, i64>>,
    len: usize,
}

impl CompatibilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, left: impl Into<String>, right: impl Into<String>, score: i64) {
        let previous = self
            .scores
            .entry(left.into())
            .or_default()
            .insert(right.into(), score);
        if previous.is_none() {
            self.len += 1;
        }
    }

    /// Score recorded for exactly the ordered pair `(left, right)`.
    pub fn score(&self, left: &str, right: &str) -> Option<i64> {
        self.scores.get(left)?.get(right).copied()
    }

    /// Number of ordered class pairs with a recorded score.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Parses a wide-format matrix CSV: column classes in the header row,
    /// row class in the first cell of each following row, scores in the
    /// body. Blank cells mean "no entry for this pair". Fractional values
    /// are rounded; the score *range* is deliberately not validated.
    pub fn from_wide_csv<R: Read>(reader: R) -> Result<Self, MatrixError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = rdr.records();
        let columns: Vec<String> = match records.next() {
            // First cell of the header is the (unused) row-label corner.
            Some(header) => header?.iter().skip(1).map(str::to_string).collect(),
            None => return Ok(Self::new()),
        };

        let mut matrix = Self::new();
        for (row_number, record) in records.enumerate() {
            let record = record?;
            let row_class = match record.get(0) {
                Some(label) if !label.trim().is_empty() => label.trim().to_string(),
                _ => continue,
            };
            for (column, cell) in columns.iter().zip(record.iter().skip(1)) {
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                let score = parse_score(cell).ok_or_else(|| MatrixError::BadCell {
                    row: row_number + 1,
                    row_class: row_class.clone(),
                    column: column.clone(),
                    value: cell.to_string(),
                })?;
                matrix.insert(row_class.clone(), column.clone(), score);
            }
        }
        Ok(matrix)
    }
}

fn parse_score(cell: &str) -> Option<i64> {
    if let Ok(score) = cell.parse::<i64>() {
        return Some(score);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value.round() as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_directional() {
        let mut matrix = CompatibilityMatrix::new();
        matrix.insert("Residential", "Industrial", 1);
        matrix.insert("Industrial", "Residential", 4);

        // (A,B) and (B,A) are independent entries.
        assert_eq!(matrix.score("Residential", "Industrial"), Some(1));
        assert_eq!(matrix.score("Industrial", "Residential"), Some(4));
    }

    #[test]
    fn test_missing_pair_is_unresolved_not_symmetrized() {
        let mut matrix = CompatibilityMatrix::new();
        matrix.insert("Residential", "Industrial", 1);

        assert_eq!(matrix.score("Industrial", "Residential"), None);
        assert_eq!(matrix.score("Residential", "Park"), None);
        assert_eq!(matrix.score("Park", "Park"), None);
    }

    #[test]
    fn test_from_wide_csv() {
        let csv = "\
,Residential,Industrial,Commercial
Residential,5,1,3
Industrial,1,4,
Commercial,3,2.6,5
";
        let matrix = CompatibilityMatrix::from_wide_csv(csv.as_bytes()).unwrap();
        assert_eq!(matrix.len(), 8);
        assert_eq!(matrix.score("Residential", "Industrial"), Some(1));
        // Blank cell stays unresolved.
        assert_eq!(matrix.score("Industrial", "Commercial"), None);
        // Fractional values are rounded, not rejected.
        assert_eq!(matrix.score("Commercial", "Industrial"), Some(3));
    }

    #[test]
    fn test_from_wide_csv_bad_cell() {
        let csv = ",Residential\nResidential,high\n";
        let err = CompatibilityMatrix::from_wide_csv(csv.as_bytes()).unwrap_err();
        match err {
            MatrixError::BadCell {
                row_class,
                column,
                value,
                ..
            } => {
                assert_eq!(row_class, "Residential");
                assert_eq!(column, "Residential");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_csv_gives_empty_matrix() {
        let matrix = CompatibilityMatrix::from_wide_csv("".as_bytes()).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.score("Anything", "Anything"), None);
    }
}
