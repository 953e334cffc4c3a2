//! Tabular projection of query results
//!
//! Converts a heterogeneous record sequence into a rectangular table:
//! - Column headers come from the first record only, in its field order
//! - Every record is projected onto those headers
//! - A field missing from a record becomes an empty cell
//! - Fields that only appear in later records are dropped
//!
//! The last rule is lossy on purpose: existing consumers of exported files
//! rely on the column set being exactly the first record's fields.

use mongodb::bson::{Bson, Document};

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The record has no such field
    Empty,

    /// The record's value for the column (may itself be `Null`)
    Value(Bson),
}

/// Rectangular projection of a record sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, distinct, in first-record order
    pub headers: Vec<String>,

    /// One row per record; each row has `headers.len()` cells
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (excluding the header row)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are neither headers nor rows
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

impl Cell {
    /// Borrow the value, if any
    pub fn value(&self) -> Option<&Bson> {
        match self {
            Cell::Empty => None,
            Cell::Value(v) => Some(v),
        }
    }
}

/// Project `records` onto the first record's fields.
///
/// An empty input yields an empty table, not an error.
pub fn project(records: &[Document]) -> Table {
    let Some(first) = records.first() else {
        return Table::default();
    };

    let headers: Vec<String> = first.keys().cloned().collect();

    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|field| match record.get(field) {
                    Some(value) => Cell::Value(value.clone()),
                    None => Cell::Empty,
                })
                .collect()
        })
        .collect();

    Table { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn int(n: i32) -> Cell {
        Cell::Value(Bson::Int32(n))
    }

    #[test]
    fn test_project_empty() {
        let table = project(&[]);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_project_drops_fields_not_in_first_record() {
        let records = vec![doc! { "a": 1, "b": 2 }, doc! { "b": 3, "c": 4 }];
        let table = project(&records);

        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(
            table.rows,
            vec![vec![int(1), int(2)], vec![Cell::Empty, int(3)]]
        );
    }

    #[test]
    fn test_headers_follow_first_record_order() {
        let records = vec![doc! { "z": 1, "a": 2, "m": 3 }];
        let table = project(&records);
        assert_eq!(table.headers, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_rows_are_rectangular() {
        let records = vec![
            doc! { "name": "Alice", "age": 30, "city": "Paris" },
            doc! { "name": "Bob" },
            doc! {},
            doc! { "city": "Rome", "extra": true, "age": 41 },
        ];
        let table = project(&records);

        assert_eq!(table.row_count(), 4);
        assert!(table.rows.iter().all(|r| r.len() == table.column_count()));
        assert_eq!(table.rows[2], vec![Cell::Empty, Cell::Empty, Cell::Empty]);
        assert_eq!(
            table.rows[3],
            vec![
                Cell::Empty,
                int(41),
                Cell::Value(Bson::String("Rome".into()))
            ]
        );
    }

    #[test]
    fn test_explicit_null_is_not_empty() {
        let records = vec![doc! { "a": 1 }, doc! { "a": Bson::Null }];
        let table = project(&records);
        assert_eq!(table.rows[1][0], Cell::Value(Bson::Null));
        assert_eq!(table.rows[1][0].value(), Some(&Bson::Null));
    }

    #[test]
    fn test_nested_values_are_kept_whole() {
        let records = vec![doc! { "tags": ["x", "y"], "meta": { "k": 1 } }];
        let table = project(&records);
        assert_eq!(
            table.rows[0][1],
            Cell::Value(Bson::Document(doc! { "k": 1 }))
        );
    }
}
