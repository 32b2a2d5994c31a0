//! Workbook loader.
//!
//! Reads every sheet of a spreadsheet into memory as header names plus rows of
//! [`Cell`]s. No asset-specific logic here.

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult, WorkbookError, WorkbookResult};

/// String cells treated as not-available, matching common spreadsheet tooling.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single parsed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty, error, or not-available marker.
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Hashable identity of a non-missing cell, used for joins.
///
/// Text never matches a number: `Text("5")` does not match `Int(5)`. Numbers
/// compare by value, so `Float(5.0)` matches `Int(5)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Convert a raw calamine cell.
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Missing,
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::from_float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) => Cell::from_text(s),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
            dt @ Data::DateTime(_) => Cell::Text(dt.to_string()),
        }
    }

    /// Spreadsheets store every number as a double; whole numbers read back as
    /// integers until [`Sheet::from_range`] settles the column's number type.
    pub fn from_float(f: f64) -> Self {
        if !f.is_finite() {
            Cell::Missing
        } else if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Cell::Int(f as i64)
        } else {
            Cell::Float(f)
        }
    }

    pub fn from_text(s: &str) -> Self {
        if NA_MARKERS.contains(&s) {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn join_key(&self) -> Option<JoinKey> {
        match self {
            Cell::Missing => None,
            Cell::Int(i) => Some(JoinKey::Int(*i)),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(JoinKey::Int(*f as i64))
            }
            Cell::Float(f) => Some(JoinKey::Float(f.to_bits())),
            Cell::Bool(b) => Some(JoinKey::Bool(*b)),
            Cell::Text(s) => Some(JoinKey::Text(s.clone())),
        }
    }

    /// Raw JSON value, `null` for missing cells.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Missing => Value::Null,
            Cell::Int(i) => json!(i),
            Cell::Float(f) => json!(f),
            Cell::Bool(b) => json!(b),
            Cell::Text(s) => json!(s),
        }
    }

    /// Text used when the cell becomes a JSON object key.
    pub fn key_text(&self) -> String {
        match self {
            Cell::Missing => "NaN".to_string(),
            Cell::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }
}

/// String form of a cell: text as is, integers in decimal, floats in shortest
/// form with at least one decimal (`3.0`), `True`/`False`.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "nan"),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One sheet: headers plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    /// 1-based spreadsheet row of each entry in `rows`
    row_numbers: Vec<usize>,
}

impl Sheet {
    /// Sheet whose header sits on row 1 and whose data rows follow without gaps.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let row_numbers = (2..rows.len() + 2).collect();
        Self {
            headers,
            rows,
            row_numbers,
        }
    }

    /// Build a sheet from a calamine range. The first row holds the headers.
    pub fn from_range(range: &Range<Data>) -> Self {
        // Ranges start at the first used cell, not necessarily A1
        let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(i, cell)| match Cell::from_data(cell) {
                    Cell::Missing => format!("Unnamed: {}", i),
                    other => other.to_string(),
                })
                .collect(),
            None => return Self::default(),
        };

        let (row_numbers, mut rows): (Vec<usize>, Vec<Vec<Cell>>) = rows
            .enumerate()
            .map(|(offset, row)| {
                let cells = (0..headers.len())
                    .map(|i| row.get(i).map(Cell::from_data).unwrap_or(Cell::Missing))
                    .collect::<Vec<_>>();
                (first_row + offset + 1, cells)
            })
            // Fully blank lines are not data
            .filter(|(_, cells)| !cells.iter().all(Cell::is_missing))
            .unzip();

        for column in 0..headers.len() {
            unify_numeric_column(&mut rows, column);
        }

        Self {
            headers,
            rows,
            row_numbers,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Data rows paired with their 1-based spreadsheet row number.
    pub fn numbered_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.row_numbers
            .iter()
            .copied()
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this exact header.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rows as JSON objects keyed by header, missing cells as `null`.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (header, cell) in self.headers.iter().zip(row) {
                    obj.insert(header.clone(), cell.to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }
}

/// Give a purely numeric column one number type.
///
/// A column holding only numbers and blanks is integer only when every cell is
/// a whole number and none is blank; otherwise all its numbers read as floats.
/// Columns mixing numbers with text or booleans keep each cell as read.
fn unify_numeric_column(rows: &mut [Vec<Cell>], column: usize) {
    let mut has_number = false;
    let mut needs_float = false;
    for row in rows.iter() {
        match &row[column] {
            Cell::Int(_) => has_number = true,
            Cell::Float(_) => {
                has_number = true;
                needs_float = true;
            }
            Cell::Missing => needs_float = true,
            Cell::Bool(_) | Cell::Text(_) => return,
        }
    }
    if !(has_number && needs_float) {
        return;
    }
    for row in rows.iter_mut() {
        if let Cell::Int(i) = row[column] {
            row[column] = Cell::Float(i as f64);
        }
    }
}

/// All sheets of a workbook, in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Sheet)>,
}

impl Workbook {
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Sheet)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Like [`Workbook::sheet`] but a missing sheet is an error.
    pub fn require_sheet(&self, name: &str) -> SchemaResult<&Sheet> {
        self.sheet(name)
            .ok_or_else(|| SchemaError::MissingSheet(name.to_string()))
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// Load every sheet of the workbook at `path`.
///
/// The format (xlsx, xlsm, xlsb, xls, ods) is picked from the file extension.
///
/// # Example
/// ```ignore
/// let workbook = load_workbook("site/assets.xlsx")?;
/// for (name, sheet) in workbook.sheets() {
///     println!("{}: {} rows", name, sheet.len());
/// }
/// ```
pub fn load_workbook<P: AsRef<Path>>(path: P) -> WorkbookResult<Workbook> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| WorkbookError::Sheet {
                sheet: name.clone(),
                source,
            })?;
        sheets.push((name, Sheet::from_range(&range)));
    }

    Ok(Workbook { sheets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn range(cells: &[&[Data]]) -> Range<Data> {
        range_at(0, cells)
    }

    /// Range whose first row (the header) sits at 0-based sheet row `top`.
    fn range_at(top: u32, cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((top, 0), (top + height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((top + r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_whole_floats_become_ints() {
        assert_eq!(Cell::from_data(&Data::Float(42.0)), Cell::Int(42));
        assert_eq!(Cell::from_data(&Data::Float(-3.0)), Cell::Int(-3));
        assert_eq!(Cell::from_data(&Data::Float(1.5)), Cell::Float(1.5));
        assert_eq!(Cell::from_data(&Data::Int(7)), Cell::Int(7));
    }

    #[test]
    fn test_missing_cells() {
        assert!(Cell::from_data(&Data::Empty).is_missing());
        assert!(Cell::from_data(&Data::Error(CellErrorType::NA)).is_missing());
        assert!(Cell::from_data(&Data::Float(f64::NAN)).is_missing());
        assert!(Cell::from_data(&text("")).is_missing());
        assert!(Cell::from_data(&text("N/A")).is_missing());
        assert!(Cell::from_data(&text("nan")).is_missing());
        // Markers match exactly, surrounding text is kept
        assert_eq!(Cell::from_data(&text("n/a yet")), Cell::Text("n/a yet".into()));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Cell::Int(12).to_string(), "12");
        assert_eq!(Cell::Float(0.25).to_string(), "0.25");
        assert_eq!(Cell::Float(3.0).to_string(), "3.0");
        assert_eq!(Cell::Bool(true).to_string(), "True");
        assert_eq!(Cell::Text("AHU-1".into()).to_string(), "AHU-1");
        assert_eq!(Cell::Missing.key_text(), "NaN");
        assert_eq!(Cell::Bool(false).key_text(), "false");
    }

    #[test]
    fn test_join_key_is_type_aware() {
        assert_ne!(Cell::Text("5".into()).join_key(), Cell::Int(5).join_key());
        assert_eq!(Cell::Int(5).join_key(), Cell::Int(5).join_key());
        assert_eq!(Cell::Float(5.0).join_key(), Cell::Int(5).join_key());
        assert_ne!(Cell::Float(5.5).join_key(), Cell::Int(5).join_key());
        assert_eq!(Cell::Missing.join_key(), None);
    }

    #[test]
    fn test_sheet_from_range() {
        let sheet = Sheet::from_range(&range(&[
            &[text("name"), text("count")],
            &[text("AHU-1"), Data::Float(3.0)],
            &[Data::Empty, Data::Empty],
            &[text("AHU-2"), Data::Empty],
        ]));

        assert_eq!(sheet.headers(), ["name", "count"]);
        // Blank line dropped
        assert_eq!(sheet.len(), 2);
        // A blank in a number column makes it a float column
        assert_eq!(sheet.rows()[0], vec![Cell::Text("AHU-1".into()), Cell::Float(3.0)]);
        assert_eq!(sheet.rows()[1], vec![Cell::Text("AHU-2".into()), Cell::Missing]);
    }

    #[test]
    fn test_row_numbers_survive_blank_lines() {
        let sheet = Sheet::from_range(&range(&[
            &[text("name")],
            &[text("AHU-1")],
            &[Data::Empty],
            &[text("AHU-3")],
        ]));

        let numbers: Vec<usize> = sheet.numbered_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 4]);
    }

    #[test]
    fn test_row_numbers_follow_range_start() {
        // Header on sheet row 3
        let sheet = Sheet::from_range(&range_at(2, &[&[text("name")], &[text("AHU-1")]]));

        let (number, cells) = sheet.numbered_rows().next().unwrap();
        assert_eq!(number, 4);
        assert_eq!(cells, [Cell::Text("AHU-1".into())]);
    }

    #[test]
    fn test_numeric_column_types() {
        let sheet = Sheet::from_range(&range(&[
            &[text("serial"), text("x"), text("tag")],
            &[Data::Float(12345.0), Data::Float(3.0), Data::Float(7.0)],
            &[Data::Float(678.0), Data::Float(1.5), text("T-9")],
        ]));

        let rows = sheet.rows();
        // All whole, no blanks: integers
        assert_eq!(rows[0][0], Cell::Int(12345));
        assert_eq!(rows[1][0], Cell::Int(678));
        // Any fraction: the whole column is float
        assert_eq!(rows[0][1], Cell::Float(3.0));
        assert_eq!(rows[1][1], Cell::Float(1.5));
        // Mixed with text: cells keep their own type
        assert_eq!(rows[0][2], Cell::Int(7));
        assert_eq!(rows[1][2], Cell::Text("T-9".into()));
    }

    #[test]
    fn test_new_numbers_rows_from_two() {
        let sheet = Sheet::new(
            vec!["name".into()],
            vec![vec![Cell::Text("a".into())], vec![Cell::Text("b".into())]],
        );
        let numbers: Vec<usize> = sheet.numbered_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_unnamed_header() {
        let sheet = Sheet::from_range(&range(&[
            &[text("a"), Data::Empty, text("c")],
            &[Data::Int(1), Data::Int(2), Data::Int(3)],
        ]));
        assert_eq!(sheet.headers(), ["a", "Unnamed: 1", "c"]);
        assert_eq!(sheet.column("c"), Some(2));
    }

    #[test]
    fn test_to_records() {
        let sheet = Sheet::new(
            vec!["name".into(), "units".into()],
            vec![vec![Cell::Text("temp".into()), Cell::Missing]],
        );
        let records = sheet.to_records();
        assert_eq!(records[0]["name"], "temp");
        assert_eq!(records[0]["units"], Value::Null);
    }

    #[test]
    fn test_require_sheet() {
        let workbook = Workbook::from_sheets([("Assets", Sheet::default())]);
        assert!(workbook.require_sheet("Assets").is_ok());
        let err = workbook.require_sheet("Asset Payload Types").unwrap_err();
        assert!(err.to_string().contains("Asset Payload Types"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_workbook("does/not/exist.xlsx");
        assert!(matches!(result, Err(WorkbookError::Open { .. })));
    }
}
