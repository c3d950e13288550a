use std::fmt::Display;
use std::path::Path;

use tokio::fs;

use crate::Result;

pub const SEPARATOR: char = '\t';

/// A row type with a fixed column order.
pub trait TsvRecord {
    const HEADERS: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;
}

/// Missing values render as empty cells.
pub fn opt_cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Floats always keep a fractional part (`7.0`, `0.7`).
pub fn float_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn push_row<S: AsRef<str>>(out: &mut String, row: &[S]) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Renders the header row followed by one line per record.
pub fn to_tsv_string<R: TsvRecord>(records: &[R]) -> String {
    let mut out = String::new();
    push_row(&mut out, R::HEADERS);
    for record in records {
        push_row(&mut out, &record.to_row());
    }
    out
}

/// Writes the records to `path`, creating parent directories.
pub async fn write_tsv<R: TsvRecord>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, to_tsv_string(records)).await?;
    Ok(())
}
