//! Header-indexed reader for the flat comma-separated tables the face
//! extractor and the manual labelling sheet produce. No quoted delimiters.

use crate::error::CongruenceError;

#[derive(Debug, Clone)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    /// 1-based line number in the source text.
    pub line: usize,
    cells: Vec<String>,
}

impl Table {
    pub(crate) fn parse(contents: &str, context: &'static str) -> Result<Self, CongruenceError> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_start_matches('\u{feff}').trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(CongruenceError::parse(context, 1, "missing header row"));
        };
        let headers = split_cells(header_line)
            .into_iter()
            .map(|cell| cell.to_ascii_lowercase())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (line, text) in lines {
            let mut cells = split_cells(text);
            if cells.len() > headers.len() {
                return Err(CongruenceError::parse(
                    context,
                    line,
                    format!(
                        "expected at most {} columns, found {}",
                        headers.len(),
                        cells.len()
                    ),
                ));
            }
            cells.resize(headers.len(), String::new());
            rows.push(Row { line, cells });
        }
        Ok(Self { headers, rows })
    }

    /// Index of the first header matching any of `names`.
    pub(crate) fn column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|header| header == name))
    }

    pub(crate) fn require_column(
        &self,
        names: &[&str],
        context: &'static str,
    ) -> Result<usize, CongruenceError> {
        self.column(names).ok_or_else(|| {
            CongruenceError::parse(
                context,
                1,
                format!("missing required column '{}'", names.join("' or '")),
            )
        })
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl Row {
    pub(crate) fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn parse_f64(
        &self,
        column: usize,
        field: &str,
        context: &'static str,
    ) -> Result<f64, CongruenceError> {
        let raw = self.cell(column);
        raw.parse::<f64>().map_err(|err| {
            CongruenceError::parse(context, self.line, format!("invalid {field} '{raw}': {err}"))
        })
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| strip_quotes(cell.trim()).to_string())
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}
