//! Highlight table loading.
//!
//! The table is CSV with a header row, UTF-8. Each data row becomes a
//! column-name -> raw-text map handed to the row parser; all typing and
//! validation happens there, not here.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// One unvalidated table row.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based data row number (header excluded), used in rejection reports.
    pub index: usize,
    /// Column name -> raw cell text.
    pub columns: HashMap<String, String>,
}

/// Load all rows from the table at `path`.
///
/// Any read or parse failure here is fatal: without a readable table the
/// run is meaningless.
pub fn load_table(path: &Path) -> PipelineResult<Vec<RawRow>> {
    let table_err = |source| PipelineError::TableRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(table_err)?;
    let headers = reader.headers().map_err(table_err)?.clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(table_err)?;
        let columns = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(RawRow {
            index: i + 1,
            columns,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_table() {
        let file = write_csv(
            "clip_id,title,start_time,duration\n\
             goal_01,Opening goal,00:05:30,12\n\
             save_02,Big save,330,8\n",
        );
        let rows = load_table(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].columns["clip_id"], "goal_01");
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].columns["duration"], "8");
    }

    #[test]
    fn test_quoted_cells() {
        let file = write_csv(
            "clip_id,title,tags\n\
             g1,\"Goal, then celebration\",\"goal, crowd\"\n",
        );
        let rows = load_table(file.path()).unwrap();
        assert_eq!(rows[0].columns["title"], "Goal, then celebration");
        assert_eq!(rows[0].columns["tags"], "goal, crowd");
    }

    #[test]
    fn test_empty_cells_survive_as_empty_strings() {
        let file = write_csv("clip_id,title,duration\ng1,,5\n");
        let rows = load_table(file.path()).unwrap();
        assert_eq!(rows[0].columns["title"], "");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_table(Path::new("/nonexistent/highlights.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::TableRead { .. }));
    }
}
