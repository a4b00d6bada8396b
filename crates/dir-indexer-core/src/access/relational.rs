use super::sort::fold_case;
use super::{
    join_path, DataAccess, Entry, EntryPage, FilePage, FileQuery, FolderEntry, FolderSummary,
    ListOptions, SearchHit, SEARCH_RESULT_LIMIT,
};
use crate::error::Error;
use crate::model::root_display_name;
use crate::storage::{file_from_row, Database, FILE_COLUMNS};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};

// The store has no folder rows. A folder `p` is every `directory` equal to
// `p` or starting with `p/`, and its direct subfolders are the first segment
// of whatever follows `p/`. The prefix test is a half-open range so the
// directory index serves it: '0' is the character after '/'.

/// `WHERE` clause selecting every file strictly below `path`, the 1-based
/// character position where the remainder after `path/` starts, and the
/// clause parameters.
fn below(path: &str) -> (&'static str, usize, Vec<Value>) {
    if path.is_empty() {
        ("directory <> ''", 1, Vec::new())
    } else {
        (
            "directory >= ? AND directory < ?",
            path.chars().count() + 2,
            vec![
                Value::Text(format!("{}/", path)),
                Value::Text(format!("{}0", path)),
            ],
        )
    }
}

/// CTE naming the direct subfolders of `path` with their recursive totals.
/// `ord` is the lowest file id beneath the folder, i.e. the scan position at
/// which the folder was first seen.
fn child_folders_cte(path: &str) -> (String, Vec<Value>) {
    let (scope, start, params) = below(path);
    let sql = format!(
        "child_folders AS ( \
           SELECT CASE WHEN instr(rest, '/') > 0 \
                       THEN substr(rest, 1, instr(rest, '/') - 1) \
                       ELSE rest END AS name, \
                  COUNT(*) AS file_count, \
                  SUM(size_bytes) AS total_size, \
                  MIN(id) AS ord \
           FROM (SELECT id, size_bytes, substr(directory, {}) AS rest \
                 FROM files WHERE {}) \
           GROUP BY 1)",
        start, scope
    );
    (sql, params)
}

/// `WITH` prefix defining `entries`: the direct subfolders and files of
/// `path` with a shared column layout, filtered by `needle` when non-empty.
///
/// Columns: kind, name, relative_path, directory, size, extension, modified,
/// created, file_count, ord. Columns 1..=7 line up with `file_from_row`.
fn entries_cte(path: &str, needle: &str) -> (String, Vec<Value>) {
    let (folders, mut params) = child_folders_cte(path);
    let mut sql = format!(
        "WITH {}, entries AS ( \
           SELECT 0 AS kind, name, NULL AS relative_path, NULL AS directory, \
                  total_size AS size, NULL AS extension, NULL AS modified, \
                  NULL AS created, file_count, ord \
           FROM child_folders",
        folders
    );
    if !needle.is_empty() {
        sql.push_str(" WHERE instr(lower(name), ?) > 0");
        params.push(Value::Text(needle.to_string()));
    }
    sql.push_str(
        " UNION ALL \
         SELECT 1, name, relative_path, directory, size_bytes, extension, \
                modified, created, NULL, id \
         FROM files WHERE directory = ?",
    );
    params.push(Value::Text(path.to_string()));
    if !needle.is_empty() {
        sql.push_str(" AND (instr(lower(name), ?) > 0 OR instr(lower(extension), ?) > 0)");
        params.push(Value::Text(needle.to_string()));
        params.push(Value::Text(needle.to_string()));
    }
    sql.push_str(") ");
    (sql, params)
}

enum RawHit {
    Folder(String),
    File(crate::model::FileRecord),
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn entry_from_row(row: &Row<'_>, parent: &str) -> rusqlite::Result<Entry> {
    let kind: i64 = row.get(0)?;
    if kind == 0 {
        let name: String = row.get(1)?;
        Ok(Entry::Folder(FolderEntry {
            path: join_path(parent, &name),
            name,
            file_count: row.get::<_, i64>(8)? as u64,
            total_size: row.get::<_, i64>(4)? as u64,
        }))
    } else {
        Ok(Entry::File(file_from_row(row, 1)?))
    }
}

impl Database {
    /// Recursive file count and size of `path`, or `None` when no file lives
    /// at or below it. The root always has totals.
    fn folder_totals(&self, path: &str) -> Result<Option<(u64, u64)>, Error> {
        let mut sql = String::from("SELECT COUNT(*), COALESCE(SUM(size_bytes), 0) FROM files");
        let mut params = Vec::new();
        if !path.is_empty() {
            let (scope, _, below_params) = below(path);
            sql.push_str(&format!(" WHERE directory = ? OR ({})", scope));
            params.push(Value::Text(path.to_string()));
            params.extend(below_params);
        }
        let (count, size): (i64, i64) =
            self.connection()
                .query_row(&sql, params_from_iter(params), |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
        if count == 0 && !path.is_empty() {
            return Ok(None);
        }
        Ok(Some((count as u64, size as u64)))
    }

    fn child_folder_names(&self, path: &str) -> Result<Vec<String>, Error> {
        let (cte, params) = child_folders_cte(path);
        let sql = format!("WITH {} SELECT name FROM child_folders ORDER BY ord", cte);
        let mut stmt = self.connection().prepare(&sql)?;
        let names = stmt
            .query_map(params_from_iter(params), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

impl DataAccess for Database {
    fn root_name(&self) -> Result<String, Error> {
        let root = self
            .metadata_value("root_path")?
            .ok_or_else(|| Error::Other("metadata key 'root_path' missing from store".into()))?;
        Ok(root_display_name(&root))
    }

    fn get_folder(&self, path: &str) -> Result<Option<FolderSummary>, Error> {
        let (file_count, total_size) = match self.folder_totals(path)? {
            Some(totals) => totals,
            None => return Ok(None),
        };
        let name = if path.is_empty() {
            self.root_name()?
        } else {
            last_segment(path).to_string()
        };
        Ok(Some(FolderSummary {
            name,
            path: path.to_string(),
            file_count,
            total_size,
            children: self.child_folder_names(path)?,
        }))
    }

    fn list_entries(&self, path: &str, options: &ListOptions) -> Result<EntryPage, Error> {
        let needle = fold_case(&options.search);
        let (cte, params) = entries_cte(path, &needle);

        let total: i64 = self.connection().query_row(
            &format!("{} SELECT COUNT(*) FROM entries", cte),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let direction = if options.ascending { "ASC" } else { "DESC" };
        let column = options.sort.sql_expr();
        let order = if options.folders_first {
            format!("kind, {} {}, ord", column, direction)
        } else {
            format!("{} {}, kind, ord", column, direction)
        };
        let sql = format!(
            "{} SELECT * FROM entries ORDER BY {} LIMIT ? OFFSET ?",
            cte, order
        );
        let mut page_params = params;
        page_params.push(Value::Integer(sql_count(options.limit)));
        page_params.push(Value::Integer(sql_count(options.offset)));

        let mut stmt = self.connection().prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(page_params), |row| entry_from_row(row, path))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(EntryPage {
            items,
            total: total as usize,
        })
    }

    fn search_global(&self, query: &str) -> Result<Vec<SearchHit>, Error> {
        let needle = fold_case(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        // Every folder path is rebuilt from the distinct directories one
        // segment at a time.
        let sql = "WITH RECURSIVE folders(parent, path, name, rest) AS ( \
               SELECT DISTINCT '', '', '', directory || '/' FROM files WHERE directory <> '' \
               UNION \
               SELECT path, \
                      CASE WHEN path = '' THEN '' ELSE path || '/' END \
                        || substr(rest, 1, instr(rest, '/') - 1), \
                      substr(rest, 1, instr(rest, '/') - 1), \
                      substr(rest, instr(rest, '/') + 1) \
               FROM folders WHERE rest <> ''), \
             hits AS ( \
               SELECT DISTINCT parent, 0 AS kind, name, NULL AS relative_path, \
                      NULL AS directory, NULL AS size, NULL AS extension, \
                      NULL AS modified, NULL AS created, path \
               FROM folders WHERE path <> '' AND instr(lower(name), ?1) > 0 \
               UNION ALL \
               SELECT directory, 1, name, relative_path, directory, size_bytes, \
                      extension, modified, created, NULL \
               FROM files WHERE instr(lower(name), ?1) > 0) \
             SELECT * FROM hits ORDER BY parent, kind, lower(name), name LIMIT ?2";

        let mut stmt = self.connection().prepare(sql)?;
        let rows = stmt
            .query_map(
                rusqlite::params![needle, sql_count(SEARCH_RESULT_LIMIT)],
                |row| {
                    let parent: String = row.get(0)?;
                    let kind: i64 = row.get(1)?;
                    let hit = if kind == 0 {
                        RawHit::Folder(row.get(9)?)
                    } else {
                        RawHit::File(file_from_row(row, 2)?)
                    };
                    Ok((parent, hit))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut hits = Vec::with_capacity(rows.len());
        for (parent, hit) in rows {
            let entry = match hit {
                RawHit::File(file) => Entry::File(file),
                RawHit::Folder(path) => {
                    let (file_count, total_size) =
                        self.folder_totals(&path)?.unwrap_or_default();
                    Entry::Folder(FolderEntry {
                        name: last_segment(&path).to_string(),
                        path,
                        file_count,
                        total_size,
                    })
                }
            };
            hits.push(SearchHit { parent, entry });
        }
        Ok(hits)
    }

    fn list_files(&self, query: &FileQuery) -> Result<FilePage, Error> {
        let needle = fold_case(&query.search);
        let mut clause = String::from(" WHERE 1=1");
        let mut params = Vec::new();
        if !needle.is_empty() {
            clause.push_str(" AND (instr(lower(name), ?) > 0 OR instr(lower(directory), ?) > 0)");
            params.push(Value::Text(needle.clone()));
            params.push(Value::Text(needle));
        }
        if let Some(extension) = &query.extension {
            clause.push_str(" AND extension = ?");
            params.push(Value::Text(fold_case(extension)));
        }

        let total: i64 = self.connection().query_row(
            &format!("SELECT COUNT(*) FROM files{}", clause),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let direction = if query.ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "SELECT {} FROM files{} ORDER BY {} {}, id LIMIT ? OFFSET ?",
            FILE_COLUMNS,
            clause,
            query.sort.file_sql_expr(),
            direction
        );
        params.push(Value::Integer(sql_count(query.limit)));
        params.push(Value::Integer(sql_count(query.offset)));

        let mut stmt = self.connection().prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(params), |row| file_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(FilePage {
            items,
            total: total as usize,
        })
    }
}
