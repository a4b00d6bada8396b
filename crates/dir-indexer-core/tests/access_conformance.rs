//! One suite, two backends: every call is answered by the in-memory tree and
//! by the SQLite store built from the same scan, and the answers must match.

use chrono::{TimeZone, Utc};

use dir_indexer_core::access::{
    DataAccess, Entry, FileQuery, ListOptions, SortColumn, TreeAccess, SEARCH_RESULT_LIMIT,
};
use dir_indexer_core::analysis::build_tree;
use dir_indexer_core::model::{FileRecord, ScanResult, NO_EXTENSION};
use dir_indexer_core::storage::Database;
use dir_indexer_core::SilentReporter;

const COLUMNS: [SortColumn; 5] = [
    SortColumn::Name,
    SortColumn::Size,
    SortColumn::Extension,
    SortColumn::Modified,
    SortColumn::Created,
];

fn rec(path: &str, size: u64, modified_day: u32, created_day: u32) -> FileRecord {
    let modified = Utc.with_ymd_and_hms(2024, 4, modified_day, 9, 30, 0).unwrap();
    let created = Utc.with_ymd_and_hms(2023, 1, created_day, 18, 0, 0).unwrap();
    FileRecord::new(path, size, modified, created)
}

/// Mixed case, equal keys, files without extension, non-ASCII names and
/// folders first seen out of alphabetical order.
fn fixture_scan() -> ScanResult {
    ScanResult::from_records(
        "/data/archive",
        vec![
            rec("README", 7, 3, 1),
            rec("sub/b.txt", 20, 1, 2),
            rec("a.txt", 10, 2, 2),
            rec("sub/deep/c.log", 5, 1, 1),
            rec("Sub2/B.TXT", 20, 5, 3),
            rec("sub/Alpha.md", 20, 2, 4),
            rec("sub/deep/more/x.TXT", 1, 7, 1),
            rec("Zeta/notes.txt", 3, 2, 2),
            rec("sub/alpha.MD", 20, 2, 4),
            rec("archive.tar.gz", 20, 9, 9),
            rec("sub/data", 4, 4, 4),
            rec("photos/2023/img.JPG", 100, 6, 6),
            rec("photos/2023/img2.jpg", 100, 6, 6),
            rec("photos/2024/x.jpg", 50, 8, 7),
            rec("photos/readme.txt", 1, 1, 1),
            rec("sub/Été.txt", 9, 3, 3),
            rec("música/rock/tema.mp3", 300, 5, 5),
            rec("música/intro.mp3", 30, 5, 5),
            rec("sub/deep", 2, 1, 1),
            rec(".hidden/.env", 1, 1, 1),
        ],
    )
}

fn example_scan() -> ScanResult {
    ScanResult::from_records(
        "/tmp/root",
        vec![
            rec("a.txt", 10, 1, 1),
            rec("sub/b.txt", 20, 1, 1),
            rec("sub/deep/c.log", 5, 1, 1),
        ],
    )
}

fn relational(scan: &ScanResult) -> Database {
    let db = Database::open_in_memory().unwrap();
    db.load_scan(scan, 3, &SilentReporter).unwrap();
    db
}

fn folder_paths(scan: &ScanResult) -> Vec<String> {
    let tree = build_tree(&scan.root_path, &scan.files);
    let mut paths = Vec::new();
    tree.walk(&mut |node| paths.push(node.path.clone()));
    paths
}

fn names(items: &[Entry]) -> Vec<&str> {
    items.iter().map(|e| e.name()).collect()
}

#[test]
fn test_get_folder_agrees_for_every_folder() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    let paths = folder_paths(&scan);
    assert!(paths.contains(&"sub/deep/more".to_string()));
    assert!(paths.contains(&"música/rock".to_string()));

    for path in &paths {
        let expected = memory.get_folder(path).unwrap();
        let actual = db.get_folder(path).unwrap();
        assert!(expected.is_some(), "folder '{}' missing from tree", path);
        assert_eq!(expected, actual, "get_folder('{}')", path);
    }
}

#[test]
fn test_root_folder_matches_scan_totals() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let root = backend.get_folder("").unwrap().unwrap();
        assert_eq!(root.name, "archive");
        assert_eq!(root.path, "");
        assert_eq!(root.file_count, scan.files.len() as u64);
        assert_eq!(root.total_size, scan.total_size);
        assert_eq!(
            root.children,
            vec!["sub", "Sub2", "Zeta", "photos", "música", ".hidden"]
        );
        assert_eq!(backend.root_name().unwrap(), "archive");
    }
}

#[test]
fn test_list_entries_agrees_for_every_option() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    let searches = ["", "a", "TXT", "none", "deep", "zzz", "É"];
    let pages = [(100, 0), (3, 1), (2, 5)];

    for path in folder_paths(&scan) {
        for column in COLUMNS {
            for ascending in [true, false] {
                for folders_first in [true, false] {
                    for search in searches {
                        for (limit, offset) in pages {
                            let options = ListOptions {
                                sort: column,
                                ascending,
                                folders_first,
                                search: search.to_string(),
                                limit,
                                offset,
                            };
                            let expected = memory.list_entries(&path, &options).unwrap();
                            let actual = db.list_entries(&path, &options).unwrap();
                            assert_eq!(
                                expected, actual,
                                "list_entries('{}', {:?})",
                                path, options
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_search_global_agrees() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for query in ["a", "TXT", "deep", "sub", "img", "ú", "2023", ".", "nothing-here"] {
        let expected = memory.search_global(query).unwrap();
        let actual = db.search_global(query).unwrap();
        assert_eq!(expected, actual, "search_global('{}')", query);
    }
}

#[test]
fn test_search_global_groups_by_parent_with_folders_first() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let hits = backend.search_global("DEEP").unwrap();
        let summary: Vec<(&str, bool, &str)> = hits
            .iter()
            .map(|h| (h.parent.as_str(), h.entry.is_folder(), h.entry.name()))
            .collect();
        assert_eq!(
            summary,
            vec![("sub", true, "deep"), ("sub", false, "deep")]
        );
        match &hits[0].entry {
            Entry::Folder(folder) => {
                assert_eq!(folder.path, "sub/deep");
                assert_eq!((folder.file_count, folder.total_size), (2, 6));
            }
            Entry::File(_) => panic!("expected a folder hit first"),
        }
    }
}

#[test]
fn test_search_global_empty_query_has_no_hits() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    assert!(memory.search_global("").unwrap().is_empty());
    assert!(db.search_global("").unwrap().is_empty());
}

#[test]
fn test_search_global_is_capped() {
    let files: Vec<FileRecord> = (0..SEARCH_RESULT_LIMIT + 100)
        .map(|i| rec(&format!("bulk/f{:04}.dat", i), 1, 1, 1))
        .collect();
    let scan = ScanResult::from_records("/bulk-root", files);
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    let expected = memory.search_global("DAT").unwrap();
    let actual = db.search_global("DAT").unwrap();
    assert_eq!(expected.len(), SEARCH_RESULT_LIMIT);
    assert_eq!(expected, actual);
    assert_eq!(expected[0].entry.name(), "f0000.dat");
}

#[test]
fn test_list_entries_folders_first_scenario() {
    let scan = example_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let options = ListOptions::default();

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_entries("sub", &options).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(names(&page.items), vec!["deep", "b.txt"]);
        assert!(page.items[0].is_folder());
        assert_eq!(page.items[0].size(), 5);

        let folder = backend.get_folder("sub").unwrap().unwrap();
        assert_eq!((folder.file_count, folder.total_size), (2, 25));
        assert_eq!(folder.children, vec!["deep"]);
    }
}

#[test]
fn test_list_entries_mixed_sort_interleaves_kinds() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let options = ListOptions {
        folders_first: false,
        ..ListOptions::default()
    };

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_entries("sub", &options).unwrap();
        // "Alpha.md" and "alpha.MD" tie on the folded name and keep scan
        // order; the folder "deep" wins its tie against the file "deep".
        assert_eq!(
            names(&page.items),
            vec!["Alpha.md", "alpha.MD", "b.txt", "data", "deep", "deep", "Été.txt"]
        );
        assert!(page.items[4].is_folder());
        assert!(!page.items[5].is_folder());
    }
}

#[test]
fn test_list_entries_size_descending_uses_folder_totals() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let options = ListOptions {
        sort: SortColumn::Size,
        ascending: false,
        folders_first: false,
        ..ListOptions::default()
    };

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_entries("", &options).unwrap();
        let top: Vec<(&str, u64)> = page.items.iter().take(3).map(|e| (e.name(), e.size())).collect();
        assert_eq!(top, vec![("música", 330), ("photos", 251), ("sub", 81)]);
    }
}

#[test]
fn test_list_entries_filter_matches_extension_and_counts_before_paging() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let options = ListOptions {
        search: "NONE".to_string(),
        limit: 1,
        ..ListOptions::default()
    };

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_entries("sub", &options).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(names(&page.items), vec!["data"]);
    }
}

#[test]
fn test_list_files_agrees_for_every_option() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    let searches = ["", "SUB", "photos/20", "txt", "é", "zzz"];
    let extensions = [None, Some(".txt"), Some(".TXT"), Some(NO_EXTENSION), Some(".nope")];
    let pages = [(100, 0), (3, 2), (1, 19)];

    for column in COLUMNS {
        for ascending in [true, false] {
            for search in searches {
                for extension in extensions {
                    for (limit, offset) in pages {
                        let query = FileQuery {
                            sort: column,
                            ascending,
                            search: search.to_string(),
                            extension: extension.map(str::to_string),
                            limit,
                            offset,
                        };
                        let expected = memory.list_files(&query).unwrap();
                        let actual = db.list_files(&query).unwrap();
                        assert_eq!(expected, actual, "list_files({:?})", query);
                    }
                }
            }
        }
    }
}

#[test]
fn test_list_files_spans_every_folder() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_files(&FileQuery::default()).unwrap();
        assert_eq!(page.total, scan.files.len());
        assert_eq!(page.items.len(), scan.files.len());
        assert_eq!(page.items[0].relative_path, ".hidden/.env");
    }
}

#[test]
fn test_list_files_extension_filter_with_size_ties_in_scan_order() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let query = FileQuery {
        sort: SortColumn::Size,
        ascending: false,
        extension: Some(".jpg".to_string()),
        ..FileQuery::default()
    };

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_files(&query).unwrap();
        let paths: Vec<&str> = page.items.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["photos/2023/img.JPG", "photos/2023/img2.jpg", "photos/2024/x.jpg"]
        );
        assert_eq!(page.total, 3);
    }
}

#[test]
fn test_list_files_search_matches_directory_and_pages_after_counting() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);
    let query = FileQuery {
        search: "DEEP".to_string(),
        limit: 2,
        offset: 1,
        ..FileQuery::default()
    };

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let page = backend.list_files(&query).unwrap();
        // c.log and x.TXT match on their directory, the file "deep" on its name.
        assert_eq!(page.total, 3);
        let names: Vec<&str> = page.items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["deep", "x.TXT"]);
    }
}

#[test]
fn test_unknown_paths_are_empty_not_errors() {
    let scan = fixture_scan();
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        for path in ["nope", "sub/", "sub/b.txt", "su", "sub/deep/more/x.TXT", "/sub"] {
            assert!(backend.get_folder(path).unwrap().is_none(), "get_folder('{}')", path);
            let page = backend.list_entries(path, &ListOptions::default()).unwrap();
            assert_eq!(page.total, 0, "list_entries('{}')", path);
            assert!(page.items.is_empty());
        }
    }
}

#[test]
fn test_empty_scan_has_an_empty_root() {
    let scan = ScanResult::from_records("/empty", Vec::new());
    let tree = build_tree(&scan.root_path, &scan.files);
    let memory = TreeAccess::new(&tree, &scan.files);
    let db = relational(&scan);

    for backend in [&memory as &dyn DataAccess, &db as &dyn DataAccess] {
        let root = backend.get_folder("").unwrap().unwrap();
        assert_eq!((root.file_count, root.total_size), (0, 0));
        assert!(root.children.is_empty());
        assert_eq!(backend.list_entries("", &ListOptions::default()).unwrap().total, 0);
        assert_eq!(backend.list_files(&FileQuery::default()).unwrap(), Default::default());
    }
}
