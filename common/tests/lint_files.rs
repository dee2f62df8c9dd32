//! File-level linting scenarios run against throwaway translation files.

use std::fs;

use camino::Utf8PathBuf;
use langpack_common::{DefectKind, FormatParser, IniParser, scan_file};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _root: TempDir,
    dir: Utf8PathBuf,
}

impl Workspace {
    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, contents).unwrap_or_else(|error| panic!("write {path}: {error}"));
        path
    }
}

#[fixture]
fn workspace() -> Workspace {
    let root = TempDir::new().unwrap_or_else(|error| panic!("tempdir: {error}"));
    let dir = Utf8PathBuf::from_path_buf(root.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non UTF-8 temp path {}", path.display()));
    Workspace { _root: root, dir }
}

#[rstest]
fn clean_files_score_zero(workspace: Workspace) {
    let path = workspace.write(
        "good.ini",
        "; Good file\n[strings]\nFOO=\"Bar\"\nQUOTED=\"say \\\"hi\\\"\"\n",
    );

    assert_eq!(scan_file(&path).defect_count(), 0);
}

#[rstest]
fn broken_quoting_scores_per_line(workspace: Workspace) {
    let path = workspace.write(
        "bad.ini",
        "FOO=\"Bar\nPATH=\"C:\\temp\\\"\nOK=\"fine\"\n",
    );

    let report = scan_file(&path);

    assert_eq!(report.defect_count(), 2);
    assert!(report.has(DefectKind::UnbalancedQuote));
    assert!(report.has(DefectKind::TrailingBackslash));
}

#[rstest]
fn linting_is_independent_of_merging(workspace: Workspace) {
    // Parses cleanly, yet the duplicate and the lone `%` are still flagged.
    let path = workspace.write("odd.ini", "RATE=\"50% off\"\nRATE=\"half price\"\n");

    let outcome = IniParser::new().parse_file(&path);
    let report = scan_file(&path);

    assert!(outcome.is_clean());
    assert_eq!(report.defect_count(), 2);
    assert!(report.has(DefectKind::OddPercent));
    assert!(report.has(DefectKind::DuplicateKey));
}

#[rstest]
fn one_invalid_byte_makes_the_whole_file_unreadable(workspace: Workspace) {
    let path = workspace.write("latin.ini", b"GOOD=\"fine\"\nCAFE=\"caf\xe9\"\n");

    let outcome = IniParser::new().parse_file(&path);

    assert!(outcome.is_unreadable());
    assert!(outcome.entries().is_empty());
    assert!(scan_file(&path).has(DefectKind::Unreadable));
}
