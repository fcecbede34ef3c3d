//! Batch Code Dump
//!
//! Fans the decompiler out over eligible code entries with rayon, writing
//! one artifact per entry. A failing entry gets a failure stub in place of
//! its code and never stops the batch; progress advances exactly once per
//! entry either way.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;

use crate::database::{CodeEntry, GameDatabase};
use crate::decompiler::Decompile;
use crate::error::Result;
use crate::export::EXPORT_SUBDIR;
use crate::progress::ProgressSink;

/// Marker opening every failure stub
pub const FAILURE_MARKER: &str = "DECOMPILER FAILED!";

// Literal substrings stripped from code entry names to form file names.
// Not collision-free; colliding names become DuplicateName outcomes.
const NAME_STRIP: &[&str] = &[
    "gml_Object_",
    "gml_Script_",
    "gml_GlobalScript_",
    "_Create_0",
];

/// Derive the output file stem for a code entry name
pub fn sanitize_code_name(name: &str) -> String {
    let mut out = name.to_string();
    for pattern in NAME_STRIP {
        out = out.replace(pattern, "");
    }
    out
}

/// The artifact written in place of the code when the decompiler fails
pub fn failure_stub(detail: &str) -> String {
    format!("/*\n{}\n\n{}\n*/\n", FAILURE_MARKER, detail)
}

/// True when artifact text is a failure stub rather than decompiled code
pub fn is_failure_stub(text: &str) -> bool {
    text.trim_start()
        .strip_prefix("/*")
        .map(|rest| rest.trim_start().starts_with(FAILURE_MARKER))
        .unwrap_or(false)
}

/// Glob filters applied to code entry names when building the worklist
#[derive(Debug, Clone, Default)]
pub struct WorklistFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl WorklistFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = include
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let exclude = exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { include, exclude })
    }

    fn accepts(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(name)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(name))
    }
}

/// Entries eligible for independent dumping.
///
/// Sub-entries (those naming a parent entry) are skipped; they are
/// reachable through their owner's artifact.
pub fn build_worklist<'a>(db: &'a GameDatabase, filter: &WorklistFilter) -> Vec<&'a CodeEntry> {
    db.code
        .iter()
        .filter(|e| e.parent_entry.is_none())
        .filter(|e| filter.accepts(&e.name))
        .collect()
}

/// Per-entry result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum DumpOutcome {
    /// Artifact written
    Written,
    /// Decompiler failed; a failure stub was written instead
    Failed(String),
    /// Sanitized name already claimed by an earlier entry; nothing written
    DuplicateName,
    /// The artifact could not be written
    WriteError(String),
}

#[derive(Debug, Clone)]
pub struct DumpResult {
    pub entry_name: String,
    pub file_name: String,
    pub outcome: DumpOutcome,
}

/// Aggregate counts plus the per-entry results, in worklist order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub write_errors: usize,
    pub results: Vec<DumpResult>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Runs the dump phase against one output directory
pub struct BatchDumper {
    out_dir: PathBuf,
}

impl BatchDumper {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Dump every worklist entry, unordered, N-way parallel.
    ///
    /// The output directory is created once, up front. File names are
    /// claimed before dispatch so a colliding sanitized name is surfaced
    /// as `DuplicateName` instead of silently overwriting. Per-entry
    /// failures are captured in the written artifact and the report; they
    /// never cancel sibling entries, and there are no retries.
    pub fn run(
        &self,
        worklist: &[&CodeEntry],
        decompiler: &dyn Decompile,
        progress: &dyn ProgressSink,
    ) -> Result<BatchReport> {
        let code_dir = self.out_dir.join(EXPORT_SUBDIR);
        fs::create_dir_all(&code_dir)?;

        progress.set_total(worklist.len());

        let mut claimed = HashSet::new();
        let jobs: Vec<(&CodeEntry, String, bool)> = worklist
            .iter()
            .map(|entry| {
                let file_name = format!("{}.gml", sanitize_code_name(&entry.name));
                let duplicate = !claimed.insert(file_name.clone());
                (*entry, file_name, duplicate)
            })
            .collect();

        let results: Vec<DumpResult> = jobs
            .par_iter()
            .map(|(entry, file_name, duplicate)| {
                let outcome = if *duplicate {
                    DumpOutcome::DuplicateName
                } else {
                    dump_one(entry, &code_dir.join(file_name), decompiler)
                };
                progress.inc();
                DumpResult {
                    entry_name: entry.name.clone(),
                    file_name: file_name.clone(),
                    outcome,
                }
            })
            .collect();

        progress.finish();

        let mut report = BatchReport {
            results,
            ..Default::default()
        };
        for result in &report.results {
            match result.outcome {
                DumpOutcome::Written => report.written += 1,
                DumpOutcome::Failed(_) => report.failed += 1,
                DumpOutcome::DuplicateName => report.duplicates += 1,
                DumpOutcome::WriteError(_) => report.write_errors += 1,
            }
        }

        Ok(report)
    }
}

fn dump_one(entry: &CodeEntry, path: &Path, decompiler: &dyn Decompile) -> DumpOutcome {
    let (text, outcome) = match decompiler.decompile(entry) {
        Ok(text) => (text, DumpOutcome::Written),
        Err(e) => {
            let detail = e.to_string();
            (failure_stub(&detail), DumpOutcome::Failed(detail))
        }
    };

    match fs::write(path, text) {
        Ok(()) => outcome,
        Err(e) => DumpOutcome::WriteError(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GmDumpError;
    use crate::progress::{AtomicProgress, NullProgress};
    use std::collections::HashMap;

    struct FakeDecompiler {
        fail_names: Vec<String>,
    }

    impl FakeDecompiler {
        fn new(fail_names: &[&str]) -> Self {
            Self {
                fail_names: fail_names.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Decompile for FakeDecompiler {
        fn decompile(&self, entry: &CodeEntry) -> Result<String> {
            if self.fail_names.contains(&entry.name) {
                return Err(GmDumpError::DecompilerFailed {
                    message: format!("no code for {}", entry.name),
                });
            }
            Ok(format!("// decompiled {}\n", entry.name))
        }
    }

    fn entry(name: &str) -> CodeEntry {
        CodeEntry {
            name: name.to_string(),
            parent_entry: None,
        }
    }

    fn sub_entry(name: &str, owner: &str) -> CodeEntry {
        CodeEntry {
            name: name.to_string(),
            parent_entry: Some(owner.to_string()),
        }
    }

    #[test]
    fn test_sanitize_strips_decoration() {
        assert_eq!(
            sanitize_code_name("gml_Object_oItemSword_Create_0"),
            "oItemSword"
        );
        assert_eq!(sanitize_code_name("gml_Script_scrGlobalVars"), "scrGlobalVars");
        assert_eq!(
            sanitize_code_name("gml_GlobalScript_scrLocalization"),
            "scrLocalization"
        );
        assert_eq!(sanitize_code_name("plainName"), "plainName");
    }

    #[test]
    fn test_failure_stub_is_detectable() {
        let stub = failure_stub("boom");
        assert!(stub.starts_with("/*\nDECOMPILER FAILED!"));
        assert!(is_failure_stub(&stub));
        assert!(!is_failure_stub("// decompiled code\n"));
        assert!(!is_failure_stub("/* just a comment */"));
    }

    #[test]
    fn test_worklist_skips_sub_entries() {
        let db = GameDatabase::from_parts(
            Vec::new(),
            vec![
                entry("gml_Object_oItem_Create_0"),
                sub_entry("gml_Script_helper", "gml_Script_main"),
                entry("gml_Script_main"),
            ],
            HashMap::new(),
        );
        let worklist = build_worklist(&db, &WorklistFilter::default());
        let names: Vec<&str> = worklist.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["gml_Object_oItem_Create_0", "gml_Script_main"]);
    }

    #[test]
    fn test_worklist_filters() {
        let db = GameDatabase::from_parts(
            Vec::new(),
            vec![
                entry("gml_Object_oItem_Create_0"),
                entry("gml_Script_scrDebug"),
                entry("gml_Script_scrMain"),
            ],
            HashMap::new(),
        );

        let filter =
            WorklistFilter::new(&["gml_Script_*".to_string()], &["*Debug*".to_string()]).unwrap();
        let worklist = build_worklist(&db, &filter);
        let names: Vec<&str> = worklist.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["gml_Script_scrMain"]);
    }

    #[test]
    fn test_invalid_filter_pattern() {
        let err = WorklistFilter::new(&["[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, GmDumpError::Pattern(_)));
    }

    #[test]
    fn test_batch_writes_one_file_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            entry("gml_Object_oAlpha_Create_0"),
            entry("gml_Object_oBeta_Create_0"),
            entry("gml_Object_oGamma_Create_0"),
        ];
        let worklist: Vec<&CodeEntry> = entries.iter().collect();

        let decompiler = FakeDecompiler::new(&["gml_Object_oBeta_Create_0"]);
        let progress = AtomicProgress::new();
        let report = BatchDumper::new(dir.path())
            .run(&worklist, &decompiler, &progress)
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(progress.snapshot(), (3, 3));
        assert!(progress.is_finished());

        let code_dir = dir.path().join("gml_code");
        let alpha = std::fs::read_to_string(code_dir.join("oAlpha.gml")).unwrap();
        let beta = std::fs::read_to_string(code_dir.join("oBeta.gml")).unwrap();
        let gamma = std::fs::read_to_string(code_dir.join("oGamma.gml")).unwrap();

        assert!(!is_failure_stub(&alpha));
        assert!(is_failure_stub(&beta));
        assert!(beta.contains("no code for gml_Object_oBeta_Create_0"));
        assert!(!is_failure_stub(&gamma));

        assert_eq!(std::fs::read_dir(&code_dir).unwrap().count(), 3);
    }

    #[test]
    fn test_failure_count_matches_made_to_fail() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<CodeEntry> = (0..20)
            .map(|i| entry(&format!("gml_Script_scr{:02}", i)))
            .collect();
        let worklist: Vec<&CodeEntry> = entries.iter().collect();

        let decompiler =
            FakeDecompiler::new(&["gml_Script_scr03", "gml_Script_scr11", "gml_Script_scr19"]);
        let progress = AtomicProgress::new();
        let report = BatchDumper::new(dir.path())
            .run(&worklist, &decompiler, &progress)
            .unwrap();

        assert_eq!(report.written, 17);
        assert_eq!(report.failed, 3);
        assert_eq!(progress.snapshot(), (20, 20));

        let code_dir = dir.path().join("gml_code");
        let stubs = std::fs::read_dir(&code_dir)
            .unwrap()
            .filter(|e| {
                let path = e.as_ref().unwrap().path();
                is_failure_stub(&std::fs::read_to_string(path).unwrap())
            })
            .count();
        assert_eq!(stubs, 3);
    }

    #[test]
    fn test_duplicate_sanitized_name_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        // Both sanitize to "oItem.gml"
        let entries = vec![
            entry("gml_Object_oItem_Create_0"),
            entry("gml_Script_oItem"),
        ];
        let worklist: Vec<&CodeEntry> = entries.iter().collect();

        let decompiler = FakeDecompiler::new(&[]);
        let report = BatchDumper::new(dir.path())
            .run(&worklist, &decompiler, &NullProgress)
            .unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(
            report.results[1].outcome,
            DumpOutcome::DuplicateName
        );

        let content =
            std::fs::read_to_string(dir.path().join("gml_code").join("oItem.gml")).unwrap();
        assert!(content.contains("gml_Object_oItem_Create_0"));
    }

    #[test]
    fn test_empty_worklist() {
        let dir = tempfile::tempdir().unwrap();
        let decompiler = FakeDecompiler::new(&[]);
        let progress = AtomicProgress::new();
        let report = BatchDumper::new(dir.path())
            .run(&[], &decompiler, &progress)
            .unwrap();

        assert_eq!(report.total(), 0);
        assert_eq!(progress.snapshot(), (0, 0));
        assert!(progress.is_finished());
        assert!(dir.path().join("gml_code").is_dir());
    }
}
