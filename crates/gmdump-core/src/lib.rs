pub mod ancestry;
pub mod category;
pub mod config;
pub mod database;
pub mod decompiler;
pub mod dump;
pub mod error;
pub mod export;
pub mod progress;

pub use ancestry::resolve_chain;
pub use config::{Config, DumpConfig, ExportConfig};
pub use database::{CodeEntry, GameDatabase, GameObject};
pub use decompiler::{
    check_decompiler, require_decompiler, CommandDecompiler, Decompile, DEFAULT_DECOMPILER,
};
pub use dump::{
    build_worklist, failure_stub, is_failure_stub, sanitize_code_name, BatchDumper, BatchReport,
    DumpOutcome, DumpResult, WorklistFilter, FAILURE_MARKER,
};
pub use error::{GmDumpError, Result};
pub use export::{CategoryData, ExportBuilder, ExportModel, EXPORT_SUBDIR, NO_PARENT};
pub use progress::{AtomicProgress, NullProgress, ProgressSink};

// Category system
pub use category::{
    classify, classify_index, rule_matches, BuiltinRule, CategoryRule, RuleStore, RulesConfig,
    BUILTIN_RULES,
};
