use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use gmdump_core::config::Config;
use gmdump_core::dump::{build_worklist, BatchDumper, BatchReport, DumpOutcome, WorklistFilter};
use gmdump_core::progress::{AtomicProgress, NullProgress, ProgressSink};
use gmdump_core::{
    require_decompiler, CommandDecompiler, ExportBuilder, GameDatabase, GmDumpError, Result,
    RuleStore,
};

mod args;
use args::{Cli, Commands, CommonOpts, ConfigAction, DumpOpts, ExportOpts, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Export { common, export }) => {
            handle_export(&base_dir, &common, &export, cli.verbose, cli.quiet)
        }
        Some(Commands::Dump { common, dump }) => {
            handle_dump(&base_dir, &common, &dump, cli.verbose, cli.quiet)
        }
        Some(Commands::Run {
            common,
            export,
            dump,
        }) => handle_run(&base_dir, &common, &export, &dump, cli.verbose, cli.quiet),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "gmdump", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("GMDUMP_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".gmdump"))
        .unwrap_or_else(|| PathBuf::from(".gmdump"))
}

/// Resolve the output directory, prompting with a folder picker when the
/// flag is absent. Cancelling the picker aborts the whole run.
fn resolve_out_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }

    #[cfg(feature = "dialog")]
    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
        return Ok(dir);
    }

    Err(GmDumpError::OutputCancelled)
}

fn load_rules(base_dir: &Path, flag: Option<&Path>) -> Result<RuleStore> {
    if let Some(path) = flag {
        return RuleStore::from_toml_file(path);
    }

    let config = Config::load(base_dir)?;
    if config.export.rules.is_empty() {
        Ok(RuleStore::builtin())
    } else {
        RuleStore::from_toml_file(Path::new(&config.export.rules))
    }
}

/// Dump options merged from config file and CLI flags.
/// Priority: CLI options > config file > defaults
fn build_dump_options(base_dir: &Path, dump: &DumpOpts) -> Result<(String, usize, WorklistFilter)> {
    let config = Config::load(base_dir)?;

    let decompiler = dump
        .decompiler
        .clone()
        .unwrap_or(config.dump.decompiler);
    let jobs = dump.jobs.unwrap_or(config.dump.jobs);

    let mut include = config.dump.include;
    for pattern in &dump.include {
        if !include.contains(pattern) {
            include.push(pattern.clone());
        }
    }
    let mut exclude = config.dump.exclude;
    for pattern in &dump.exclude {
        if !exclude.contains(pattern) {
            exclude.push(pattern.clone());
        }
    }

    let filter = WorklistFilter::new(&include, &exclude)?;
    Ok((decompiler, jobs, filter))
}

fn handle_export(
    base_dir: &Path,
    common: &CommonOpts,
    export: &ExportOpts,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let out_dir = resolve_out_dir(common.out_dir.as_deref())?;
    let db = GameDatabase::load(&common.data)?;
    let rules = load_rules(base_dir, export.rules.as_deref())?;

    let model = ExportBuilder::new(&db, &rules).build()?;
    let path = model.write(&out_dir)?;

    if quiet {
        return Ok(());
    }

    println!(
        "{} {} ({} of {} objects in {} categories)",
        "Exported:".green(),
        path.display(),
        model.classified_count(),
        db.objects.len(),
        rules.len()
    );

    if verbose {
        let unclassified = db.objects.len() - model.classified_count();
        if unclassified > 0 {
            println!("  {} objects matched no rule", unclassified);
        }
        for cat in &model.obj_cat_data {
            println!("  {}: {}", cat.name.cyan(), cat.obj_names.len());
        }
    }

    Ok(())
}

fn handle_dump(
    base_dir: &Path,
    common: &CommonOpts,
    dump: &DumpOpts,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let out_dir = resolve_out_dir(common.out_dir.as_deref())?;
    let db = GameDatabase::load(&common.data)?;
    let (decompiler_cmd, jobs, filter) = build_dump_options(base_dir, dump)?;

    require_decompiler(&decompiler_cmd)?;
    if jobs > 0 {
        // Ignored if a global pool already exists
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let worklist = build_worklist(&db, &filter);
    let decompiler = CommandDecompiler::new(&decompiler_cmd);
    let dumper = BatchDumper::new(&out_dir);

    let report = if quiet {
        dumper.run(&worklist, &decompiler, &NullProgress)?
    } else {
        let progress = Arc::new(AtomicProgress::new());
        let reporter = spawn_reporter(Arc::clone(&progress));

        let result = dumper.run(&worklist, &decompiler, progress.as_ref());
        // Release the reporter even when the batch failed to start
        progress.finish();
        reporter.join().ok();
        result?
    };

    if !quiet {
        print_report(&report, verbose);
    }
    Ok(())
}

fn handle_run(
    base_dir: &Path,
    common: &CommonOpts,
    export: &ExportOpts,
    dump: &DumpOpts,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    // Resolve the directory once so export and dump agree on it
    let out_dir = resolve_out_dir(common.out_dir.as_deref())?;
    let resolved = CommonOpts {
        data: common.data.clone(),
        out_dir: Some(out_dir),
    };

    handle_export(base_dir, &resolved, export, verbose, quiet)?;
    handle_dump(base_dir, &resolved, dump, verbose, quiet)
}

/// Re-render the progress line until the batch finishes
fn spawn_reporter(progress: Arc<AtomicProgress>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            let (done, total) = progress.snapshot();
            if total > 0 {
                print!("\r  Decompiling [{}/{}]", done, total);
                io::stdout().flush().ok();
            }
            if progress.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
        let (done, total) = progress.snapshot();
        if total > 0 {
            println!("\r  Decompiling [{}/{}]", done, total);
        }
    })
}

fn print_report(report: &BatchReport, verbose: bool) {
    println!(
        "{} {} written, {} failed, {} duplicates",
        "Dumped:".green(),
        report.written,
        report.failed,
        report.duplicates
    );
    if report.write_errors > 0 {
        println!(
            "{} {} artifacts could not be written",
            "[WARN]".yellow().bold(),
            report.write_errors
        );
    }

    if verbose {
        for result in &report.results {
            match &result.outcome {
                DumpOutcome::Written => {
                    println!("  {} {}", "OK".green(), result.file_name);
                }
                DumpOutcome::Failed(detail) => {
                    println!("  {} {} ({})", "FAIL".red(), result.file_name, detail);
                }
                DumpOutcome::DuplicateName => {
                    println!(
                        "  {} {} (duplicate of an earlier entry)",
                        "SKIP".yellow(),
                        result.file_name
                    );
                }
                DumpOutcome::WriteError(detail) => {
                    println!("  {} {} ({})", "FAIL".red(), result.file_name, detail);
                }
            }
        }
    }
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load(base_dir)?;
            println!();
            println!("dump.decompiler = {}", config.dump.decompiler.cyan());
            println!("dump.jobs = {}", config.dump.jobs);
            println!("dump.include = {:?}", config.dump.include);
            println!("dump.exclude = {:?}", config.dump.exclude);
            println!("export.rules = {:?}", config.export.rules);
            println!();
        }
    }

    Ok(())
}
