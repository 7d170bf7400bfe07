use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bibshelf_export::{
    CustomExportList, FormatDescriptor, JournalAbbreviationLoader, LayoutFormatterPreferences,
    SavePreferences,
};
use bibshelf_settings::PreferencesFile;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bibshelf-cli",
    about = "Manage BibShelf custom export formats",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 直接指定偏好設定檔。 / Preferences file, overriding the workspace default.
    #[arg(long, global = true, value_name = "FILE")]
    prefs: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 管理自訂匯出格式。 / Manage custom export formats.
    #[command(subcommand)]
    Formats(FormatsCommand),
}

#[derive(Subcommand)]
enum FormatsCommand {
    /// 依名稱列出自訂格式。 / List custom formats sorted by name.
    List,
    /// 新增自訂格式。 / Add a custom format.
    Add(FormatAddArgs),
    /// 依名稱移除自訂格式。 / Remove a custom format by name.
    Remove(FormatNameArgs),
    /// 顯示單一格式的細節。 / Show the details of one format.
    Show(FormatNameArgs),
}

#[derive(Args)]
struct FormatAddArgs {
    /// 顯示名稱。 / Display name, also used as the console name.
    #[arg(value_name = "NAME")]
    name: String,
    /// 版面檔，可含 `.layout`。 / Layout file, with or without `.layout`.
    #[arg(value_name = "LAYOUT")]
    layout: String,
    /// 輸出副檔名。 / Output file extension.
    #[arg(value_name = "EXTENSION")]
    extension: String,
}

#[derive(Args)]
struct FormatNameArgs {
    /// 格式名稱。 / Format name.
    #[arg(value_name = "NAME")]
    name: String,
}

/// Loaded preferences plus the format list derived from them.
struct Session {
    prefs: PreferencesFile,
    formats: CustomExportList,
    layout: LayoutFormatterPreferences,
    save: SavePreferences,
}

impl Session {
    fn open(path: &Path) -> Result<Self> {
        let prefs = PreferencesFile::load(path)
            .with_context(|| format!("failed to load preferences from {}", path.display()))?;
        let loader = Arc::new(JournalAbbreviationLoader::with_builtin());
        let mut formats = CustomExportList::default();
        formats.load(&prefs, Arc::clone(&loader));
        let layout = LayoutFormatterPreferences::from_preferences(&prefs, loader);
        let save = SavePreferences::load_for_export(&prefs);
        Ok(Self {
            prefs,
            formats,
            layout,
            save,
        })
    }

    fn persist(&mut self) -> Result<()> {
        self.formats.store(&mut self.prefs);
        self.prefs.save().with_context(|| {
            format!("failed to save preferences to {}", self.prefs.path().display())
        })
    }
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        prefs,
        command,
    } = Cli::parse();
    let prefs_path = match prefs {
        Some(path) => resolve_input_path(&path)?,
        None => preferences_path(&resolve_workspace(workspace)?),
    };
    tracing::debug!(path = %prefs_path.display(), "using preferences file");
    match command {
        Commands::Formats(subcommand) => execute_formats_command(subcommand, &prefs_path),
    }
}

fn execute_formats_command(command: FormatsCommand, prefs_path: &Path) -> Result<()> {
    let mut session = Session::open(prefs_path)?;
    match command {
        FormatsCommand::List => list_formats(&session),
        FormatsCommand::Add(args) => add_format(args, &mut session),
        FormatsCommand::Remove(args) => remove_format(args, &mut session),
        FormatsCommand::Show(args) => show_format(args, &session),
    }
}

fn list_formats(session: &Session) -> Result<()> {
    if session.formats.is_empty() {
        println!("No custom export formats.");
        return Ok(());
    }
    for descriptor in session.formats.sorted() {
        println!("{}", descriptor.fields().join("\t"));
    }
    Ok(())
}

fn add_format(args: FormatAddArgs, session: &mut Session) -> Result<()> {
    let FormatAddArgs {
        name,
        layout,
        extension,
    } = args;
    if name.trim().is_empty() {
        bail!("format name must not be empty");
    }
    let replaced = session.formats.get(&name).is_some();
    let descriptor = FormatDescriptor::new([name.as_str(), layout.as_str(), extension.as_str()]);
    session
        .formats
        .add(descriptor, &session.layout, &session.save)
        .with_context(|| format!("failed to add export format '{name}'"))?;
    session.persist()?;
    if replaced {
        println!("Replaced export format '{name}'");
    } else {
        println!("Added export format '{name}'");
    }
    Ok(())
}

fn remove_format(args: FormatNameArgs, session: &mut Session) -> Result<()> {
    let descriptor = session
        .formats
        .sorted()
        .iter()
        .find(|descriptor| descriptor.display_name() == Some(args.name.as_str()))
        .cloned();
    let Some(descriptor) = descriptor else {
        bail!("no custom export format named '{}'", args.name);
    };
    session
        .formats
        .remove(&descriptor, &session.layout, &session.save)
        .with_context(|| format!("failed to remove export format '{}'", args.name))?;
    session.persist()?;
    println!("Removed export format '{}'", args.name);
    Ok(())
}

fn show_format(args: FormatNameArgs, session: &Session) -> Result<()> {
    let Some(format) = session.formats.get(&args.name) else {
        bail!("no custom export format named '{}'", args.name);
    };
    println!("name:      {}", format.display_name());
    println!("layout:    {}", format.layout_path().display());
    println!("extension: {}", format.extension());
    println!("encoding:  {}", format.save_preferences().encoding);
    println!("custom:    {}", format.is_custom());
    Ok(())
}

fn preferences_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".bibshelf").join("preferences.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
