mod highlighter;
mod lexer;

use clap::Parser;
use highlighter::{BracketValidator, Highlighter};
use miette::{IntoDiagnostic, Result, WrapErr};
use nu_ansi_term::Color;
use quickbind::{
    Context, DEFAULT_STACK_SIZE, EvalFlags, EvalOptions, EvalType, Runtime, RuntimeOptions, Value,
    render_error,
};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    FileBackedHistory, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use std::io::BufRead;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

const HISTORY_SIZE: usize = 1000;

/// quickbind - Evaluate JavaScript on the embedded QuickJS engine
#[derive(Parser, Debug)]
#[command(name = "quickbind")]
#[command(about = "Evaluate JavaScript with QuickJS", long_about = None)]
struct Args {
    /// Evaluate input as an ES module
    #[arg(long)]
    module: bool,

    /// Force strict mode
    #[arg(long)]
    strict: bool,

    /// Maximum interpreter stack size in bytes (0 disables the check)
    #[arg(long, default_value_t = DEFAULT_STACK_SIZE)]
    stack_size: usize,

    /// Heap limit in bytes
    #[arg(long)]
    memory_limit: Option<usize>,

    /// Print the tag of each result (for debugging)
    #[arg(long)]
    debug_tag: bool,

    /// Script file to evaluate
    #[arg(long, short, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// Expression to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

impl Args {
    fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            max_stack_size: self.stack_size,
            memory_limit: self.memory_limit,
            ..RuntimeOptions::default()
        }
    }

    fn eval_options(&self) -> EvalOptions {
        let eval_type = if self.module {
            EvalType::Module
        } else {
            EvalType::Global
        };
        let mut flags = EvalFlags::empty();
        if self.strict {
            flags |= EvalFlags::STRICT;
        }
        EvalOptions::new(eval_type).with_flags(flags)
    }
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn history_path() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("quickbind");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("history.txt"))
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let words: Vec<String> = lexer::KEYWORDS
        .iter()
        .chain(lexer::CONSTANTS)
        .map(|word| word.to_string())
        .collect();

    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['_', '$']);
        completions.insert(words);
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_description_mode(DescriptionMode::PreferRight);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let mut line_editor = Reedline::create()
        .with_highlighter(Box::new(Highlighter))
        .with_validator(Box::new(BracketValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    if let Some(path) = history_path() {
        match FileBackedHistory::with_file(HISTORY_SIZE, path) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => warn!("history disabled: {}", e),
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("qjs".to_string()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

fn paint_result(value: &Value<'_>, text: String, color: bool) -> String {
    if !color {
        return text;
    }
    let fg = if value.is_string() {
        Color::Green
    } else if value.is_number() || value.is_big_int() || value.is_bool() {
        Color::Cyan
    } else if value.is_null() || value.is_undefined() {
        Color::DarkGray
    } else {
        Color::White
    };
    fg.paint(text).to_string()
}

/// Evaluate one chunk of input, printing its value or rendering the error.
///
/// Returns whether evaluation succeeded.
fn interpret_input(
    ctx: &Context<'_>,
    input: &str,
    filename: &str,
    options: EvalOptions,
    debug_tag: bool,
    color: bool,
) -> bool {
    let value = match ctx.eval(input, filename, options) {
        Ok(value) => value,
        Err(e) => {
            render_error(&e.into(), input);
            return false;
        }
    };

    if debug_tag {
        println!("=== Tag: {:?} ===", value.tag());
    }

    match value.to_string() {
        Ok(text) => {
            println!("{}", paint_result(&value, text, color));
            true
        }
        Err(e) => {
            render_error(&e.into(), input);
            false
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level; default to WARN
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let runtime = Runtime::with_options(args.runtime_options()).into_diagnostic()?;
    let ctx = runtime.new_context().into_diagnostic()?;
    let options = args.eval_options();
    let color = atty::is(atty::Stream::Stdout);

    if let Some(path) = &args.file {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let filename = path.display().to_string();
        let ok = interpret_input(&ctx, &source, &filename, options, args.debug_tag, color);
        return Ok(exit_code(ok));
    }

    // Check if we have a direct expression argument
    if let Some(expr) = &args.expression {
        let ok = interpret_input(&ctx, expr, "<expr>", options, args.debug_tag, color);
        return Ok(exit_code(ok));
    }

    // Otherwise, check if we're in interactive or pipe mode
    let is_interactive = atty::is(atty::Stream::Stdin);

    if is_interactive {
        // Globals persist across lines since the context is shared.
        let (mut line_editor, prompt) = setup_reedline();

        println!("quickbind REPL - Type JavaScript to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            match sig {
                Signal::Success(buffer) => {
                    interpret_input(&ctx, &buffer, "<repl>", options, args.debug_tag, color);
                }
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }
    } else {
        // Pipe/stdin mode: one chunk per line
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error reading line from stdin: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            interpret_input(&ctx, &line, "<stdin>", options, args.debug_tag, color);
        }
    }

    Ok(ExitCode::SUCCESS)
}
