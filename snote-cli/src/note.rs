use crate::cli::{Action, Cli, EditArgs};
use crate::error::CliResult;
use crate::list::print_notes;
use crate::prompt::selection_prompt;
use snote::{Config, ExternalEditor, NoteManager, NoteOutcome, Notebook, SearchMode};

/// Run the command line against the configured notebooks
pub fn run(cli: &Cli) -> CliResult<()> {
    let config = Config::load()?;

    if cli.notebooks {
        for name in config.notebooks() {
            println!("{}", name);
        }
        return Ok(());
    }

    let Some(name) = cli.notebook.as_deref() else {
        return Ok(());
    };
    let notebook = Notebook::resolve(&config, name)?;
    tracing::debug!(
        "Using notebook {} at {}",
        notebook.name(),
        notebook.location().display()
    );

    let manager = NoteManager::new(&notebook, ExternalEditor::for_notebook(&notebook));
    match cli.resolved_action() {
        Action::Update(args) => update_note(&manager, args, cli.quiet),
        Action::New(args) => new_note(&manager, args, cli.quiet),
        Action::List { number, format } => {
            let entries = manager.list_notes(number)?;
            Ok(print_notes(&entries, format)?)
        }
        Action::Search {
            term,
            regex,
            format,
        } => {
            let mode = if regex {
                SearchMode::Pattern
            } else {
                SearchMode::Literal
            };
            let entries = manager.search_notes(&term, mode)?;
            Ok(print_notes(&entries, format)?)
        }
    }
}

fn new_note(manager: &NoteManager<'_, ExternalEditor>, args: EditArgs, quiet: bool) -> CliResult<()> {
    let outcome = manager.new_note(args.filename.as_deref(), args.timestamp)?;
    report(&outcome, quiet);
    Ok(())
}

fn update_note(
    manager: &NoteManager<'_, ExternalEditor>,
    args: EditArgs,
    quiet: bool,
) -> CliResult<()> {
    let mut prompt = selection_prompt();
    let outcome = manager.update_note(args.filename.as_deref(), args.timestamp, prompt.as_mut())?;
    report(&outcome, quiet);
    Ok(())
}

fn report(outcome: &NoteOutcome, quiet: bool) {
    if quiet {
        return;
    }
    match outcome {
        NoteOutcome::Saved(path) => println!("Note saved: {}", path.display()),
        NoteOutcome::Unchanged => println!("No change, note not saved"),
    }
}
