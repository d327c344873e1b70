use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "snote")]
#[command(version)]
#[command(about = "Keep dated notes in notebook directories, edited with your own editor")]
#[command(long_about = "
snote maps a notebook name to a directory configured in an INI file and
opens notes from it in your editor. Notes are only written back when the
edit changed them.

The configuration file is read from $SNOTE, or from
<config dir>/snote/snote.ini when $SNOTE is unset.

Example usage:
  snote journal                     # Edit the most recent note
  snote journal new -f 'first post' # Create a note titled 'first post'
  snote journal update -f post -t   # Edit a note matching 'post', adding a timestamp
  snote journal list -n 10          # Show the ten newest notes
  snote journal search 'video tapes'
")]
pub struct Cli {
    /// Notebook to use
    #[arg(required_unless_present = "notebooks")]
    pub notebook: Option<String>,

    #[command(subcommand)]
    pub action: Option<Action>,

    /// Options for the default update action
    #[command(flatten)]
    pub edit: EditArgs,

    /// List configured notebooks and exit
    #[arg(long)]
    pub notebooks: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Options shared by the actions that open the editor
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct EditArgs {
    /// Name a new note, or search for a note to update
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Add a timestamp to the note
    #[arg(short, long)]
    pub timestamp: bool,
}

impl EditArgs {
    /// Combine action-level options with the ones given before the action
    pub fn merged(self, outer: &EditArgs) -> Self {
        Self {
            filename: self.filename.or_else(|| outer.filename.clone()),
            timestamp: self.timestamp || outer.timestamp,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Edit a note; the default action
    #[command(long_about = "
Opens the most recently created note in the editor. With --filename, opens
the note whose name contains the given text instead; spaces and hyphens are
interchangeable and case is ignored. When several notes match you are asked
to pick one; pressing Enter picks the last one listed.

Examples:
  snote journal update
  snote journal update -f 'video tapes' -t
")]
    Update(EditArgs),

    /// Create a new note
    #[command(long_about = "
Creates a note named <date>-<title>.<ext>, seeded from the notebook's
template with %TITLE% replaced by the title. Nothing is created if the
editor is closed without changes.

Examples:
  snote journal new
  snote journal new -f 'weekly review'
")]
    New(EditArgs),

    /// List notes, newest first
    List {
        /// Limit the number of notes listed; 0 or less uses the notebook's max_list
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        number: i64,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Search note names
    Search {
        /// Text to look for; spaces also match hyphens
        term: String,

        /// Treat the term as a regular expression
        #[arg(short, long)]
        regex: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The action to run, `update` when none was given
    pub fn resolved_action(&self) -> Action {
        match &self.action {
            None => Action::Update(self.edit.clone()),
            Some(Action::Update(args)) => Action::Update(args.clone().merged(&self.edit)),
            Some(Action::New(args)) => Action::New(args.clone().merged(&self.edit)),
            Some(other) => other.clone(),
        }
    }
}
