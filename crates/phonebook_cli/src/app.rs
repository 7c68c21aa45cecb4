//! Interactive command loop.
//!
//! # Responsibility
//! - Parse main-prompt commands and dispatch them to store operations.
//! - Collect field input and re-prompt the fields the core rejects.
//! - Persist after every successful mutation and on exit.
//!
//! # Invariants
//! - Recoverable input errors never terminate the loop.
//! - End of input behaves like the exit command.

use crate::console::Console;
use log::{info, warn};
use phonebook_core::{
    Entry, EntryField, EntryPatch, EntryRepository, EntryValidationError, FilterSet,
    PhonebookConfig, RepoError, Store, FIELD_COUNT,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const HELP: &str = "Phone book
Enter 1 to view the phonebook entries
Enter 2 to add an entry to the phonebook
Enter 3 to edit a phonebook entry
Enter 4 to search entries field by field
Enter 5 to print commands again
Enter 6 to save and exit
Enter 7 to search entries by a single keyword";

/// Main-prompt command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    View,
    Add,
    Edit,
    Search,
    Help,
    Exit,
    KeywordSearch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    NotANumber(String),
    OutOfRange(i64),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber(input) => write!(f, "`{input}` is not a command number"),
            Self::OutOfRange(number) => write!(f, "unknown command {number}"),
        }
    }
}

impl Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let number = input
            .trim()
            .parse::<i64>()
            .map_err(|_| CommandError::NotANumber(input.trim().to_string()))?;
        match number {
            1 => Ok(Self::View),
            2 => Ok(Self::Add),
            3 => Ok(Self::Edit),
            4 => Ok(Self::Search),
            5 => Ok(Self::Help),
            6 => Ok(Self::Exit),
            7 => Ok(Self::KeywordSearch),
            other => Err(CommandError::OutOfRange(other)),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Io(io::Error),
    Repo(RepoError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console error: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type AppResult<T> = Result<T, AppError>;

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Asks for the phonebook file name and normalizes it.
///
/// End of input selects the configured default.
pub fn choose_file_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &PhonebookConfig,
) -> io::Result<String> {
    let label = format!("Enter file name (default {}): ", config.file_name);
    let raw = console.prompt(&label)?.unwrap_or_default();
    Ok(phonebook_core::normalize_file_name(&raw, &config.file_name))
}

pub struct App<'a, S: EntryRepository, R, W> {
    store: Store<S>,
    config: &'a PhonebookConfig,
    console: Console<R, W>,
}

impl<'a, S: EntryRepository, R: BufRead, W: Write> App<'a, S, R, W> {
    pub fn new(store: Store<S>, config: &'a PhonebookConfig, console: Console<R, W>) -> Self {
        Self {
            store,
            config,
            console,
        }
    }

    /// Runs until the exit command or end of input, then persists.
    ///
    /// # Errors
    /// - Console I/O failures.
    /// - Save failure on exit.
    pub fn run(&mut self) -> AppResult<()> {
        self.console.say(HELP)?;
        loop {
            let Some(input) = self.console.prompt("Enter the command: ")? else {
                break;
            };
            let command = match input.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    info!("event=command module=cli status=error error_code=invalid_command");
                    self.console
                        .say(format_args!("Incorrect command ({err}). Try again."))?;
                    continue;
                }
            };
            if self.dispatch(command)? == Flow::Exit {
                break;
            }
        }

        self.store.persist()?;
        self.console.say("Goodbye")?;
        Ok(())
    }

    pub fn into_parts(self) -> (Store<S>, Console<R, W>) {
        (self.store, self.console)
    }

    fn dispatch(&mut self, command: Command) -> AppResult<Flow> {
        match command {
            Command::View => self.view(),
            Command::Add => self.add(),
            Command::Edit => self.edit(),
            Command::Search => self.search(),
            Command::KeywordSearch => self.keyword_search(),
            Command::Help => {
                self.console.say(HELP)?;
                Ok(Flow::Continue)
            }
            Command::Exit => Ok(Flow::Exit),
        }
    }

    fn view(&mut self) -> AppResult<Flow> {
        if self.store.is_empty() {
            self.console.say("Phonebook is empty")?;
            return Ok(Flow::Continue);
        }
        let label = format!("Enter page size (default {}): ", self.config.page_size);
        let Some(raw) = self.console.prompt(&label)? else {
            return Ok(Flow::Exit);
        };
        let page_size = if raw.trim().is_empty() {
            self.config.page_size
        } else {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    self.console.say("Page size must be a positive number")?;
                    return Ok(Flow::Continue);
                }
            }
        };

        let mut lines = Vec::new();
        let pages = match self.store.pages(page_size) {
            Ok(pages) => pages,
            Err(err) => {
                self.console.say(err)?;
                return Ok(Flow::Continue);
            }
        };
        let page_count = pages.len();
        for page in pages {
            let mut block = vec![format!("Page {} of {page_count}", page.number)];
            block.extend(
                page.entries
                    .iter()
                    .enumerate()
                    .map(|(offset, entry)| render_entry(page.start + offset + 1, entry)),
            );
            lines.push(block);
        }

        for (index, block) in lines.into_iter().enumerate() {
            for line in block {
                self.console.say(line)?;
            }
            if index + 1 < page_count
                && self
                    .console
                    .prompt("Press enter to continue...")?
                    .is_none()
            {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> AppResult<Flow> {
        let Some(values) = self.read_values()? else {
            return Ok(Flow::Exit);
        };
        let mut entry = Entry::from_values(values);
        while let Err(err) = self.validate_entry(&entry) {
            let Some(value) = self.reprompt(&err)? else {
                return Ok(Flow::Exit);
            };
            entry.set(err.field(), value);
        }

        self.store.add(entry);
        self.persist_after_mutation("Entry was added")?;
        Ok(Flow::Continue)
    }

    fn edit(&mut self) -> AppResult<Flow> {
        if self.store.is_empty() {
            self.console.say("Phonebook is empty")?;
            return Ok(Flow::Continue);
        }
        self.console.say("Edit entries")?;
        let listing = self
            .store
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| render_entry(index + 1, entry))
            .collect::<Vec<_>>();
        for line in listing {
            self.console.say(line)?;
        }

        let Some(raw) = self
            .console
            .prompt("Enter the number of the entry you'd like to edit: ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(index) = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| self.store.index_from_display(number))
        else {
            self.console
                .say(format_args!("No entry with number `{}`", raw.trim()))?;
            return Ok(Flow::Continue);
        };

        self.console
            .say("Leave a field empty to keep its current value")?;
        loop {
            let Some(values) = self.read_values()? else {
                return Ok(Flow::Exit);
            };
            let mut patch = EntryPatch::from_values(values);
            while let Err(err) = self.validate_patch(&patch) {
                let Some(value) = self.reprompt(&err)? else {
                    return Ok(Flow::Exit);
                };
                patch = patch.with(err.field(), value);
            }

            let Some(mut preview) = self.store.get(index).cloned() else {
                self.console
                    .say(format_args!("No entry with number `{}`", index + 1))?;
                return Ok(Flow::Continue);
            };
            preview.update(&patch);
            self.console.say(preview.summary())?;

            let Some(answer) = self.console.prompt("Is all correct? (Y/N): ")? else {
                return Ok(Flow::Exit);
            };
            if !self.config.is_affirmative(&answer) {
                self.console.say("Enter information again")?;
                continue;
            }
            if patch.is_empty() {
                self.console.say("Nothing to change")?;
            } else if self.store.edit(index, &patch) {
                self.persist_after_mutation("Entry was edited")?;
            } else {
                self.console
                    .say(format_args!("No entry with number `{}`", index + 1))?;
            }
            return Ok(Flow::Continue);
        }
    }

    fn search(&mut self) -> AppResult<Flow> {
        self.console
            .say("Enter space-separated keywords per field; leave empty for any value")?;
        let mut filters = FilterSet::new();
        for field in EntryField::ALL {
            let label = format!("Search by {}: ", field.label());
            let Some(raw) = self.console.prompt(&label)? else {
                return Ok(Flow::Exit);
            };
            filters.insert_keywords(field, &raw);
        }

        let rendered = self
            .store
            .filtered_search(&filters)
            .into_iter()
            .map(|entry| entry.summary())
            .collect::<Vec<_>>();
        self.print_results(rendered)?;
        Ok(Flow::Continue)
    }

    fn keyword_search(&mut self) -> AppResult<Flow> {
        let Some(keyword) = self
            .console
            .prompt("Enter the keyword for searching: ")?
        else {
            return Ok(Flow::Exit);
        };
        let rendered = self
            .store
            .search_by_keyword(&keyword)
            .into_iter()
            .map(|entry| entry.summary())
            .collect::<Vec<_>>();
        self.print_results(rendered)?;
        Ok(Flow::Continue)
    }

    fn print_results(&mut self, rendered: Vec<String>) -> AppResult<()> {
        if rendered.is_empty() {
            self.console.say("Nothing was found")?;
            return Ok(());
        }
        self.console.say("Search results:")?;
        for line in rendered {
            self.console.say(line)?;
        }
        Ok(())
    }

    /// Reads the six field values in persisted order.
    ///
    /// Returns `None` at end of input.
    fn read_values(&mut self) -> AppResult<Option<[String; FIELD_COUNT]>> {
        let mut values: [String; FIELD_COUNT] = Default::default();
        for (slot, field) in values.iter_mut().zip(EntryField::ALL) {
            let Some(value) = self.console.prompt(&field_label(field))? else {
                return Ok(None);
            };
            *slot = value;
        }
        Ok(Some(values))
    }

    /// Reports `err` and asks again for the field it names.
    fn reprompt(&mut self, err: &EntryValidationError) -> AppResult<Option<String>> {
        warn!(
            "event=field_input module=cli status=error error_code=invalid_field field={}",
            err.field().key()
        );
        self.console.say(format_args!("{err}, try again"))?;
        Ok(self.console.prompt(&field_label(err.field()))?)
    }

    /// New entries need both phones valid.
    fn validate_entry(&self, entry: &Entry) -> Result<(), EntryValidationError> {
        entry.check_encodable(self.config.delimiter)?;
        entry.validate_phones()
    }

    /// Patches only need their non-empty phone replacements valid.
    fn validate_patch(&self, patch: &EntryPatch) -> Result<(), EntryValidationError> {
        patch.check_encodable(self.config.delimiter)?;
        patch.validate_phones()
    }

    fn persist_after_mutation(&mut self, success: &str) -> AppResult<()> {
        match self.store.persist() {
            Ok(()) => self.console.say(success)?,
            Err(err) => {
                warn!(
                    "event=store_save module=cli status=error error_code=save_failed error={}",
                    err
                );
                self.console
                    .say(format_args!("{success}, but saving failed: {err}"))?;
            }
        }
        Ok(())
    }
}

fn field_label(field: EntryField) -> String {
    format!("Input {}: ", field.label())
}

fn render_entry(number: usize, entry: &Entry) -> String {
    let fields = entry
        .fields()
        .map(|(field, value)| format!("{}: {value}", field.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{number}. {fields}")
}

#[cfg(test)]
mod tests {
    use super::{choose_file_name, App, AppError, Command, CommandError};
    use crate::console::Console;
    use phonebook_core::{
        Entry, EntryRepository, InMemoryEntryRepository, PhonebookConfig, RepoError, RepoResult,
        Store,
    };
    use std::io::{self, Cursor};
    use std::path::PathBuf;

    /// Loads nothing and refuses every save.
    struct FailingRepository;

    impl EntryRepository for FailingRepository {
        fn load(&self) -> RepoResult<Vec<Entry>> {
            Ok(Vec::new())
        }

        fn save(&mut self, _entries: &[Entry]) -> RepoResult<()> {
            Err(RepoError::Io {
                path: PathBuf::from("phonebook.txt"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn doe() -> Entry {
        Entry::new(
            "Doe",
            "John",
            "Richard",
            "Acme",
            "555-123-4567",
            "555-765-4321",
        )
    }

    fn run(
        entries: Vec<Entry>,
        input: impl Into<Vec<u8>>,
    ) -> (Store<InMemoryEntryRepository>, String) {
        let config = PhonebookConfig::default();
        let store = Store::with_entries(InMemoryEntryRepository::default(), entries);
        let console = Console::new(Cursor::new(input.into()), Vec::new());
        let mut app = App::new(store, &config, console);
        app.run().unwrap();
        let (store, console) = app.into_parts();
        let output = String::from_utf8(console.into_output()).unwrap();
        (store, output)
    }

    #[test]
    fn command_parsing_covers_errors() {
        assert_eq!(" 3 ".parse::<Command>(), Ok(Command::Edit));
        assert_eq!(
            "x".parse::<Command>(),
            Err(CommandError::NotANumber("x".to_string()))
        );
        assert_eq!("9".parse::<Command>(), Err(CommandError::OutOfRange(9)));
    }

    #[test]
    fn invalid_commands_reprompt_and_exit_persists() {
        let (store, output) = run(vec![doe()], "abc\n42\n6\n");
        assert_eq!(output.matches("Incorrect command").count(), 2);
        assert!(output.ends_with("Goodbye\n"));
        assert_eq!(store.repository().saved(), &[doe()]);
    }

    #[test]
    fn invalid_utf8_command_is_reprompted() {
        let (store, output) = run(vec![doe()], vec![0xff, b'\n', b'6', b'\n']);
        assert_eq!(output.matches("Incorrect command").count(), 1);
        assert!(output.ends_with("Goodbye\n"));
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn end_of_input_persists_like_exit() {
        let (store, output) = run(vec![doe()], "");
        assert!(output.contains("Goodbye"));
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn add_reprompts_invalid_phone_and_saves() {
        let input = "2\nDoe\nJohn\nRichard\nAcme\nnot-a-phone\n555-765-4321\n555-123-4567\n6\n";
        let (store, output) = run(Vec::new(), input);

        assert!(output.contains("office phone is not a valid phone number, try again"));
        assert_eq!(output.matches("Input office phone: ").count(), 2);
        assert_eq!(output.matches("Input personal phone: ").count(), 1);
        assert!(output.contains("Entry was added"));
        assert_eq!(store.entries(), &[doe()]);
        assert_eq!(store.repository().save_count(), 2);
    }

    #[test]
    fn add_rejects_delimiter_in_field() {
        let input = "2\nDoe|X\nJohn\nRichard\nAcme\n555-123-4567\n555-765-4321\nDoe\n6\n";
        let (store, output) = run(Vec::new(), input);

        assert!(output.contains("must not contain the delimiter"));
        assert_eq!(store.entries(), &[doe()]);
    }

    #[test]
    fn edit_applies_patch_after_confirmation() {
        let input = "3\n1\n\n\n\nGlobex\n\n\nn\n\n\n\nInitech\n\n\nY\n6\n";
        let (store, output) = run(vec![doe()], input);

        assert!(output.contains("Enter information again"));
        assert!(output.contains("Entry was edited"));
        assert_eq!(store.entries()[0].organization, "Initech");
        assert_eq!(store.entries()[0].surname, "Doe");
        assert_eq!(store.repository().saved()[0].organization, "Initech");
    }

    #[test]
    fn edit_with_invalid_number_leaves_store_untouched() {
        let (store, output) = run(vec![doe()], "3\n5\n6\n");
        assert!(output.contains("No entry with number `5`"));
        assert_eq!(store.entries(), &[doe()]);
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn edit_validates_non_empty_phone_replacement() {
        let input = "3\n1\n\n\n\n\n12-34\n\n\nд\n6\n";
        let (store, output) = run(vec![doe()], input);
        assert!(output.contains("office phone is not a valid phone number"));
        assert!(output.contains("Nothing to change"));
        assert_eq!(store.entries(), &[doe()]);
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn save_failure_keeps_entry_and_fails_exit() {
        let config = PhonebookConfig::default();
        let store = Store::with_entries(FailingRepository, Vec::new());
        let input = "2\nDoe\nJohn\nRichard\nAcme\n555-123-4567\n555-765-4321\n6\n";
        let console = Console::new(Cursor::new(input), Vec::new());
        let mut app = App::new(store, &config, console);

        let err = app.run().unwrap_err();
        assert!(matches!(err, AppError::Repo(RepoError::Io { .. })));

        let (store, console) = app.into_parts();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Entry was added, but saving failed"));
        assert!(!output.contains("Goodbye"));
        assert_eq!(store.entries(), &[doe()]);
    }

    #[test]
    fn field_search_prints_matches() {
        let entries = vec![doe(), Entry::new("Roe", "Jane", "", "Globex", "", "")];
        let (_, output) = run(entries, "4\nDOE roe\n\n\nacme\n\n\n6\n");
        assert!(output.contains("Search results:"));
        assert!(output.contains("Doe John Richard Acme"));
        assert!(!output.contains("Roe Jane"));
    }

    #[test]
    fn keyword_search_reports_no_match() {
        let (_, output) = run(vec![doe()], "7\nnobody\n7\n\n6\n");
        assert_eq!(output.matches("Nothing was found").count(), 2);
    }

    #[test]
    fn view_paginates_with_continue_prompt() {
        let entries = (0..3)
            .map(|index| Entry::new(format!("S{index}"), "", "", "", "", ""))
            .collect();
        let (_, output) = run(entries, "1\n2\n\n6\n");
        assert!(output.contains("Page 1 of 2"));
        assert!(output.contains("Page 2 of 2"));
        assert!(output.contains("3. surname: S2"));
        assert_eq!(output.matches("Press enter to continue...").count(), 1);
    }

    #[test]
    fn view_on_empty_store_skips_page_size_prompt() {
        let (_, output) = run(Vec::new(), "1\n6\n");
        assert!(output.contains("Phonebook is empty"));
        assert!(!output.contains("page size"));
        assert!(output.ends_with("Goodbye\n"));
    }

    #[test]
    fn view_rejects_zero_page_size() {
        let (_, output) = run(vec![doe()], "1\n0\n6\n");
        assert!(output.contains("Page size must be a positive number"));
    }

    #[test]
    fn file_name_prompt_normalizes_input() {
        let config = PhonebookConfig::default();
        let mut console = Console::new(Cursor::new("contacts\n"), Vec::new());
        assert_eq!(choose_file_name(&mut console, &config).unwrap(), "contacts.txt");

        let mut console = Console::new(Cursor::new(""), Vec::new());
        assert_eq!(choose_file_name(&mut console, &config).unwrap(), "phonebook.txt");
    }
}
