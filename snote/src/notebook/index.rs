//! Directory index for a notebook
//!
//! Entries are read fresh from the filesystem on every call; nothing is
//! cached between listings.

use crate::error::{ErrorContext, Result, SnoteError};
use regex::{Regex, RegexBuilder};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Ordering applied to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive file name
    Name,
    /// Creation time, or status change time where creation time is unknown
    Created,
}

/// How a search term is matched against file names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive substring
    #[default]
    Literal,
    /// Case-insensitive regular expression
    Pattern,
}

/// One entry of a notebook directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    name: String,
    path: PathBuf,
}

/// Date and title columns derived from a note's file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInfo {
    /// First three hyphen-separated tokens joined with dots
    pub date: String,
    /// Remaining tokens joined with spaces, extension removed
    pub title: String,
}

impl NoteEntry {
    fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }

    /// File name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the entry, returning its path
    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Creation time of the entry, read from the filesystem now
    pub fn preferred_timestamp(&self) -> Result<SystemTime> {
        let metadata = std::fs::metadata(&self.path)
            .with_context(|| format!("Failed to read metadata for '{}'", self.path.display()))?;
        Ok(preferred_timestamp(&metadata))
    }

    /// Split the file name into display columns.
    ///
    /// `2016-07-15-I-have-to-return-some-video-tapes.md` becomes date
    /// `2016.07.15` and title `I have to return some video tapes`.
    pub fn info(&self) -> NoteInfo {
        let tokens: Vec<&str> = self.name.split('-').collect();
        let split = tokens.len().min(3);
        let date = tokens[..split].join(".");
        let title = tokens[split..].join(" ");
        let title = match title.rsplit_once('.') {
            Some((stem, _ext)) => stem.to_string(),
            None => title,
        };
        NoteInfo { date, title }
    }
}

/// Birth time when the platform reports one, otherwise the last status
/// change time.
pub fn preferred_timestamp(metadata: &Metadata) -> SystemTime {
    match metadata.created() {
        Ok(created) => created,
        Err(_) => status_change_time(metadata),
    }
}

#[cfg(unix)]
fn status_change_time(metadata: &Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(metadata.ctime()).unwrap_or(0);
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    UNIX_EPOCH + Duration::new(secs, nanos)
}

#[cfg(not(unix))]
fn status_change_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Enumerate the entries directly inside `location`.
///
/// Entries with equal keys keep the order the filesystem returned them in.
pub fn list(location: &Path, sort: SortKey, reverse: bool) -> Result<Vec<NoteEntry>> {
    let mut entries = scan(location)?;

    match sort {
        SortKey::Name => entries.sort_by_cached_key(|entry| entry.name.to_lowercase()),
        SortKey::Created => {
            let mut keyed = entries
                .into_iter()
                .map(|entry| Ok((entry.preferred_timestamp()?, entry)))
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by_key(|(created, _)| *created);
            entries = keyed.into_iter().map(|(_, entry)| entry).collect();
        }
    }

    if reverse {
        entries.reverse();
    }
    Ok(entries)
}

/// The most recently created entry in `location`
pub fn last_note(location: &Path) -> Result<NoteEntry> {
    list(location, SortKey::Created, false)?
        .pop()
        .ok_or_else(|| SnoteError::EmptyNotebook(location.to_path_buf()))
}

/// Entries whose name contains `term`, or `term` with its whitespace runs
/// replaced by hyphens, ignoring case. Results are in ascending name order.
pub fn search(location: &Path, term: &str, mode: SearchMode) -> Result<Vec<NoteEntry>> {
    let matcher = Matcher::new(term, mode)?;

    let matches: Vec<NoteEntry> = list(location, SortKey::Name, false)?
        .into_iter()
        .filter(|entry| matcher.is_match(&entry.name))
        .collect();

    if matches.is_empty() {
        tracing::info!("No file containing '{}' found", term);
        return Err(SnoteError::NoMatch(term.to_string()));
    }
    tracing::debug!("{} notes match '{}'", matches.len(), term);
    Ok(matches)
}

fn scan(location: &Path) -> Result<Vec<NoteEntry>> {
    if !location.is_dir() {
        return Err(SnoteError::DirectoryNotFound(location.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(location)
        .with_context(|| format!("Failed to read directory '{}'", location.display()))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.with_context(|| {
            format!("Failed to read directory entry in '{}'", location.display())
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push(NoteEntry::new(name, entry.path()));
    }
    Ok(entries)
}

enum Matcher {
    Literal { raw: String, hyphenated: String },
    Pattern { raw: Regex, hyphenated: Regex },
}

impl Matcher {
    fn new(term: &str, mode: SearchMode) -> Result<Self> {
        let hyphenated = term.split_whitespace().collect::<Vec<_>>().join("-");
        match mode {
            SearchMode::Literal => Ok(Self::Literal {
                raw: term.to_lowercase(),
                hyphenated: hyphenated.to_lowercase(),
            }),
            SearchMode::Pattern => Ok(Self::Pattern {
                raw: compile(term)?,
                hyphenated: compile(&hyphenated)?,
            }),
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Literal { raw, hyphenated } => {
                let name = name.to_lowercase();
                name.contains(raw.as_str()) || name.contains(hyphenated.as_str())
            }
            Self::Pattern { raw, hyphenated } => raw.is_match(name) || hyphenated.is_match(name),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| SnoteError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Notes in the order they are created on disk
    pub(crate) const CREATION_ORDER: [&str; 7] = [
        "2016-04-22-first-post",
        "2016-04-22-second-note",
        "2016-04-23-third-entry",
        "2016-05-02-another-note",
        "2016-07-15-I-have-to-return-some-video-tapes",
        "2016-07-15-Blockbuster-doesnt-exist-anymore-though",
        "2016-08-01-So-how-can-you-return-video-tapes",
    ];

    pub(crate) const NAME_ORDER: [&str; 7] = [
        "2016-04-22-first-post",
        "2016-04-22-second-note",
        "2016-04-23-third-entry",
        "2016-05-02-another-note",
        "2016-07-15-Blockbuster-doesnt-exist-anymore-though",
        "2016-07-15-I-have-to-return-some-video-tapes",
        "2016-08-01-So-how-can-you-return-video-tapes",
    ];

    /// Build the sample notebook. Files are created apart in time so their
    /// creation timestamps are distinct.
    pub(crate) fn sample_notebook() -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in CREATION_ORDER {
            std::fs::write(temp.path().join(name), format!("{name}\n")).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        temp
    }

    fn names(entries: &[NoteEntry]) -> Vec<&str> {
        entries.iter().map(NoteEntry::name).collect()
    }

    #[test]
    fn test_list_by_name() {
        let nb = sample_notebook();
        let entries = list(nb.path(), SortKey::Name, false).unwrap();
        assert_eq!(names(&entries), NAME_ORDER);
    }

    #[test]
    fn test_list_by_name_reversed() {
        let nb = sample_notebook();
        let entries = list(nb.path(), SortKey::Name, true).unwrap();

        let mut expected = NAME_ORDER.to_vec();
        expected.reverse();
        assert_eq!(names(&entries), expected);
    }

    #[test]
    fn test_list_by_created() {
        let nb = sample_notebook();

        let entries = list(nb.path(), SortKey::Created, false).unwrap();
        assert_eq!(names(&entries), CREATION_ORDER);

        let entries = list(nb.path(), SortKey::Created, true).unwrap();
        let mut expected = CREATION_ORDER.to_vec();
        expected.reverse();
        assert_eq!(names(&entries), expected);
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let err = list(&missing, SortKey::Name, false).unwrap_err();
        assert!(matches!(err, SnoteError::DirectoryNotFound(path) if path == missing));
    }

    #[test]
    fn test_list_on_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("note");
        std::fs::write(&file, "x").unwrap();

        assert!(matches!(
            list(&file, SortKey::Created, false),
            Err(SnoteError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_last_note_is_most_recently_created() {
        let nb = sample_notebook();
        let last = last_note(nb.path()).unwrap();
        assert_eq!(last.name(), "2016-08-01-So-how-can-you-return-video-tapes");
        assert_eq!(last.path(), nb.path().join(last.name()));
    }

    #[test]
    fn test_last_note_on_empty_notebook() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            last_note(temp.path()),
            Err(SnoteError::EmptyNotebook(_))
        ));
    }

    #[test]
    fn test_search_is_name_ordered() {
        let nb = sample_notebook();
        let entries = search(nb.path(), "note", SearchMode::Literal).unwrap();
        assert_eq!(
            names(&entries),
            vec!["2016-04-22-second-note", "2016-05-02-another-note"]
        );
    }

    #[test]
    fn test_search_normalizes_case_and_spacing() {
        let nb = sample_notebook();
        let expected = vec![
            "2016-07-15-I-have-to-return-some-video-tapes",
            "2016-08-01-So-how-can-you-return-video-tapes",
        ];

        for term in ["video tapes", "video-tapes", "Video Tapes", "Video-tapes"] {
            let entries = search(nb.path(), term, SearchMode::Literal).unwrap();
            assert_eq!(names(&entries), expected, "term {term:?}");
        }
    }

    #[test]
    fn test_search_without_match() {
        let nb = sample_notebook();
        let before = list(nb.path(), SortKey::Name, false).unwrap();

        let err = search(nb.path(), "laserdisc", SearchMode::Literal).unwrap_err();
        assert!(matches!(err, SnoteError::NoMatch(term) if term == "laserdisc"));

        let after = list(nb.path(), SortKey::Name, false).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_literal_search_does_not_interpret_patterns() {
        let nb = sample_notebook();
        assert!(matches!(
            search(nb.path(), "first.post", SearchMode::Literal),
            Err(SnoteError::NoMatch(_))
        ));
    }

    #[test]
    fn test_pattern_search() {
        let nb = sample_notebook();

        let entries = search(nb.path(), "^2016-04-2[23]", SearchMode::Pattern).unwrap();
        assert_eq!(
            names(&entries),
            vec![
                "2016-04-22-first-post",
                "2016-04-22-second-note",
                "2016-04-23-third-entry"
            ]
        );

        let entries = search(nb.path(), "RETURN .* tapes", SearchMode::Pattern).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let nb = sample_notebook();
        assert!(matches!(
            search(nb.path(), "(unclosed", SearchMode::Pattern),
            Err(SnoteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_info_splits_date_and_title() {
        let entry = NoteEntry::new(
            "2016-07-15-I-have-to-return-some-video-tapes.md".to_string(),
            PathBuf::from("/nb/x"),
        );
        assert_eq!(
            entry.info(),
            NoteInfo {
                date: "2016.07.15".to_string(),
                title: "I have to return some video tapes".to_string(),
            }
        );

        let bare = NoteEntry::new("2016-04-22-first-post".to_string(), PathBuf::from("/nb/y"));
        assert_eq!(bare.info().title, "first post");

        let odd = NoteEntry::new("scratch".to_string(), PathBuf::from("/nb/z"));
        assert_eq!(odd.info().date, "scratch");
        assert_eq!(odd.info().title, "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_search_ignores_case_and_separators(
            words in proptest::collection::vec("[a-z]{1,6}", 1..4),
            upper in proptest::collection::vec(any::<bool>(), 4),
        ) {
            let temp = TempDir::new().unwrap();
            let target = format!("2020-01-01-{}.md", words.join("-"));
            std::fs::write(temp.path().join(&target), "").unwrap();
            std::fs::write(temp.path().join("2020-01-02-unrelated-zzzzzzz.md"), "").unwrap();

            let spaced = words.join(" ");
            let shouted: String = words
                .iter()
                .zip(upper.iter().cycle())
                .map(|(w, up)| if *up { w.to_uppercase() } else { w.clone() })
                .collect::<Vec<_>>()
                .join(" ");

            let baseline = search(temp.path(), &words.join("-"), SearchMode::Literal).unwrap();
            for term in [spaced, shouted] {
                let found = search(temp.path(), &term, SearchMode::Literal).unwrap();
                prop_assert_eq!(&found, &baseline);
            }
            prop_assert!(baseline.iter().any(|e| e.name() == target));
        }
    }
}
