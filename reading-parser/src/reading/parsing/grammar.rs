//! Grammar Pattern Definitions
//!
//! Every column grammar is an ordered table of `(name, pattern)` pairs. Patterns
//! are tried in declaration order and the first match wins, so earlier patterns
//! deliberately shadow looser later ones (a `name, #N` segment is a series before
//! it is extra info).
//!
//! Patterns are templates: `%name%` placeholders are filled with the escaped
//! symbols from [`Settings`] and the shared sub-patterns below, then compiled
//! once per [`Grammar`].
//!
//! # Placeholders
//!
//! - `%dnf%`, `%planned%`, `%group%`, `%favorite%`, `%blurb%`, `%private%`: configured markers
//! - `%short%`: the short separator (between author and title, name and URL)
//! - `%progress%`: `NN%`, `pNN`, `NNp` or `h:mm`
//! - `%isbn%`: an ISBN-10, ISBN-13 or ASIN
//! - `%length%`: `NNN[p]` captured as `length_pages`, or `h:mm` as `length_time`

use crate::reading::config::Settings;
use crate::reading::error::ConfigError;
use regex::Regex;

const PROGRESS: &str = r"\d{1,3}%|p\d+|\d+p|\d+:\d\d";

const ISBN: &str = r"(?:\d{3}[-\s]?)?[A-Z\d]{10}";

const LENGTH: &str = r"(?:(?P<length_pages>\d+)p?|(?P<length_time>\d+:\d\d))";

const URL: &str = r"^https?://[^\s,]+$";

/// Optional emoji presentation selector that may trail any marker.
const VARIATION_SELECTOR: &str = r"\x{FE0F}?";

/// Text before the first format marker of a head column.
const HEAD_PREFIX: &[(&str, &str)] = &[(
    "dnf_progress",
    r"^(?:(?P<dnf>%dnf%))?\s*(?:(?P<progress>%progress%))?$",
)];

/// Text before the first format marker of a compact planned row.
const COMPACT_PREFIX: &[(&str, &str)] = &[(
    "genre_label",
    r"^(?P<genres>[^a-z@:]*?)\s*(?P<sources>@[^:]*?)?\s*:?$",
)];

const HEAD_FIRST: &[(&str, &str)] = &[(
    "author_title",
    r"^(?:(?P<dnf>%dnf%)\s+)?(?:(?P<progress>%progress%)\s+)?(?:(?P<author>.+?)\s+%short%\s+)?(?P<title>.*?)$",
)];

const COMPACT_HEAD_FIRST: &[(&str, &str)] = &[(
    "author_title_sources",
    r"^(?:(?P<author>[^@]+?)\s+%short%\s+)?(?P<title>[^@]+?)(?:\s*(?P<sources>@.*))?$",
)];

const SERIES_AND_EXTRA: &[(&str, &str)] = &[
    (
        "series_volume",
        r"^(?P<series_names>.+?),\s*#(?P<series_volumes>\d+)$",
    ),
    ("series", r"^in\s+(?P<series_names>.+?)(?P<series_volumes>)$"),
    ("extra_info", r"^(?P<extra_info>.+)$"),
];

const COMPACT_SERIES_AND_EXTRA: &[(&str, &str)] = &[
    (
        "series_volume",
        r"^(?P<series_names>[^@]+?),\s*#(?P<series_volumes>\d+)(?:\s*(?P<sources>@.*))?$",
    ),
    (
        "series",
        r"^in\s+(?P<series_names>[^@]+?)(?P<series_volumes>)(?:\s*(?P<sources>@.*))?$",
    ),
    (
        "extra_info",
        r"^(?P<extra_info>[^@]+?)(?:\s*(?P<sources>@.*))?$",
    ),
];

const SOURCES_FIRST: &[(&str, &str)] = &[
    (
        "isbn_length",
        r"^(?:(?P<isbn>%isbn%)(?:,?\s+|$))?%length%?$",
    ),
    (
        "sources_isbn_length",
        r"^(?P<sources>.+?)(?:,?\s+(?P<isbn>%isbn%))?(?:,?\s+%length%)?$",
    ),
];

const START_DATES: &[(&str, &str)] = &[(
    "start",
    r"^(?:(?P<start_date>\d{4}/\d\d?/\d\d?))?\s*(?:(?P<dnf>%dnf%)\s*)?(?:@?(?P<progress>%progress%)\s*)?(?:v(?P<variant>\d+)\s*)?(?:%group%\s*(?P<group>.+?))?$",
)];

const END_DATES: &[(&str, &str)] = &[("end", r"^(?P<end_date>\d{4}/\d\d?/\d\d?)?$")];

const GENRES: &[(&str, &str)] = &[("genres", r"^(?P<genres>.+)$")];

const LENGTH_COLUMN: &[(&str, &str)] = &[(
    "length",
    r"^%length%(?:\s+(?P<each>each))?(?:\s*x(?P<repetitions>\d+))?$",
)];

const RATING: &[(&str, &str)] = &[("rating", r"^(?P<rating>\d+(?:\.\d+)?)$")];

const NOTES: &[(&str, &str)] = &[(
    "note",
    r"^(?:(?P<blurb>%blurb%)\s*|(?P<private>%private%)\s*)*(?P<content>.+?)$",
)];

const CUSTOM_NUMERIC: &[(&str, &str)] = &[("number", r"^(?P<value>-?\d+(?:\.\d+)?)$")];

const CUSTOM_TEXT: &[(&str, &str)] = &[("text", r"^(?P<value>.+)$")];

/// History entries. Exceptions are tried first; the entry pattern matches
/// nearly anything, so it must stay last.
const HISTORY_ENTRY: &[(&str, &str)] = &[
    ("exception", r"^not\s+(?P<except_dates>.+)$"),
    (
        "entry",
        concat!(
            r"^(?:v(?P<variant>\d+)\s+)?",
            r"(?:%group%\s*(?P<group>[^\d?.]+)\s+)?",
            r"(?:(?P<planned>%planned%)(?:\s+|$))?",
            r"(?:",
            r"(?:(?:(?P<start_year>\d{4})/)?(?:(?P<start_month>\d\d?)/)?(?P<start_day>\d\d?))?",
            r"(?:(?P<range>\.\.)(?:(?:(?P<end_year>\d{4})/)?(?:(?P<end_month>\d\d?)/)?(?P<end_day>\d\d?))?)?",
            r"(?:\s+|$))?",
            r"(?:(?P<amount>\d+:\d\d|\d+p)(?:\s*x(?P<repetitions>\d+))?(?:/(?P<frequency>day|week|month))?(?:\s+|$))?",
            r"(?:(?P<dnf>%dnf%)(?:\s+|$))?",
            r"(?:@(?P<progress>%progress%)(?:\s+|$))?",
            r"(?:(?P<favorite>%favorite%)\s*)?",
            r"(?P<name>.+?)?$",
        ),
    ),
];

/// A single date or date range inside an exception list.
const HISTORY_DATE: &str = concat!(
    r"^(?:(?:(?P<start_year>\d{4})/)?(?:(?P<start_month>\d\d?)/)?(?P<start_day>\d\d?))",
    r"(?:\.\.(?:(?:(?P<end_year>\d{4})/)?(?:(?P<end_month>\d\d?)/)?(?P<end_day>\d\d?)))?$",
);

/// One named candidate pattern.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: &'static str,
    pub regex: Regex,
}

/// Every pattern the row pipeline uses, compiled from one set of [`Settings`].
#[derive(Debug, Clone)]
pub struct Grammar {
    pub format_marker: Regex,
    pub compact_header: Regex,
    pub config_directive: Regex,
    pub long_separator: Regex,
    pub short_separator: Regex,
    pub group_separator: Regex,
    pub list_separator: Regex,
    pub at_separator: Regex,
    pub isbn: Regex,
    pub url: Regex,
    pub history_date: Regex,

    pub head_prefix: Vec<Candidate>,
    pub compact_prefix: Vec<Candidate>,
    pub head_first: Vec<Candidate>,
    pub compact_head_first: Vec<Candidate>,
    pub series_and_extra: Vec<Candidate>,
    pub compact_series_and_extra: Vec<Candidate>,
    pub sources_first: Vec<Candidate>,
    pub start_dates: Vec<Candidate>,
    pub end_dates: Vec<Candidate>,
    pub genres: Vec<Candidate>,
    pub length: Vec<Candidate>,
    pub rating: Vec<Candidate>,
    pub notes: Vec<Candidate>,
    pub custom_numeric: Vec<Candidate>,
    pub custom_text: Vec<Candidate>,
    pub history_entry: Vec<Candidate>,
}

/// Placeholder values for one set of settings.
struct Symbols {
    replacements: Vec<(&'static str, String)>,
}

impl Symbols {
    fn new(settings: &Settings) -> Self {
        let marker = |symbol: &str| format!("{}{}", regex::escape(symbol), VARIATION_SELECTOR);
        Self {
            replacements: vec![
                ("%dnf%", regex::escape(&settings.dnf_string)),
                ("%planned%", regex::escape(&settings.planned_marker)),
                ("%group%", marker(&settings.markers.group)),
                ("%favorite%", marker(&settings.markers.favorite)),
                ("%blurb%", marker(&settings.markers.blurb)),
                ("%private%", marker(&settings.markers.private)),
                ("%short%", regex::escape(&settings.short_separator)),
                ("%progress%", PROGRESS.to_string()),
                ("%isbn%", ISBN.to_string()),
                ("%length%", LENGTH.to_string()),
            ],
        }
    }

    fn fill(&self, template: &str) -> String {
        self.replacements
            .iter()
            .fold(template.to_string(), |pattern, (placeholder, value)| {
                pattern.replace(placeholder, value)
            })
    }

    fn compile(&self, table: &[(&'static str, &str)]) -> Result<Vec<Candidate>, ConfigError> {
        table
            .iter()
            .map(|&(name, template)| {
                Ok::<_, ConfigError>(Candidate {
                    name,
                    regex: Regex::new(&self.fill(template))?,
                })
            })
            .collect()
    }
}

/// `\s+SEP\s+`, so a separator only counts with whitespace on both sides.
fn spaced(separator: &str) -> Result<Regex, ConfigError> {
    Ok(Regex::new(&format!(r"\s+{}\s+", regex::escape(separator)))?)
}

impl Grammar {
    pub fn compile(settings: &Settings) -> Result<Self, ConfigError> {
        let symbols = Symbols::new(settings);

        // Longest symbols first so a marker is never shadowed by its own prefix.
        let mut markers: Vec<&String> = settings.formats.values().collect();
        markers.sort_by_key(|symbol| std::cmp::Reverse(symbol.len()));
        let alternation = markers
            .iter()
            .map(|symbol| regex::escape(symbol))
            .collect::<Vec<_>>()
            .join("|");
        let format_marker = Regex::new(&format!("(?:{}){}", alternation, VARIATION_SELECTOR))?;

        Ok(Self {
            format_marker,
            compact_header: Regex::new(r"^\s*[^a-z@:]*?\s*(?:@[^:]*?)?\s*:?\s*$")?,
            config_directive: Regex::new(r"^\s*config:")?,
            long_separator: spaced(&settings.long_separator)?,
            short_separator: spaced(&settings.short_separator)?,
            group_separator: spaced(&settings.group_separator)?,
            list_separator: Regex::new(&format!(
                r"\s*{}\s*",
                regex::escape(&settings.list_separator)
            ))?,
            at_separator: Regex::new(r"\s*@\s*")?,
            isbn: Regex::new(&format!("^{}$", ISBN))?,
            url: Regex::new(URL)?,
            history_date: Regex::new(HISTORY_DATE)?,

            head_prefix: symbols.compile(HEAD_PREFIX)?,
            compact_prefix: symbols.compile(COMPACT_PREFIX)?,
            head_first: symbols.compile(HEAD_FIRST)?,
            compact_head_first: symbols.compile(COMPACT_HEAD_FIRST)?,
            series_and_extra: symbols.compile(SERIES_AND_EXTRA)?,
            compact_series_and_extra: symbols.compile(COMPACT_SERIES_AND_EXTRA)?,
            sources_first: symbols.compile(SOURCES_FIRST)?,
            start_dates: symbols.compile(START_DATES)?,
            end_dates: symbols.compile(END_DATES)?,
            genres: symbols.compile(GENRES)?,
            length: symbols.compile(LENGTH_COLUMN)?,
            rating: symbols.compile(RATING)?,
            notes: symbols.compile(NOTES)?,
            custom_numeric: symbols.compile(CUSTOM_NUMERIC)?,
            custom_text: symbols.compile(CUSTOM_TEXT)?,
            history_entry: symbols.compile(HISTORY_ENTRY)?,
        })
    }

    /// Whether a whole token looks like an ISBN or ASIN.
    pub fn is_isbn(&self, token: &str) -> bool {
        self.isbn.is_match(token.trim())
    }

    pub fn is_url(&self, token: &str) -> bool {
        self.url.is_match(token.trim())
    }
}
