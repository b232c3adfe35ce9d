// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Provenance header embedded in a lesson's free-text annotation.
//!
//! The annotation is stored as a single string. The current encoding is:
//!
//! ```text
//! **Klassenbuch-Eintrag**
//! (SCH: 21.08.24, 08:10; zuletzt: MÜL 09:15)
//!
//! <free text body>
//! ```
//!
//! Two older encodings are still read:
//!
//! ```text
//! **Klassenbuch-Eintrag:**
//! (SCH: 21.08.24, 08:10)
//!
//! <body>
//! ```
//!
//! ```text
//! Klassenbuch-Eintrag
//! (IMü: 20.08.25 14:30):
//!
//! <body>
//! ```
//!
//! Decoding is total: anything that does not match one of the header grammars
//! is returned unchanged as the body. Line endings inside the header block may
//! be `\r\n`; the body is always returned byte for byte.
//!
//! Abbreviations written into a header are checked by [`validate_abbreviation`]
//! so that every encoded header decodes again.

use crate::Actor;
use klassenbuch_domain::{ClockTime, DomainError, Timestamp};
use serde::{Deserialize, Serialize};

/// The record type named in every annotation header.
pub const ENTRY_LABEL: &str = "Klassenbuch-Eintrag";

const CURRENT_LABEL_LINE: &str = "**Klassenbuch-Eintrag**";
const COLON_LABEL_LINE: &str = "**Klassenbuch-Eintrag:**";
const LAST_EDIT_KEYWORD: &str = "zuletzt";

/// Which grammar an annotation was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationFormat {
    /// Bold label line followed by a parenthesized provenance clause.
    Current,
    /// Bold label with a trailing colon.
    ColonSuffixed,
    /// Unformatted label with a colon-terminated provenance line.
    Legacy,
    /// No header; the whole text is the body.
    Plain,
}

/// The most recent edit of an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEdit {
    /// Abbreviation of the editor.
    pub by: String,
    /// When the edit was made.
    pub at: Timestamp,
}

/// Who took attendance, when, and who last edited it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceHeader {
    /// Abbreviation of the person who first created the entry.
    pub created_by: String,
    /// When the entry was first created.
    pub created_at: Timestamp,
    /// The most recent edit, if the entry has been edited.
    pub last_edit: Option<LastEdit>,
}

impl ProvenanceHeader {
    /// Creates a header for a fresh entry.
    #[must_use]
    pub const fn new(created_by: String, created_at: Timestamp) -> Self {
        Self {
            created_by,
            created_at,
            last_edit: None,
        }
    }

    /// Returns a copy with the last-edit clause replaced.
    ///
    /// The creator and creation time never change.
    #[must_use]
    pub fn edited(&self, editor: String, at: Timestamp) -> Self {
        Self {
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            last_edit: Some(LastEdit { by: editor, at }),
        }
    }

    /// Renders the parenthesized provenance clause.
    ///
    /// The last-edit time omits the date when it matches the creation date.
    #[must_use]
    pub fn render_clause(&self) -> String {
        let mut clause: String = format!(
            "({}: {}",
            self.created_by,
            format_timestamp(self.created_at)
        );

        if let Some(edit) = &self.last_edit {
            let when: String = if edit.at.date() == self.created_at.date() {
                ClockTime::from(edit.at.time()).to_string()
            } else {
                format_timestamp(edit.at)
            };
            clause.push_str(&format!("; {LAST_EDIT_KEYWORD}: {} {when}", edit.by));
        }

        clause.push(')');
        clause
    }
}

/// The result of decoding a stored annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAnnotation {
    /// The free-text body.
    pub body: String,
    /// The provenance header, if one was recognized.
    pub header: Option<ProvenanceHeader>,
    /// The grammar the input matched.
    pub format: AnnotationFormat,
}

impl DecodedAnnotation {
    /// Returns whether a provenance header was recognized.
    #[must_use]
    pub const fn has_header(&self) -> bool {
        self.header.is_some()
    }
}

/// A structured annotation: optional provenance plus free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotation {
    /// The provenance header.
    pub header: Option<ProvenanceHeader>,
    /// The free-text body.
    pub body: String,
}

impl Annotation {
    /// Decodes any supported stored form.
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        decode(raw).into()
    }

    /// Encodes into the current stored form.
    ///
    /// Without a header the body is stored as is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAbbreviation` if the creator or editor
    /// abbreviation cannot be read back from the header.
    pub fn encode(&self) -> Result<String, DomainError> {
        match &self.header {
            Some(header) => encode_with_header(&self.body, header),
            None => Ok(self.body.clone()),
        }
    }

    /// Records that `actor` saved this annotation at `now`.
    ///
    /// The first save creates the header; later saves only replace the
    /// last-edit clause, so the original creator is preserved.
    #[must_use]
    pub fn touch(self, actor: &Actor, now: Timestamp) -> Self {
        let header: ProvenanceHeader = match self.header {
            Some(existing) => existing.edited(actor.abbreviation.clone(), now),
            None => ProvenanceHeader::new(actor.abbreviation.clone(), now),
        };
        Self {
            header: Some(header),
            body: self.body,
        }
    }

    /// Replaces the body, keeping the header.
    #[must_use]
    pub fn with_body(self, body: String) -> Self {
        Self {
            header: self.header,
            body,
        }
    }
}

impl From<DecodedAnnotation> for Annotation {
    fn from(decoded: DecodedAnnotation) -> Self {
        Self {
            header: decoded.header,
            body: decoded.body,
        }
    }
}

/// Encodes a body with a provenance header in the current format.
///
/// `last_edit` is `(editor, edited_at)`.
///
/// # Errors
///
/// Returns `DomainError::InvalidAbbreviation` if either abbreviation fails
/// [`validate_abbreviation`].
pub fn encode(
    body: &str,
    created_by: &str,
    created_at: Timestamp,
    last_edit: Option<(&str, Timestamp)>,
) -> Result<String, DomainError> {
    let header: ProvenanceHeader = ProvenanceHeader {
        created_by: created_by.to_string(),
        created_at,
        last_edit: last_edit.map(|(by, at)| LastEdit {
            by: by.to_string(),
            at,
        }),
    };
    encode_with_header(body, &header)
}

fn encode_with_header(body: &str, header: &ProvenanceHeader) -> Result<String, DomainError> {
    validate_abbreviation(&header.created_by)?;
    if let Some(edit) = &header.last_edit {
        validate_abbreviation(&edit.by)?;
    }
    Ok(format!(
        "{CURRENT_LABEL_LINE}\n{}\n\n{body}",
        header.render_clause()
    ))
}

/// Checks that an abbreviation survives a header round trip.
///
/// # Errors
///
/// Returns `DomainError::InvalidAbbreviation` for an empty or padded
/// abbreviation and for one containing `;` or a line break.
pub fn validate_abbreviation(abbreviation: &str) -> Result<(), DomainError> {
    let readable: bool = !abbreviation.is_empty()
        && abbreviation.trim() == abbreviation
        && !abbreviation.contains([';', '\n', '\r']);
    if readable {
        Ok(())
    } else {
        Err(DomainError::InvalidAbbreviation(abbreviation.to_string()))
    }
}

/// A header recognized by one of the grammar parsers.
struct ParsedHeader {
    header: ProvenanceHeader,
    body: String,
}

type HeaderParser = fn(&str) -> Option<ParsedHeader>;

/// Header grammars in priority order.
const PARSERS: [(AnnotationFormat, HeaderParser); 3] = [
    (AnnotationFormat::Current, parse_current),
    (AnnotationFormat::ColonSuffixed, parse_colon_suffixed),
    (AnnotationFormat::Legacy, parse_legacy),
];

/// Decodes a stored annotation.
///
/// Never fails: unrecognized input is returned whole as the body.
#[must_use]
pub fn decode(raw: &str) -> DecodedAnnotation {
    PARSERS
        .iter()
        .find_map(|(format, parser)| {
            parser(raw).map(|parsed| DecodedAnnotation {
                body: parsed.body,
                header: Some(parsed.header),
                format: *format,
            })
        })
        .unwrap_or_else(|| DecodedAnnotation {
            body: raw.to_string(),
            header: None,
            format: AnnotationFormat::Plain,
        })
}

/// Splits the header block (up to the first blank line) from the body.
///
/// Returns the header lines with any `\r` removed and the untouched body.
fn split_block(raw: &str) -> (Vec<&str>, &str) {
    let blank_line: Option<(usize, usize)> = ["\n\n", "\n\r\n"]
        .iter()
        .filter_map(|separator| raw.find(separator).map(|at| (at, separator.len())))
        .min_by_key(|(at, _)| *at);

    let (block, body) = match blank_line {
        Some((at, len)) => (&raw[..at], &raw[at + len..]),
        None => (raw.trim_end_matches(['\n', '\r']), ""),
    };
    (
        block
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect(),
        body,
    )
}

fn parse_current(raw: &str) -> Option<ParsedHeader> {
    let (lines, body) = split_block(raw);
    let [label, clause] = lines.as_slice() else {
        return None;
    };
    if label.trim_end() != CURRENT_LABEL_LINE {
        return None;
    }

    let clause: &str = clause.trim();
    let inner: &str = clause.strip_prefix('(')?.strip_suffix(')')?;
    Some(ParsedHeader {
        header: parse_provenance(inner)?,
        body: body.to_string(),
    })
}

fn parse_colon_suffixed(raw: &str) -> Option<ParsedHeader> {
    let (lines, body) = split_block(raw);
    let [label, clause] = lines.as_slice() else {
        return None;
    };
    if label.trim_end() != COLON_LABEL_LINE {
        return None;
    }

    Some(ParsedHeader {
        header: parse_provenance(strip_parens(clause.trim())?)?,
        body: body.to_string(),
    })
}

fn parse_legacy(raw: &str) -> Option<ParsedHeader> {
    let (lines, body) = split_block(raw);
    let [label, clause] = lines.as_slice() else {
        return None;
    };
    if label.trim_end().trim_end_matches(':') != ENTRY_LABEL {
        return None;
    }

    let clause: &str = clause.trim();
    let clause: &str = clause.strip_suffix(':').unwrap_or(clause);
    Some(ParsedHeader {
        header: parse_provenance(strip_parens(clause.trim_end())?)?,
        body: body.to_string(),
    })
}

/// Removes optional surrounding parentheses. Unbalanced parentheses fail.
fn strip_parens(clause: &str) -> Option<&str> {
    match (clause.strip_prefix('('), clause.ends_with(')')) {
        (Some(rest), true) => rest.strip_suffix(')'),
        (None, false) => Some(clause),
        _ => None,
    }
}

/// Parses `creator: timestamp[; zuletzt: editor time]`.
fn parse_provenance(inner: &str) -> Option<ProvenanceHeader> {
    let mut clauses = inner.split(';');
    let creation: &str = clauses.next()?;
    let last_edit_clause: Option<&str> = clauses.next();
    if clauses.next().is_some() {
        return None;
    }

    // The creator may itself contain ':'; a timestamp holds exactly one, so
    // only one split leaves a valid timestamp behind.
    let (created_by, created_at) = creation.match_indices(':').find_map(|(at, _)| {
        let created_at: Timestamp = parse_timestamp(&creation[at + 1..])?;
        Some((creation[..at].trim(), created_at))
    })?;
    if created_by.is_empty() {
        return None;
    }

    let last_edit: Option<LastEdit> = match last_edit_clause {
        Some(clause) => Some(parse_last_edit(clause, created_at)?),
        None => None,
    };

    Some(ProvenanceHeader {
        created_by: created_by.to_string(),
        created_at,
        last_edit,
    })
}

/// Parses `zuletzt: editor HH:MM` or `zuletzt: editor DD.MM.YY, HH:MM`.
///
/// A bare time takes its date from the creation timestamp.
fn parse_last_edit(clause: &str, created_at: Timestamp) -> Option<LastEdit> {
    let rest: &str = clause
        .trim()
        .strip_prefix(LAST_EDIT_KEYWORD)?
        .trim_start()
        .strip_prefix(':')?
        .trim();

    // Editor names may contain spaces; take the shortest name followed by a
    // valid time or timestamp.
    rest.char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .find_map(|(split, _)| {
            let editor: &str = rest[..split].trim();
            let when: &str = rest[split..].trim();
            if editor.is_empty() {
                return None;
            }

            let at: Timestamp = parse_timestamp(when).or_else(|| {
                let clock: ClockTime = when.parse().ok()?;
                Some(Timestamp::new(created_at.date(), to_time(clock)?))
            })?;

            Some(LastEdit {
                by: editor.to_string(),
                at,
            })
        })
}

/// Formats a timestamp as `DD.MM.YY, HH:MM`.
#[must_use]
pub fn format_timestamp(at: Timestamp) -> String {
    format!(
        "{:02}.{:02}.{:02}, {:02}:{:02}",
        at.day(),
        u8::from(at.month()),
        at.year().rem_euclid(100),
        at.hour(),
        at.minute()
    )
}

/// Parses `DD.MM.YY, HH:MM` or `DD.MM.YY HH:MM`.
///
/// Two-digit years are in the 2000s; four-digit years are taken as is.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw: &str = raw.trim();
    let (date_part, time_part) = raw
        .split_once(',')
        .or_else(|| raw.split_once(char::is_whitespace))?;

    let mut fields = date_part.trim().split('.');
    let day: &str = fields.next()?;
    let month: &str = fields.next()?;
    let year: &str = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let numeric = |field: &str, lengths: &[usize]| -> Option<u16> {
        if !lengths.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        field.parse().ok()
    };

    let day: u8 = u8::try_from(numeric(day, &[1, 2])?).ok()?;
    let month: time::Month = time::Month::try_from(u8::try_from(numeric(month, &[1, 2])?).ok()?).ok()?;
    let year: i32 = match year.len() {
        2 => 2000 + i32::from(numeric(year, &[2])?),
        _ => i32::from(numeric(year, &[4])?),
    };

    let date: time::Date = time::Date::from_calendar_date(year, month, day).ok()?;
    let clock: ClockTime = time_part.trim().parse().ok()?;
    Some(Timestamp::new(date, to_time(clock)?))
}

fn to_time(clock: ClockTime) -> Option<time::Time> {
    time::Time::from_hms(clock.hour(), clock.minute(), 0).ok()
}
