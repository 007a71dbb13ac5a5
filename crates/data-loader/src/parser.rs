//! Parser for the catalog and rating CSV files.
//!
//! - catalog: one item per row, IMDB-style columns
//!   (`Series_Title,Genre,Director,Star1..Star4,Overview,Poster_Link,...`)
//! - ratings: `usuario_id,filme_id,avaliacao` (or `user_id,item_id,label`)
//!
//! The catalog is parsed leniently: unknown columns are ignored and
//! missing columns or short rows produce empty fields. The rating source
//! is parsed strictly and reports the offending line.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::path::Path;

const TITLE_COLUMNS: &[&str] = &["series_title", "title"];
const GENRE_COLUMNS: &[&str] = &["genre", "genres"];
const DIRECTOR_COLUMNS: &[&str] = &["director"];
const STAR_COLUMNS: &[&str] = &["star1", "star2", "star3", "star4"];
const CAST_COLUMNS: &[&str] = &["cast"];
const SYNOPSIS_COLUMNS: &[&str] = &["overview", "synopsis"];
const POSTER_COLUMNS: &[&str] = &["poster_link", "poster"];
const YEAR_COLUMNS: &[&str] = &["released_year", "year"];

const USER_COLUMNS: &[&str] = &["usuario_id", "user_id"];
const ITEM_COLUMNS: &[&str] = &["filme_id", "item_id"];
const LABEL_COLUMNS: &[&str] = &["avaliacao", "label"];

/// One CSV record and the line it starts on (1-based)
#[derive(Debug, Clone, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Read a whole file as UTF-8, replacing invalid sequences.
fn read_to_string_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Split CSV content into records.
///
/// Handles quoted fields, doubled quotes inside quoted fields and line
/// breaks inside quotes. Blank lines are skipped.
fn split_records(content: &str) -> Vec<Record> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    records
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(Record { line, fields });
    }
}

/// Position of the first header matching one of `names` (case-insensitive)
fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header.iter().position(|column| {
        let column = column.trim().to_lowercase();
        names.iter().any(|name| column == *name)
    })
}

/// Field at `column`, trimmed; empty when the column or the field is missing
fn field<'a>(record: &'a Record, column: Option<usize>) -> &'a str {
    column
        .and_then(|c| record.fields.get(c))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Column layout of a catalog file, resolved from its header row
struct CatalogColumns {
    title: Option<usize>,
    genre: Option<usize>,
    director: Option<usize>,
    stars: Vec<usize>,
    cast: Option<usize>,
    synopsis: Option<usize>,
    poster: Option<usize>,
    year: Option<usize>,
}

impl CatalogColumns {
    fn from_header(header: &[String]) -> Self {
        Self {
            title: find_column(header, TITLE_COLUMNS),
            genre: find_column(header, GENRE_COLUMNS),
            director: find_column(header, DIRECTOR_COLUMNS),
            stars: STAR_COLUMNS
                .iter()
                .filter_map(|name| find_column(header, &[name]))
                .collect(),
            cast: find_column(header, CAST_COLUMNS),
            synopsis: find_column(header, SYNOPSIS_COLUMNS),
            poster: find_column(header, POSTER_COLUMNS),
            year: find_column(header, YEAR_COLUMNS),
        }
    }

    fn item(&self, record: &Record) -> Item {
        let mut cast: Vec<String> = self
            .stars
            .iter()
            .map(|&c| field(record, Some(c)))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        cast.extend(split_list(field(record, self.cast), '|'));

        let poster = field(record, self.poster);

        Item {
            title: field(record, self.title).to_string(),
            genres: split_list(field(record, self.genre), ','),
            director: field(record, self.director).to_string(),
            cast,
            synopsis: field(record, self.synopsis).to_string(),
            poster_link: (!poster.is_empty()).then(|| poster.to_string()),
            year: field(record, self.year).parse().ok(),
        }
    }
}

/// Parse the catalog file
pub fn parse_catalog(path: &Path) -> Result<Vec<Item>> {
    let content = read_to_string_lossy(path)?;
    parse_catalog_str(&content, &path.display().to_string())
}

/// Parse catalog CSV content.
///
/// `source_name` only appears in error messages.
pub fn parse_catalog_str(content: &str, source_name: &str) -> Result<Vec<Item>> {
    let mut records = split_records(content).into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => {
            return Err(DataLoadError::EmptyCatalog {
                source_name: source_name.to_string(),
            });
        }
    };

    let columns = CatalogColumns::from_header(&header.fields);
    let items: Vec<Item> = records.map(|record| columns.item(&record)).collect();

    if items.is_empty() {
        return Err(DataLoadError::EmptyCatalog {
            source_name: source_name.to_string(),
        });
    }
    Ok(items)
}

/// Parse the ratings file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let content = read_to_string_lossy(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_ratings_str(&content, &file_name)
}

/// Parse rating CSV content.
///
/// Rows are returned in file order; duplicates are resolved by
/// [`RatingLog`](crate::RatingLog), where the later row wins.
pub fn parse_ratings_str(content: &str, file: &str) -> Result<Vec<Rating>> {
    let mut records = split_records(content).into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let missing = |name: &str| DataLoadError::ParseError {
        file: file.to_string(),
        line: header.line,
        reason: format!("Missing {} column", name),
    };
    let user_col = find_column(&header.fields, USER_COLUMNS).ok_or_else(|| missing("user"))?;
    let item_col = find_column(&header.fields, ITEM_COLUMNS).ok_or_else(|| missing("item"))?;
    let label_col = find_column(&header.fields, LABEL_COLUMNS).ok_or_else(|| missing("label"))?;

    let mut ratings = Vec::new();
    for record in records {
        let parse_error = |reason: String| DataLoadError::ParseError {
            file: file.to_string(),
            line: record.line,
            reason,
        };

        let user_id: UserId = field(&record, Some(user_col))
            .parse()
            .map_err(|e| parse_error(format!("Invalid userId: {}", e)))?;
        let item_id: ItemId = field(&record, Some(item_col))
            .parse()
            .map_err(|e| parse_error(format!("Invalid itemId: {}", e)))?;
        let raw_label: i64 = field(&record, Some(label_col))
            .parse()
            .map_err(|e| parse_error(format!("Invalid label: {}", e)))?;
        let label = RatingLabel::try_from(raw_label)
            .map_err(|_| parse_error(format!("Label must be 0 or 1, got {}", raw_label)))?;

        ratings.push(Rating::new(user_id, item_id, label));
    }
    Ok(ratings)
}
