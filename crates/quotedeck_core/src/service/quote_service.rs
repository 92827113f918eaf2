//! Quote store controller.
//!
//! # Responsibility
//! - Own the in-memory quote collection and mirror it to persistent
//!   key-value storage on every mutation.
//! - Derive dependent view state: category list, filtered subsets, random
//!   picks, last-shown session value.
//! - Merge externally supplied quotes, deduplicating by exact text.
//!
//! # Invariants
//! - The add path stores trimmed, non-empty fields only.
//! - Every failure path leaves both the in-memory collection and storage in
//!   their prior state.
//! - A selected category absent from the collection degrades to "all".

use crate::model::quote::{default_quotes, Quote, QuoteValidationError, CATEGORY_ALL};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::repo::session_store::SessionStore;
use log::warn;
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persistent key holding the JSON-serialized quote collection.
pub const QUOTES_KEY: &str = "quotes";
/// Persistent key holding the active category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the most recently shown quote.
pub const LAST_QUOTE_KEY: &str = "lastQuote";

pub type ServiceResult<T> = Result<T, QuoteStoreError>;

/// Import payload rejection reasons.
#[derive(Debug)]
pub enum FormatError {
    /// Payload is not valid JSON.
    Parse(serde_json::Error),
    /// Top-level JSON value is not an array.
    NotAnArray,
    /// Array element at `index` is not a quote-shaped object.
    BadElement { index: usize },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid JSON: {err}"),
            Self::NotAnArray => write!(f, "expected a JSON array of quotes"),
            Self::BadElement { index } => {
                write!(f, "element {index} is not a quote object")
            }
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Controller-level error umbrella.
#[derive(Debug)]
pub enum QuoteStoreError {
    /// Empty required field on the add path.
    Validation(QuoteValidationError),
    /// Import payload rejected before any mutation.
    Format(FormatError),
    /// Collection could not be serialized for persistence or export.
    Serialize(serde_json::Error),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for QuoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "could not serialize quote collection: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<QuoteValidationError> for QuoteStoreError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormatError> for QuoteStoreError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<RepoError> for QuoteStoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one remote merge round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Candidates supplied by the remote source.
    pub candidates: usize,
    /// Quotes actually appended (text absent before the merge began).
    pub merged: usize,
}

impl MergeReport {
    pub fn has_changes(&self) -> bool {
        self.merged > 0
    }
}

/// Quote store controller over a key-value repository.
///
/// Single owner of the collection: every mutation runs as one
/// read-modify-persist step against the injected repository.
pub struct QuoteService<R: KvRepository> {
    repo: R,
    session: SessionStore,
    quotes: Vec<Quote>,
    selected_category: String,
}

impl<R: KvRepository> QuoteService<R> {
    /// Loads controller state from the repository.
    ///
    /// Missing or malformed persisted values degrade to defaults instead of
    /// failing: external actors may clear or edit the store out of band. A
    /// stored category filter that no longer matches any quote is reset to
    /// "all" and the reset is persisted.
    pub fn load(repo: R) -> ServiceResult<Self> {
        let quotes = match repo.get(QUOTES_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(stored) => stored,
                Err(err) => {
                    warn!(
                        "event=load module=service status=degraded reason=malformed_quotes error={err}"
                    );
                    default_quotes()
                }
            },
            None => default_quotes(),
        };

        let mut service = Self {
            repo,
            session: SessionStore::new(),
            quotes,
            selected_category: CATEGORY_ALL.to_string(),
        };

        match service.repo.get(SELECTED_CATEGORY_KEY)? {
            Some(stored) if service.is_selectable(&stored) => {
                service.selected_category = stored;
            }
            Some(stale) => {
                warn!(
                    "event=load module=service status=degraded reason=stale_filter value={stale}"
                );
                service.repo.set(SELECTED_CATEGORY_KEY, CATEGORY_ALL)?;
            }
            None => {}
        }

        Ok(service)
    }

    /// Appends a validated quote and persists the collection.
    ///
    /// Both fields are trimmed; empty-after-trim input fails validation and
    /// mutates nothing. Returns the stored quote.
    pub fn add(&mut self, text: &str, category: &str) -> ServiceResult<Quote> {
        let quote = Quote::new(text, category)?;

        self.quotes.push(quote.clone());
        match self.save() {
            Ok(()) => Ok(quote),
            Err(err) => {
                self.quotes.pop();
                Err(err)
            }
        }
    }

    /// Imports a JSON array of quotes, appending every element.
    ///
    /// The payload must be an array of objects carrying string `text` and
    /// `category` fields (extra fields are ignored). Content is not
    /// validated: empty or duplicate texts pass straight through. A rejected
    /// payload appends nothing.
    pub fn import_json(&mut self, raw: &str) -> ServiceResult<usize> {
        let value: Value = serde_json::from_str(raw).map_err(FormatError::Parse)?;
        let Value::Array(elements) = value else {
            return Err(FormatError::NotAnArray.into());
        };

        let mut imported = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let quote: Quote = serde_json::from_value(element)
                .map_err(|_| FormatError::BadElement { index })?;
            imported.push(quote);
        }

        let count = imported.len();
        let prior_len = self.quotes.len();
        self.quotes.extend(imported);
        match self.save() {
            Ok(()) => Ok(count),
            Err(err) => {
                self.quotes.truncate(prior_len);
                Err(err)
            }
        }
    }

    /// Serializes the full collection as indented JSON. Pure.
    pub fn export_json(&self) -> ServiceResult<String> {
        serde_json::to_string_pretty(&self.quotes).map_err(QuoteStoreError::Serialize)
    }

    /// Returns "all" followed by distinct categories in first-encounter
    /// order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categories = vec![CATEGORY_ALL.to_string()];

        for quote in &self.quotes {
            if seen.insert(quote.category.as_str()) {
                categories.push(quote.category.clone());
            }
        }

        categories
    }

    /// Returns the subset matching `category`, or everything for "all".
    ///
    /// An empty result is a valid state ("no quotes in this category"), not
    /// an error.
    pub fn filter(&self, category: &str) -> Vec<&Quote> {
        if category == CATEGORY_ALL {
            return self.quotes.iter().collect();
        }

        self.quotes
            .iter()
            .filter(|quote| quote.category == category)
            .collect()
    }

    /// Draws a uniformly random quote from the filtered subset.
    ///
    /// Returns `None` when the subset is empty. A successful draw is
    /// recorded in the session store as the last shown quote. Draws are not
    /// seeded or reproducible.
    pub fn pick_random(&mut self, category: &str) -> Option<Quote> {
        let quote = {
            let filtered = self.filter(category);
            if filtered.is_empty() {
                return None;
            }
            let index = rand::thread_rng().gen_range(0..filtered.len());
            filtered[index].clone()
        };

        match serde_json::to_string(&quote) {
            Ok(json) => self.session.set(LAST_QUOTE_KEY, json),
            Err(err) => warn!(
                "event=pick_random module=service status=degraded reason=session_encode error={err}"
            ),
        }

        Some(quote)
    }

    /// Returns the last randomly shown quote of this session, if any.
    pub fn last_shown(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_QUOTE_KEY)?;
        serde_json::from_str(raw).ok()
    }

    /// Merges candidate quotes fetched from a remote source.
    ///
    /// A candidate survives when its exact text is absent from the
    /// collection as of the start of the merge; survivors are appended in
    /// candidate order. Storage is rewritten only when something survived.
    pub fn merge_remote(&mut self, candidates: Vec<Quote>) -> ServiceResult<MergeReport> {
        let mut report = MergeReport {
            candidates: candidates.len(),
            merged: 0,
        };

        let known: HashSet<&str> = self.quotes.iter().map(|quote| quote.text.as_str()).collect();
        let fresh: Vec<Quote> = candidates
            .into_iter()
            .filter(|candidate| !known.contains(candidate.text.as_str()))
            .collect();

        if fresh.is_empty() {
            return Ok(report);
        }

        report.merged = fresh.len();
        let prior_len = self.quotes.len();
        self.quotes.extend(fresh);
        match self.save() {
            Ok(()) => Ok(report),
            Err(err) => {
                self.quotes.truncate(prior_len);
                Err(err)
            }
        }
    }

    /// Active category filter, degrading to "all" when the stored selection
    /// no longer matches any quote.
    pub fn selected_category(&self) -> &str {
        if self.is_selectable(&self.selected_category) {
            self.selected_category.as_str()
        } else {
            CATEGORY_ALL
        }
    }

    /// Persists a new category filter.
    ///
    /// Unknown categories are accepted: filtering an absent category is a
    /// valid empty view, and the getter degrades to "all" once the value
    /// goes stale.
    pub fn set_selected_category(&mut self, category: &str) -> ServiceResult<()> {
        self.repo.set(SELECTED_CATEGORY_KEY, category)?;
        self.selected_category = category.to_string();
        Ok(())
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    fn is_selectable(&self, category: &str) -> bool {
        category == CATEGORY_ALL || self.quotes.iter().any(|quote| quote.category == category)
    }

    fn save(&self) -> ServiceResult<()> {
        let json = serde_json::to_string(&self.quotes).map_err(QuoteStoreError::Serialize)?;
        self.repo.set(QUOTES_KEY, &json)?;
        Ok(())
    }
}
