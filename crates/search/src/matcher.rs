//! Matcher builder: free-text query to prioritized scoring rules
//!
//! A query expands into a list of [`Matcher`]s, each a `(predicate, score)`
//! pair. Matchers are ordered by score (highest first) and split into two
//! independent priority chains:
//!
//! - **literal**: tested against an entry's `value`, case-insensitively
//! - **phonetic**: tested against an entry's `metaphone` codes, verbatim
//!
//! Within a chain the first matcher that fires wins; scores never stack
//! inside one chain. Both chains contribute to the entry's score.
//!
//! | Rule                         | Condition       | Score            |
//! |------------------------------|-----------------|------------------|
//! | whole query exact            | always          | 100              |
//! | whole query prefix           | len > 2         | 40               |
//! | whole query contains         | len > 3         | 30               |
//! | piece prefix                 | piece len > 2   | min(15, len * 8) |
//! | piece exact                  | piece len > 2   | min(40, len * 8) |
//! | piece contains               | piece len > 2   | min(20, len * 8) |
//! | phonetic exact/prefix/contains | piece len >= 4 | 15 / 8 / 2      |

use lodestar_core::entry::fields;
use lodestar_core::{Condition, IndexEntry, Pattern, Result, Selector};

use crate::phonetic::{self, MIN_PHONETIC_LEN};
use crate::tokenizer::{self, char_len};

/// Minimum piece length (exclusive) for per-piece literal matchers
pub const MIN_PIECE_LEN: usize = 3;

/// Which entry field a matcher operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// The entry's literal value
    Literal,
    /// The entry's phonetic codes
    Phonetic,
}

impl Track {
    /// Name of the entry field this track reads
    pub fn field(self) -> &'static str {
        match self {
            Track::Literal => fields::VALUE,
            Track::Phonetic => fields::METAPHONE,
        }
    }
}

/// How a matcher compares its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Whole field equals the value
    Exact,
    /// Field starts with the value
    Prefix,
    /// Field contains the value
    Contains,
}

/// A named scoring rule
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Rule name, for diagnostics
    pub name: &'static str,
    /// Field track
    pub track: Track,
    /// Comparison kind
    pub kind: MatchKind,
    /// Text compared against the field (query, piece or phonetic code)
    pub value: String,
    /// Score contribution when the rule fires
    pub score: f64,
    needle: String,
    pattern: Option<Pattern>,
}

impl Matcher {
    fn literal(name: &'static str, kind: MatchKind, value: &str, score: f64) -> Result<Self> {
        Self::new(name, Track::Literal, kind, value, score)
    }

    fn phonetic(name: &'static str, kind: MatchKind, code: &str, score: f64) -> Result<Self> {
        Self::new(name, Track::Phonetic, kind, code, score)
    }

    fn new(
        name: &'static str,
        track: Track,
        kind: MatchKind,
        value: &str,
        score: f64,
    ) -> Result<Self> {
        let pattern = match kind {
            MatchKind::Exact => None,
            MatchKind::Prefix => Some(Pattern::prefix(value)?),
            MatchKind::Contains => Some(Pattern::contains(value)?),
        };
        let needle = match track {
            Track::Literal => value.to_lowercase(),
            Track::Phonetic => value.to_string(),
        };
        Ok(Matcher {
            name,
            track,
            kind,
            value: value.to_string(),
            score,
            needle,
            pattern,
        })
    }

    /// Pattern used by the candidate selector, `None` for exact matchers
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Test a field value against this rule
    pub fn is_match(&self, text: &str) -> bool {
        let folded;
        let haystack = match self.track {
            Track::Literal => {
                folded = text.to_lowercase();
                folded.as_str()
            }
            Track::Phonetic => text,
        };
        match self.kind {
            MatchKind::Exact => haystack == self.needle,
            MatchKind::Prefix => haystack.starts_with(&self.needle),
            MatchKind::Contains => haystack.contains(&self.needle),
        }
    }

    /// Raw store conditions that select entries this rule could match
    fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        let field = self.track.field();
        std::iter::once(Condition::eq(field, self.value.as_str())).chain(
            self.pattern
                .iter()
                .map(move |p| Condition::matches(field, p.clone())),
        )
    }
}

/// Ordered matchers of one track; the first that fires wins
#[derive(Debug, Clone, Default)]
pub struct PriorityChain {
    matchers: Vec<Matcher>,
}

impl PriorityChain {
    /// Score of the first matcher that fires, 0 when none does or the field is absent
    pub fn evaluate(&self, text: Option<&str>) -> f64 {
        let Some(text) = text else {
            return 0.0;
        };
        self.matchers
            .iter()
            .find(|m| m.is_match(text))
            .map_or(0.0, |m| m.score)
    }

    /// Matchers in priority order
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Number of matchers
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether the chain has no matchers
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Per-entry scores of both tracks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryScore {
    /// Literal chain result (`mod`)
    pub literal: f64,
    /// Phonetic chain result (`mp_mod`)
    pub phonetic: f64,
    /// `literal * weight + phonetic * weight`
    pub total: f64,
}

/// Both priority chains built from one query
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    query: String,
    matchers: Vec<Matcher>,
    literal: PriorityChain,
    phonetic: PriorityChain,
}

impl MatcherSet {
    /// Expand a raw query into scoring rules
    ///
    /// The query is trimmed first. A blank query yields an empty set.
    pub fn build(query: &str) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Self::default());
        }

        let mut matchers = Vec::new();
        let len = char_len(query);

        matchers.push(Matcher::literal("whole_exact", MatchKind::Exact, query, 100.0)?);
        if len > 2 {
            matchers.push(Matcher::literal("whole_prefix", MatchKind::Prefix, query, 40.0)?);
        }
        if len > 3 {
            matchers.push(Matcher::literal("whole_contains", MatchKind::Contains, query, 30.0)?);
        }

        let pieces = tokenizer::tokenize(query);

        for piece in &pieces {
            let piece_len = char_len(piece);
            if piece_len < MIN_PIECE_LEN {
                continue;
            }
            let scaled = (piece_len * 8) as f64;
            let (prefix, exact, contains) = (scaled.min(15.0), scaled.min(40.0), scaled.min(20.0));
            matchers.push(Matcher::literal("piece_prefix", MatchKind::Prefix, piece, prefix)?);
            matchers.push(Matcher::literal("piece_exact", MatchKind::Exact, piece, exact)?);
            matchers.push(Matcher::literal(
                "piece_contains",
                MatchKind::Contains,
                piece,
                contains,
            )?);
        }

        for piece in &pieces {
            if char_len(piece) < MIN_PHONETIC_LEN {
                continue;
            }
            let code = phonetic::token_code(piece);
            if code.is_empty() {
                continue;
            }
            matchers.push(Matcher::phonetic("phonetic_exact", MatchKind::Exact, &code, 15.0)?);
            matchers.push(Matcher::phonetic("phonetic_prefix", MatchKind::Prefix, &code, 8.0)?);
            matchers.push(Matcher::phonetic("phonetic_contains", MatchKind::Contains, &code, 2.0)?);
        }

        // Stable: equal scores keep generation order
        matchers.sort_by(|a, b| b.score.total_cmp(&a.score));

        let (literal, phonetic): (Vec<_>, Vec<_>) = matchers
            .iter()
            .cloned()
            .partition(|m| m.track == Track::Literal);

        Ok(MatcherSet {
            query: query.to_string(),
            matchers,
            literal: PriorityChain { matchers: literal },
            phonetic: PriorityChain { matchers: phonetic },
        })
    }

    /// The trimmed query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the query was blank
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// All matchers, highest score first
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Literal chain (`mod`)
    pub fn literal(&self) -> &PriorityChain {
        &self.literal
    }

    /// Phonetic chain (`mp_mod`)
    pub fn phonetic(&self) -> &PriorityChain {
        &self.phonetic
    }

    /// Broad store filter selecting every entry any matcher could fire on
    ///
    /// `model == M AND [field_name IN search_fields] AND any-of(raw conditions)`.
    /// Candidates may still score zero on both chains.
    pub fn candidate_selector(&self, model: &str, search_fields: Option<&[String]>) -> Selector {
        let mut selector = Selector::everything().with(Condition::eq(fields::MODEL, model));
        if let Some(names) = search_fields {
            let names = names.iter().map(String::as_str);
            selector = selector.with(Condition::is_in(fields::FIELD_NAME, names));
        }
        for matcher in &self.matchers {
            for condition in matcher.conditions() {
                selector = selector.or(condition);
            }
        }
        selector
    }

    /// Score one entry on both chains
    ///
    /// Non-string values never fire the literal chain; a missing phonetic
    /// code never fires the phonetic chain.
    pub fn score_entry(&self, entry: &IndexEntry) -> EntryScore {
        let literal = self.literal.evaluate(entry.text());
        let phonetic = self.phonetic.evaluate(entry.metaphone.as_deref());
        EntryScore {
            literal,
            phonetic,
            total: literal * entry.weight + phonetic * entry.weight,
        }
    }
}
