//! Combining ranked result lists from independent searches
//!
//! Records are matched by primary identifier. Union sums the scores of
//! shared records and keeps everything else; intersection keeps only the
//! records present in both lists. Either way the combined list is
//! re-sorted by score, descending and stable.

use std::collections::BTreeMap;
use std::collections::HashMap;

use lodestar_core::{Document, RecordId, Value};

/// An ordered list of scored records
#[derive(Debug, Clone, PartialEq)]
pub struct ResultList {
    documents: Vec<Document>,
    /// Records available to the caller; grows as union adds new records
    pub available: usize,
    /// Whether the caller asked for documents rather than plain field maps
    pub as_documents: bool,
}

impl ResultList {
    /// Wrap documents in their current order
    pub fn new(documents: Vec<Document>) -> Self {
        ResultList {
            available: documents.len(),
            documents,
            as_documents: true,
        }
    }

    /// Builder: set the document flag
    pub fn with_documents_flag(mut self, as_documents: bool) -> Self {
        self.as_documents = as_documents;
        self
    }

    /// Documents in rank order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Highest-ranked document
    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate documents in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Unwrap into documents
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Flatten into plain field maps carrying `_id` and `__score`
    pub fn into_plain(self) -> Vec<BTreeMap<String, Value>> {
        self.documents.into_iter().map(Document::into_plain).collect()
    }

    /// Stable sort by score, highest first
    pub fn sort_by_score(&mut self) {
        self.documents.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
}

impl IntoIterator for ResultList {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

fn positions(documents: &[Document]) -> HashMap<RecordId, usize> {
    documents
        .iter()
        .enumerate()
        .map(|(i, d)| (d.id.clone(), i))
        .rev()
        .collect()
}

/// Merge `theirs` into `ours`
///
/// Shared records get their scores summed into `ours`' copy; records only in
/// `theirs` are appended and counted in `available`. `ours` is re-sorted.
pub fn union_combine(ours: &mut ResultList, theirs: ResultList) {
    let mut index = positions(&ours.documents);
    for doc in theirs.documents {
        match index.get(&doc.id) {
            Some(&i) => ours.documents[i].score += doc.score,
            None => {
                index.insert(doc.id.clone(), ours.documents.len());
                ours.documents.push(doc);
                ours.available += 1;
            }
        }
    }
    ours.sort_by_score();
}

/// Records present in both lists, scores summed
///
/// The result takes `a`'s copy of each record and `a`'s document flag.
pub fn intersect_combine(a: &ResultList, b: &ResultList) -> ResultList {
    let index = positions(&a.documents);
    let mut slots: HashMap<RecordId, usize> = HashMap::new();
    let mut kept: Vec<Document> = Vec::new();

    for theirs in &b.documents {
        let Some(&i) = index.get(&theirs.id) else {
            continue;
        };
        match slots.get(&theirs.id) {
            Some(&slot) => kept[slot].score += theirs.score,
            None => {
                let mut ours = a.documents[i].clone();
                ours.score += theirs.score;
                slots.insert(ours.id.clone(), kept.len());
                kept.push(ours);
            }
        }
    }

    let mut combined = ResultList::new(kept).with_documents_flag(a.as_documents);
    combined.sort_by_score();
    combined
}

/// Best record of `list`, or of `list` union `other` when given
///
/// `list` itself is never modified.
pub fn best_result(list: &ResultList, other: Option<&ResultList>) -> Option<Document> {
    match other {
        Some(other) => {
            let mut merged = list.clone();
            union_combine(&mut merged, other.clone());
            merged.documents.into_iter().next()
        }
        None => list.first().cloned(),
    }
}

/// Best record present in both lists, `None` when they share nothing
pub fn best_from_both(a: &ResultList, b: &ResultList) -> Option<Document> {
    intersect_combine(a, b).documents.into_iter().next()
}
