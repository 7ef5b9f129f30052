//! Context-window expansion and interval merging.
//!
//! Each ranked hit is widened to `[position - radius, position + radius]`
//! clipped to its document's valid range, windows within one document
//! that overlap or touch are merged into a single span, and each span is
//! filled with node text in ascending position order.
//!
//! Unlike a generic interval union, merging tracks which ranked hit
//! contributed each window: a merged span scores as the maximum over its
//! contributors, and final output order is score descending with ties
//! broken by the best contributor's original rank.
//!
//! # Algorithm
//!
//! 1. Per ranked hit, clip the raw window to `[0, len - 1]` using the
//!    document's node count (fetched once per document). Clipping happens
//!    before any fetch: an out-of-range position is never requested.
//! 2. Group windows by document.
//! 3. Within a document, merge transitively whenever `start <= end + 1`
//!    of the previous window (overlap or adjacency).
//! 4. Fill each merged span via [`NodeStore::node_at`]. A position the
//!    store cannot produce is an index/store inconsistency; the affected
//!    chunk is dropped with a warning and the rest of the response stands.
//! 5. Emit chunks by score descending, ties by best contributor rank.

use std::collections::HashMap;

use tracing::warn;

use crate::error::Result;
use crate::models::{Chunk, ChunkNode, ScoredNode};
use crate::store::NodeStore;

/// A contiguous position range within one document, with the best
/// contributor seen so far.
#[derive(Debug, Clone)]
struct Span {
    document_id: String,
    start: usize,
    /// Inclusive.
    end: usize,
    /// Maximum contributor score.
    score: f64,
    /// Rank index of the best contributor; the ordering tiebreak.
    best_rank: usize,
}

/// Merge one document's windows, overlap-or-adjacent, transitively.
///
/// Input windows carry their contributor's rank index; output spans keep
/// the maximum score and the lowest rank among merged contributors.
fn merge_document_spans(mut spans: Vec<Span>) -> Vec<Span> {
    // Stable by start, so equal-start windows keep rank order.
    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<Span> = Vec::new();
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end + 1 => {
                last.end = last.end.max(span.end);
                if span.score > last.score {
                    last.score = span.score;
                }
                if span.best_rank < last.best_rank {
                    last.best_rank = span.best_rank;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Expand ranked hits into merged context windows.
///
/// Pure interval computation plus read-only fetches through `store`;
/// empty input yields empty output. See the module docs for the full
/// algorithm and the missing-node drop policy.
pub async fn expand(
    store: &dyn NodeStore,
    ranked: &[ScoredNode],
    window_radius: usize,
) -> Result<Vec<Chunk>> {
    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let mut lengths: HashMap<String, usize> = HashMap::new();
    let mut per_doc: HashMap<String, Vec<Span>> = HashMap::new();

    for (rank_idx, hit) in ranked.iter().enumerate() {
        let len = match lengths.get(&hit.document_id) {
            Some(&len) => len,
            None => {
                let len = store.document_length(&hit.document_id).await?;
                lengths.insert(hit.document_id.clone(), len);
                len
            }
        };
        if hit.position >= len {
            warn!(
                node_id = %hit.node_id,
                document_id = %hit.document_id,
                position = hit.position,
                document_len = len,
                "candidate position outside document range, skipping hit"
            );
            continue;
        }
        per_doc
            .entry(hit.document_id.clone())
            .or_default()
            .push(Span {
                document_id: hit.document_id.clone(),
                start: hit.position.saturating_sub(window_radius),
                end: (hit.position + window_radius).min(len - 1),
                score: hit.score_or_zero(),
                best_rank: rank_idx,
            });
    }

    let mut spans: Vec<Span> = Vec::new();
    for doc_spans in per_doc.into_values() {
        spans.extend(merge_document_spans(doc_spans));
    }
    spans.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.best_rank.cmp(&b.best_rank))
    });

    let mut chunks = Vec::with_capacity(spans.len());
    'spans: for span in spans {
        let mut nodes = Vec::with_capacity(span.end - span.start + 1);
        for position in span.start..=span.end {
            match store.node_at(&span.document_id, position).await? {
                Some(node) => nodes.push(ChunkNode {
                    node_id: node.id,
                    text: node.text,
                }),
                None => {
                    warn!(
                        document_id = %span.document_id,
                        position,
                        "node missing inside merged span, dropping chunk"
                    );
                    continue 'spans;
                }
            }
        }
        chunks.push(Chunk {
            document_id: span.document_id,
            nodes,
            score: span.score,
            window_start: span.start,
            window_end: span.end,
        });
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, score: f64, best_rank: usize) -> Span {
        Span {
            document_id: "d1".to_string(),
            start,
            end,
            score,
            best_rank,
        }
    }

    #[test]
    fn test_merge_disjoint_spans_stay_separate() {
        let merged = merge_document_spans(vec![span(0, 1, 0.9, 0), span(3, 4, 0.5, 1)]);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].start, merged[0].end), (0, 1));
        assert_eq!((merged[1].start, merged[1].end), (3, 4));
    }

    #[test]
    fn test_merge_overlapping_spans() {
        // Hits at positions 1 and 2 with radius 1 in a 5-node document.
        let merged = merge_document_spans(vec![span(0, 2, 0.9, 0), span(1, 3, 0.5, 1)]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 3));
        assert_eq!(merged[0].score, 0.9);
        assert_eq!(merged[0].best_rank, 0);
    }

    #[test]
    fn test_merge_adjacent_spans() {
        // end 1 touches start 2: adjacency merges.
        let merged = merge_document_spans(vec![span(0, 1, 0.4, 1), span(2, 3, 0.8, 0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 3));
        assert_eq!(merged[0].score, 0.8);
        assert_eq!(merged[0].best_rank, 0);
    }

    #[test]
    fn test_merge_is_transitive() {
        // A chain of touching windows collapses to one span.
        let merged = merge_document_spans(vec![
            span(4, 5, 0.2, 2),
            span(0, 1, 0.7, 0),
            span(2, 3, 0.3, 1),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 5));
        assert_eq!(merged[0].score, 0.7);
        assert_eq!(merged[0].best_rank, 0);
    }

    #[test]
    fn test_merge_contained_span() {
        let merged = merge_document_spans(vec![span(0, 5, 0.3, 1), span(2, 3, 0.9, 0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 5));
        assert_eq!(merged[0].score, 0.9);
        assert_eq!(merged[0].best_rank, 0);
    }

    #[test]
    fn test_gap_of_one_position_does_not_merge() {
        // [0,1] and [3,4] leave position 2 uncovered.
        let merged = merge_document_spans(vec![span(0, 1, 0.9, 0), span(3, 4, 0.8, 1)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_keeps_best_rank_on_equal_scores() {
        let merged = merge_document_spans(vec![span(2, 3, 0.5, 0), span(0, 2, 0.5, 1)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].best_rank, 0);
    }
}
