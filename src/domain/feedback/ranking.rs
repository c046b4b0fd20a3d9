//! Similarity ranking of feedback groups

use super::entity::FeedbackGroup;
use crate::domain::embedding::cosine_similarity;

/// Number of feedback groups passed to an extraction by default
pub const DEFAULT_FEEDBACK_LIMIT: usize = 3;

/// A feedback group with its similarity to the query document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredFeedback<'a> {
    pub group: &'a FeedbackGroup,
    pub score: f64,
}

/// Score groups against a query embedding, most similar first
///
/// Groups without an embedding, or whose embedding does not match the query
/// dimensionality, are dropped. Equal scores keep their input order.
pub fn rank_feedback<'a, I>(groups: I, query_embedding: &[f32]) -> Vec<ScoredFeedback<'a>>
where
    I: IntoIterator<Item = &'a FeedbackGroup>,
{
    let mut scored: Vec<ScoredFeedback<'a>> = groups
        .into_iter()
        .filter_map(|group| {
            let embedding = group.embedding.as_deref()?;
            cosine_similarity(query_embedding, embedding).map(|score| ScoredFeedback { group, score })
        })
        .collect();

    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Select the `limit` groups most similar to the query embedding
///
/// Returns nothing when there is no query embedding.
pub fn select_top_feedback<'a, I>(
    groups: I,
    query_embedding: Option<&[f32]>,
    limit: usize,
) -> Vec<&'a FeedbackGroup>
where
    I: IntoIterator<Item = &'a FeedbackGroup>,
{
    let Some(query) = query_embedding else {
        return Vec::new();
    };

    rank_feedback(groups, query)
        .into_iter()
        .take(limit)
        .map(|scored| scored.group)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::FeedbackItem;

    fn group(id: &str, embedding: Option<Vec<f32>>) -> FeedbackGroup {
        let g = FeedbackGroup::new(id, format!("doc-{id}"), FeedbackItem::new("headerField", "Total", "x"));
        match embedding {
            Some(e) => g.with_embedding(e),
            None => g,
        }
    }

    fn ids(groups: &[&FeedbackGroup]) -> Vec<String> {
        groups.iter().map(|g| g.id.clone()).collect()
    }

    #[test]
    fn test_no_query_or_no_groups() {
        let groups = vec![group("a", Some(vec![1.0, 0.0]))];

        assert!(select_top_feedback(&groups, None, 3).is_empty());
        assert!(select_top_feedback(&Vec::<FeedbackGroup>::new(), Some(&[1.0, 0.0][..]), 3).is_empty());
    }

    #[test]
    fn test_selects_top_k_descending() {
        let groups = vec![
            group("orthogonal", Some(vec![0.0, 1.0])),
            group("exact", Some(vec![1.0, 0.0])),
            group("close", Some(vec![0.9, 0.1])),
            group("medium", Some(vec![0.5, 0.5])),
            group("opposite", Some(vec![-1.0, 0.0])),
        ];

        let selected = select_top_feedback(&groups, Some(&[1.0, 0.0][..]), 3);

        assert_eq!(ids(&selected), vec!["exact", "close", "medium"]);
    }

    #[test]
    fn test_scores_strictly_descending() {
        let groups = vec![
            group("a", Some(vec![0.2, 0.8])),
            group("b", Some(vec![0.7, 0.3])),
            group("c", Some(vec![0.9, 0.05])),
        ];

        let ranked = rank_feedback(&groups, &[1.0, 0.0]);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score > w[1].score));
    }

    #[test]
    fn test_drops_missing_and_mismatched_embeddings() {
        let groups = vec![
            group("none", None),
            group("wrong-dims", Some(vec![1.0, 0.0, 0.0])),
            group("zero", Some(vec![0.0, 0.0])),
            group("ok", Some(vec![0.5, 0.5])),
        ];

        let selected = select_top_feedback(&groups, Some(&[1.0, 0.0][..]), 3);

        assert_eq!(ids(&selected), vec!["ok"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let groups = vec![
            group("first", Some(vec![1.0, 0.0])),
            group("second", Some(vec![2.0, 0.0])),
            group("third", Some(vec![3.0, 0.0])),
        ];

        let selected = select_top_feedback(&groups, Some(&[1.0, 0.0][..]), 2);

        assert_eq!(ids(&selected), vec!["first", "second"]);
    }
}
