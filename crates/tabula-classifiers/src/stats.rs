use crate::error::TrainingError;

/// Area under the ROC curve of `scores` against binary `labels`.
///
/// Computed as the normalized Mann-Whitney U statistic: the probability that a
/// random positive is scored above a random negative, with ties counted as
/// one half through average ranks.
///
/// # Errors
///
/// [`TrainingError::SingleClass`] when `labels` contains only one class, where
/// the AUC is undefined; [`TrainingError::EmptySubset`] for empty input.
///
/// # Panics
///
/// If `scores` and `labels` have different lengths.
pub fn roc_auc(scores: &[f64], labels: &[u8], subset: &'static str) -> Result<f64, TrainingError> {
    assert_eq!(
        scores.len(),
        labels.len(),
        "scores and labels must have equal lengths"
    );
    if scores.is_empty() {
        return Err(TrainingError::EmptySubset(subset));
    }

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 {
        return Err(TrainingError::SingleClass { subset, class: 0 });
    }
    if n_neg == 0 {
        return Err(TrainingError::SingleClass { subset, class: 1 });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_unstable_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // average 1-based ranks over runs of tied scores
    let mut rank_sum_pos = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let average_rank = (start + 1 + end) as f64 / 2.0;
        let positives_in_run = order[start..end].iter().filter(|&&i| labels[i] == 1).count();
        rank_sum_pos += average_rank * positives_in_run as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    let u = rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0;
    Ok(u / (n_pos * n_neg))
}
