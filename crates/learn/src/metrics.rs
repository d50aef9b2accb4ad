//! Binary classification metrics
//!
//! Undefined ratios (no predicted or no actual positives) evaluate to 0.

use contracts::EvaluationMetrics;

use crate::error::{LearnError, Result};

fn check_len(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(LearnError::LengthMismatch { left, right });
    }
    Ok(())
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    check_len(y_true.len(), y_pred.len())?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(ratio(correct, y_true.len()))
}

pub fn precision(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    check_len(y_true.len(), y_pred.len())?;
    let predicted = y_pred.iter().filter(|p| **p == 1).count();
    let tp = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| **t == 1 && **p == 1)
        .count();
    Ok(ratio(tp, predicted))
}

pub fn recall(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    check_len(y_true.len(), y_pred.len())?;
    let actual = y_true.iter().filter(|t| **t == 1).count();
    let tp = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| **t == 1 && **p == 1)
        .count();
    Ok(ratio(tp, actual))
}

/// Area under the ROC curve from positive-class scores.
///
/// Rank-based (Mann-Whitney U) with tied scores sharing their average rank.
/// Returns 0.5 when only one class is present.
pub fn roc_auc(y_true: &[u8], scores: &[f64]) -> Result<f64> {
    check_len(y_true.len(), scores.len())?;
    let n_pos = y_true.iter().filter(|t| **t == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Ok(0.5);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // 1-based average rank of the tie group i..=j
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(t, _)| **t == 1)
        .map(|(_, r)| r)
        .sum();
    let n_pos = n_pos as f64;
    let u = pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Ok(u / (n_pos * n_neg as f64))
}

/// The fixed evaluation metric set
pub fn classification_metrics(
    y_true: &[u8],
    y_pred: &[u8],
    scores: &[f64],
) -> Result<EvaluationMetrics> {
    Ok(EvaluationMetrics {
        accuracy: accuracy(y_true, y_pred)?,
        precision: precision(y_true, y_pred)?,
        recall: recall(y_true, y_pred)?,
        auc: roc_auc(y_true, scores)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_metrics() {
        let y_true = [1, 1, 0, 0];
        let y_pred = [1, 0, 1, 0];
        assert_eq!(accuracy(&y_true, &y_pred).unwrap(), 0.5);
        assert_eq!(precision(&y_true, &y_pred).unwrap(), 0.5);
        assert_eq!(recall(&y_true, &y_pred).unwrap(), 0.5);
    }

    #[test]
    fn test_undefined_precision_is_zero() {
        assert_eq!(precision(&[1, 0], &[0, 0]).unwrap(), 0.0);
        assert_eq!(recall(&[0, 0], &[1, 0]).unwrap(), 0.0);
    }

    #[test]
    fn test_auc_perfect_and_inverted() {
        let y = [0, 0, 1, 1];
        assert_eq!(roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]).unwrap(), 1.0);
        assert_eq!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]).unwrap(), 0.0);
    }

    #[test]
    fn test_auc_ties_averaged() {
        // every score equal -> chance level
        assert_eq!(roc_auc(&[0, 1, 0, 1], &[0.5; 4]).unwrap(), 0.5);
        // one positive tied with one negative: (1 + 0.5) / 2
        assert_eq!(roc_auc(&[0, 1, 1], &[0.3, 0.3, 0.9]).unwrap(), 0.75);
    }

    #[test]
    fn test_auc_single_class() {
        assert_eq!(roc_auc(&[1, 1], &[0.2, 0.7]).unwrap(), 0.5);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(accuracy(&[1], &[1, 0]).is_err());
    }

    #[test]
    fn test_classification_metrics_set() {
        let m = classification_metrics(&[0, 1], &[0, 1], &[0.2, 0.8]).unwrap();
        assert_eq!(m.entries().map(|(_, v)| v), [1.0, 1.0, 1.0, 1.0]);
    }
}
