// Weight Renormalization
//
// Absent modalities are not zero-filled: their base weight is redistributed
// proportionally over the modalities that are present, so the weights used in
// any fusion call sum to 1.0.

use moodlens_common::config::ModalityWeights;
use moodlens_common::Modality;
use std::collections::BTreeMap;

/// Renormalize base weights over the present modalities
///
/// # Arguments
/// * `base` - Configured base weight table (all weights positive)
/// * `present` - Modalities supplied in this fusion call
///
/// # Returns
/// * Map of present modality → renormalized weight (empty if nothing is present)
pub fn renormalize(base: &ModalityWeights, present: &[Modality]) -> BTreeMap<Modality, f64> {
    // Scale by the largest weight first so the sum cannot overflow
    let largest = present
        .iter()
        .map(|m| base.get(*m))
        .fold(0.0_f64, f64::max);
    if present.is_empty() || !largest.is_finite() || largest <= 0.0 {
        return BTreeMap::new();
    }

    let total: f64 = present.iter().map(|m| base.get(*m) / largest).sum();

    present
        .iter()
        .map(|m| (*m, base.get(*m) / largest / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn all_subsets() -> Vec<Vec<Modality>> {
        (1u8..16)
            .map(|mask| {
                Modality::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, m)| *m)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_every_subset_sums_to_one() {
        let base = ModalityWeights::default();
        for subset in all_subsets() {
            let weights = renormalize(&base, &subset);
            let sum: f64 = weights.values().sum();
            assert!(
                (sum - 1.0).abs() < TOLERANCE,
                "Subset {:?} sums to {}",
                subset,
                sum
            );
            assert_eq!(weights.len(), subset.len());
        }
    }

    #[test]
    fn test_custom_weights_sum_to_one() {
        let base = ModalityWeights {
            questions: 3.0,
            journaling: 7.5,
            face: 0.25,
            voice: 12.0,
        };
        for subset in all_subsets() {
            let sum: f64 = renormalize(&base, &subset).values().sum();
            assert!((sum - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_extreme_weights_sum_to_one() {
        let huge = ModalityWeights {
            questions: 1e308,
            journaling: 1e308,
            face: 1e308,
            voice: 1e308,
        };
        let tiny = ModalityWeights {
            questions: 3e-320,
            journaling: 4e-320,
            face: 2e-320,
            voice: 1e-320,
        };
        for base in [huge, tiny] {
            for subset in all_subsets() {
                let weights = renormalize(&base, &subset);
                let sum: f64 = weights.values().sum();
                assert!(
                    (sum - 1.0).abs() < TOLERANCE,
                    "Subset {:?} sums to {}",
                    subset,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_questions_and_journaling() {
        let weights = renormalize(
            &ModalityWeights::default(),
            &[Modality::Questions, Modality::Journaling],
        );
        assert!((weights[&Modality::Questions] - 0.4286).abs() < 1e-4);
        assert!((weights[&Modality::Journaling] - 0.5714).abs() < 1e-4);
    }

    #[test]
    fn test_single_modality_gets_full_weight() {
        for modality in Modality::ALL {
            let weights = renormalize(&ModalityWeights::default(), &[modality]);
            assert_eq!(weights[&modality], 1.0);
        }
    }

    #[test]
    fn test_proportions_preserved() {
        let weights = renormalize(
            &ModalityWeights::default(),
            &[Modality::Face, Modality::Voice],
        );
        // face:voice is 2:1 before and after
        assert!((weights[&Modality::Face] / weights[&Modality::Voice] - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_empty_present_set() {
        assert!(renormalize(&ModalityWeights::default(), &[]).is_empty());
    }
}
