use crate::models::ActionTier;

/// Selects the single applicable remediation tier for an occurrence count.
///
/// Tier ranges may overlap within one record; selection is deterministic:
/// highest priority wins, then the smallest occurrence_min (most specific
/// lower bound), then tier creation order.
pub struct FrequencyAnalyzer;

impl FrequencyAnalyzer {
    /// Pick the tier covering `occurrence_count`, or None when no count
    /// was supplied or no tier qualifies (callers display the full tier
    /// list instead).
    pub fn select_tier(
        tiers: &[ActionTier],
        occurrence_count: Option<u32>,
    ) -> Option<&ActionTier> {
        let count = occurrence_count?;

        tiers
            .iter()
            .filter(|tier| tier.covers(count))
            .fold(None, |best: Option<&ActionTier>, tier| match best {
                None => Some(tier),
                // Replace only on strict improvement so that creation
                // order (vector order) decides a full tie
                Some(current) => {
                    let wins = tier.priority > current.priority
                        || (tier.priority == current.priority
                            && tier.occurrence_min < current.occurrence_min);
                    if wins {
                        Some(tier)
                    } else {
                        Some(current)
                    }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min: u32, max: Option<u32>, text: &str, priority: u32) -> ActionTier {
        ActionTier::new(min, max, text.to_string(), priority)
    }

    #[test]
    fn test_absent_count_yields_nothing() {
        let tiers = vec![tier(1, Some(5), "check server", 1)];
        assert!(FrequencyAnalyzer::select_tier(&tiers, None).is_none());
    }

    #[test]
    fn test_count_outside_all_ranges_yields_nothing() {
        let tiers = vec![tier(1, Some(5), "check server", 1)];
        assert!(FrequencyAnalyzer::select_tier(&tiers, Some(0)).is_none());
        assert!(FrequencyAnalyzer::select_tier(&tiers, Some(6)).is_none());
    }

    #[test]
    fn test_single_qualifying_tier() {
        let tiers = vec![
            tier(1, Some(5), "check server", 1),
            tier(6, None, "escalate", 2),
        ];

        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(3)).unwrap();
        assert_eq!(selected.action_text, "check server");

        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(7)).unwrap();
        assert_eq!(selected.action_text, "escalate");
    }

    #[test]
    fn test_unbounded_upper_range() {
        let tiers = vec![tier(6, None, "escalate", 1)];
        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(10_000)).unwrap();
        assert_eq!(selected.action_text, "escalate");
    }

    #[test]
    fn test_overlap_resolved_by_priority() {
        let tiers = vec![
            tier(1, Some(5), "low priority action", 1),
            tier(3, Some(10), "high priority action", 5),
        ];

        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(4)).unwrap();
        assert_eq!(selected.action_text, "high priority action");
    }

    #[test]
    fn test_priority_tie_resolved_by_smaller_min() {
        let tiers = vec![
            tier(3, Some(10), "broad", 2),
            tier(1, Some(10), "specific", 2),
        ];

        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(5)).unwrap();
        assert_eq!(selected.action_text, "specific");
    }

    #[test]
    fn test_full_tie_resolved_by_creation_order() {
        let tiers = vec![
            tier(1, Some(10), "first created", 2),
            tier(1, Some(10), "second created", 2),
        ];

        let selected = FrequencyAnalyzer::select_tier(&tiers, Some(5)).unwrap();
        assert_eq!(selected.action_text, "first created");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tiers = vec![
            tier(1, Some(8), "a", 3),
            tier(2, Some(8), "b", 3),
            tier(1, None, "c", 1),
        ];

        let first = FrequencyAnalyzer::select_tier(&tiers, Some(4)).unwrap().id;
        for _ in 0..10 {
            let again = FrequencyAnalyzer::select_tier(&tiers, Some(4)).unwrap().id;
            assert_eq!(first, again);
        }
    }
}
