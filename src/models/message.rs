use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// One tech-message entry in the knowledge catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TechMessageRecord {
    /// Unique identifier, immutable once created
    pub id: Uuid,

    /// Creation timestamp; also provides the stable catalog ordering
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Short category label
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    /// Severity level; display/sort and fuzzy scoring bonus only,
    /// never consulted by the matchers
    pub severity: Severity,

    /// Regular expression tested against operator input; may contain
    /// named capture groups. Compilability is enforced at write time.
    #[validate(length(min = 1))]
    pub pattern: String,

    /// Optional free-text description
    #[validate(length(max = 500))]
    pub description: Option<String>,

    /// Frequency-tiered remediation table, ordered by creation
    pub action_tiers: Vec<ActionTier>,
}

impl TechMessageRecord {
    /// Create a new catalog record
    pub fn new(
        category: String,
        severity: Severity,
        pattern: String,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            category,
            severity,
            pattern,
            description,
            action_tiers: Vec::new(),
        }
    }

    /// Append an action tier, preserving creation order
    pub fn add_tier(&mut self, tier: ActionTier) {
        self.action_tiers.push(tier);
        self.updated_at = Utc::now();
    }

    /// Remove an action tier by id; returns the removed tier
    pub fn remove_tier(&mut self, tier_id: &Uuid) -> Option<ActionTier> {
        let position = self.action_tiers.iter().position(|t| t.id == *tier_id)?;
        let tier = self.action_tiers.remove(position);
        self.updated_at = Utc::now();
        Some(tier)
    }

    /// Find a tier by id
    pub fn tier(&self, tier_id: &Uuid) -> Option<&ActionTier> {
        self.action_tiers.iter().find(|t| t.id == *tier_id)
    }

    /// Find a tier by id for mutation
    pub fn tier_mut(&mut self, tier_id: &Uuid) -> Option<&mut ActionTier> {
        self.action_tiers.iter_mut().find(|t| t.id == *tier_id)
    }
}

/// One occurrence-range row of a record's remediation table
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActionTier {
    /// Unique identifier
    pub id: Uuid,

    /// Creation timestamp; backs the deterministic final tie-break
    pub created_at: DateTime<Utc>,

    /// Lower occurrence bound (inclusive)
    #[validate(range(min = 1))]
    pub occurrence_min: u32,

    /// Upper occurrence bound (inclusive); unset means unbounded above
    pub occurrence_max: Option<u32>,

    /// Remediation instructions shown to the operator
    #[validate(length(min = 1, max = 500))]
    pub action_text: String,

    /// Tie-break when ranges overlap; higher wins
    #[validate(range(min = 1))]
    pub priority: u32,
}

impl ActionTier {
    /// Create a new action tier
    pub fn new(
        occurrence_min: u32,
        occurrence_max: Option<u32>,
        action_text: String,
        priority: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            occurrence_min,
            occurrence_max,
            action_text,
            priority,
        }
    }

    /// Check whether an occurrence count falls inside this tier's range
    pub fn covers(&self, occurrence_count: u32) -> bool {
        self.occurrence_min <= occurrence_count
            && self.occurrence_max.map_or(true, |max| occurrence_count <= max)
    }

    /// Ranges may overlap across tiers, but each tier must be internally
    /// consistent: max, when set, must not undercut min
    pub fn has_valid_range(&self) -> bool {
        self.occurrence_max.map_or(true, |max| max >= self.occurrence_min)
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric rank for display sorting (higher is more severe)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = TechMessageRecord::new(
            "Database".to_string(),
            Severity::High,
            "connection timeout".to_string(),
            Some("Pool exhaustion on primary".to_string()),
        );

        assert_eq!(record.severity, Severity::High);
        assert!(record.action_tiers.is_empty());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_add_and_remove_tier() {
        let mut record = TechMessageRecord::new(
            "Network".to_string(),
            Severity::Medium,
            "packet loss".to_string(),
            None,
        );

        let tier = ActionTier::new(1, Some(5), "check link".to_string(), 1);
        let tier_id = tier.id;
        record.add_tier(tier);
        record.add_tier(ActionTier::new(6, None, "escalate".to_string(), 2));

        assert_eq!(record.action_tiers.len(), 2);
        assert!(record.tier(&tier_id).is_some());

        let removed = record.remove_tier(&tier_id);
        assert!(removed.is_some());
        assert_eq!(record.action_tiers.len(), 1);
        assert_eq!(record.action_tiers[0].action_text, "escalate");
    }

    #[test]
    fn test_tier_coverage() {
        let bounded = ActionTier::new(2, Some(5), "retry".to_string(), 1);
        assert!(!bounded.covers(1));
        assert!(bounded.covers(2));
        assert!(bounded.covers(5));
        assert!(!bounded.covers(6));

        let unbounded = ActionTier::new(6, None, "escalate".to_string(), 1);
        assert!(unbounded.covers(6));
        assert!(unbounded.covers(1000));
        assert!(!unbounded.covers(5));
    }

    #[test]
    fn test_tier_range_validity() {
        assert!(ActionTier::new(1, Some(5), "a".to_string(), 1).has_valid_range());
        assert!(ActionTier::new(3, None, "a".to_string(), 1).has_valid_range());
        assert!(!ActionTier::new(5, Some(3), "a".to_string(), 1).has_valid_range());
    }

    #[test]
    fn test_severity_rank_and_wire_form() {
        assert!(Severity::Critical.rank() > Severity::Low.rank());
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!(
            serde_json::to_string(&Severity::Medium).unwrap(),
            "\"MEDIUM\""
        );
    }
}
