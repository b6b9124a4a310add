//! Contact-all policy
//!
//! The backend decides who actually gets an email: it picks pending matches
//! of the product at or above the campaign's target fit score, from its own
//! records. Locally the policy only decides which matches count as targets.
//! Targets may be projected to `contacted` after success, and contact-all can
//! optionally be refused when the local result set holds none.

use serde::{Deserialize, Serialize};

use crate::models::{CampaignId, InfluencerMatch, MatchId, MatchStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    ApprovedOnly,
    #[default]
    PendingOnly,
    ApprovedAndPending,
}

impl ContactPolicy {
    pub fn targets_status(&self, status: MatchStatus) -> bool {
        match self {
            ContactPolicy::ApprovedOnly => status == MatchStatus::Approved,
            ContactPolicy::PendingOnly => status == MatchStatus::Pending,
            ContactPolicy::ApprovedAndPending => status != MatchStatus::Contacted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachPolicy {
    pub policy: ContactPolicy,
    /// Project targeted matches to `contacted` once the backend acknowledges outreach
    pub mark_contacted: bool,
    /// Campaign used when no campaign was opened in this session
    pub default_campaign_id: CampaignId,
    /// Refuse contact-all when no local match is targeted
    pub require_targets: bool,
}

impl Default for OutreachPolicy {
    fn default() -> Self {
        Self {
            policy: ContactPolicy::default(),
            mark_contacted: false,
            default_campaign_id: 1,
            require_targets: false,
        }
    }
}

impl OutreachPolicy {
    pub fn targets(&self, matches: &[InfluencerMatch]) -> Vec<MatchId> {
        matches
            .iter()
            .filter(|m| self.policy.targets_status(m.status))
            .map(|m| m.match_id)
            .collect()
    }

    /// Whether contact-all must be refused for this result set
    pub fn blocks_contact(&self, matches: &[InfluencerMatch]) -> bool {
        self.require_targets && self.targets(matches).is_empty()
    }

    /// Move every targeted match to `contacted`; returns how many changed.
    ///
    /// Only `status` is written. Does nothing unless `mark_contacted` is set.
    pub fn apply_contacted(&self, matches: &mut [InfluencerMatch]) -> usize {
        if !self.mark_contacted {
            return 0;
        }

        let mut changed = 0;
        for m in matches.iter_mut() {
            if self.policy.targets_status(m.status)
                && m.status.can_advance_to(MatchStatus::Contacted)
            {
                m.status = MatchStatus::Contacted;
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(match_id: MatchId, status: MatchStatus) -> InfluencerMatch {
        InfluencerMatch {
            id: match_id * 10,
            match_id,
            name: format!("Creator {}", match_id),
            channel_title: None,
            subscriber_count: 10_000,
            avg_views: 2_000,
            engagement_rate: 0.04,
            fit_score: 0.6,
            price_estimate: 120.0,
            content_categories: vec![],
            status,
        }
    }

    fn sample() -> Vec<InfluencerMatch> {
        vec![
            make_match(1, MatchStatus::Pending),
            make_match(2, MatchStatus::Approved),
            make_match(3, MatchStatus::Contacted),
        ]
    }

    #[test]
    fn test_targets_per_policy() {
        let matches = sample();
        let mut policy = OutreachPolicy::default();
        assert_eq!(policy.targets(&matches), vec![1]);

        policy.policy = ContactPolicy::ApprovedAndPending;
        assert_eq!(policy.targets(&matches), vec![1, 2]);

        policy.policy = ContactPolicy::ApprovedOnly;
        assert_eq!(policy.targets(&matches), vec![2]);

        policy.policy = ContactPolicy::PendingOnly;
        assert_eq!(policy.targets(&matches), vec![1]);
    }

    #[test]
    fn test_apply_contacted_is_opt_in() {
        let mut matches = sample();
        let policy = OutreachPolicy::default();
        assert_eq!(policy.apply_contacted(&mut matches), 0);
        assert_eq!(matches, sample());
    }

    #[test]
    fn test_apply_contacted_touches_status_only() {
        let mut matches = sample();
        let policy = OutreachPolicy {
            policy: ContactPolicy::ApprovedOnly,
            mark_contacted: true,
            ..Default::default()
        };

        assert_eq!(policy.apply_contacted(&mut matches), 1);
        assert_eq!(matches[0].status, MatchStatus::Pending);
        assert_eq!(matches[1].status, MatchStatus::Contacted);
        assert_eq!(matches[2].status, MatchStatus::Contacted);
        for (after, before) in matches.iter().zip(sample().iter()) {
            assert_eq!(after.fit_score, before.fit_score);
            assert_eq!(after.engagement_rate, before.engagement_rate);
            assert_eq!(after.price_estimate, before.price_estimate);
        }
    }

    #[test]
    fn test_empty_result_set_only_blocks_when_required() {
        let mut policy = OutreachPolicy::default();
        assert!(!policy.blocks_contact(&[]));

        policy.require_targets = true;
        assert!(policy.blocks_contact(&[]));
        assert!(!policy.blocks_contact(&sample()));

        policy.policy = ContactPolicy::ApprovedOnly;
        assert!(policy.blocks_contact(&[make_match(1, MatchStatus::Pending)]));
    }

    #[test]
    fn test_policy_config_names() {
        let policy: ContactPolicy = serde_json::from_str(r#""approved_only""#).unwrap();
        assert_eq!(policy, ContactPolicy::ApprovedOnly);
    }
}
