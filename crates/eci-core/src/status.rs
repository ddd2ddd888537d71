//! Outcome statuses for a Commission answer and their citizen-facing labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How far the legislative response to an initiative progressed.
///
/// Variants are declared in priority order: when several signals are present
/// in one answer, the earliest variant wins. The three rejection variants share
/// one priority tier and are told apart by a secondary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Applicable,
    Adopted,
    Committed,
    AssessmentPending,
    RoadmapDevelopment,
    RejectedAlreadyCovered,
    RejectedWithActions,
    Rejected,
    NonLegislativeAction,
    ProposalPendingAdoption,
}

/// Technical status → citizen-facing label.
const LABELS: &[(OutcomeStatus, &str)] = &[
    (OutcomeStatus::Applicable, "Law Active"),
    (OutcomeStatus::Adopted, "Law Approved"),
    (OutcomeStatus::Committed, "Law Promised"),
    (OutcomeStatus::AssessmentPending, "Being Studied"),
    (OutcomeStatus::RoadmapDevelopment, "Action Plan Declared"),
    (OutcomeStatus::RejectedAlreadyCovered, "Rejected - Already Covered"),
    (OutcomeStatus::RejectedWithActions, "Rejected - Alternative Actions"),
    (OutcomeStatus::Rejected, "Rejected"),
    (OutcomeStatus::NonLegislativeAction, "Policy Changes Only"),
    (OutcomeStatus::ProposalPendingAdoption, "Proposals Under Review"),
];

#[derive(Debug, Error)]
#[error("unknown outcome status: {0}")]
pub struct UnknownStatus(pub String);

impl OutcomeStatus {
    /// Every status, highest priority first.
    pub const ALL: [OutcomeStatus; 10] = [
        Self::Applicable,
        Self::Adopted,
        Self::Committed,
        Self::AssessmentPending,
        Self::RoadmapDevelopment,
        Self::RejectedAlreadyCovered,
        Self::RejectedWithActions,
        Self::Rejected,
        Self::NonLegislativeAction,
        Self::ProposalPendingAdoption,
    ];

    /// Technical name, as used in serialised records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applicable => "applicable",
            Self::Adopted => "adopted",
            Self::Committed => "committed",
            Self::AssessmentPending => "assessment_pending",
            Self::RoadmapDevelopment => "roadmap_development",
            Self::RejectedAlreadyCovered => "rejected_already_covered",
            Self::RejectedWithActions => "rejected_with_actions",
            Self::Rejected => "rejected",
            Self::NonLegislativeAction => "non_legislative_action",
            Self::ProposalPendingAdoption => "proposal_pending_adoption",
        }
    }

    /// Citizen-facing label.
    pub fn label(&self) -> &'static str {
        LABELS
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, label)| *label)
            .unwrap_or("Unknown")
    }

    /// Priority tier; lower wins. Rejection variants share a tier.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Applicable => 1,
            Self::Adopted => 2,
            Self::Committed => 3,
            Self::AssessmentPending => 4,
            Self::RoadmapDevelopment => 5,
            Self::RejectedAlreadyCovered | Self::RejectedWithActions | Self::Rejected => 6,
            Self::NonLegislativeAction => 7,
            Self::ProposalPendingAdoption => 8,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RejectedAlreadyCovered | Self::RejectedWithActions | Self::Rejected
        )
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_label() {
        for status in OutcomeStatus::ALL {
            assert_ne!(status.label(), "Unknown", "{status}");
        }
        assert_eq!(OutcomeStatus::Applicable.label(), "Law Active");
    }

    #[test]
    fn all_is_in_priority_order() {
        let priorities: Vec<u8> = OutcomeStatus::ALL.iter().map(|s| s.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        assert!(OutcomeStatus::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn technical_names_round_trip() {
        for status in OutcomeStatus::ALL {
            assert_eq!(status.as_str().parse::<OutcomeStatus>().unwrap(), status);
        }
        assert!("law_active".parse::<OutcomeStatus>().is_err());
    }

    #[test]
    fn serde_uses_technical_names() {
        let json = serde_json::to_string(&OutcomeStatus::RejectedWithActions).unwrap();
        assert_eq!(json, "\"rejected_with_actions\"");
    }

    #[test]
    fn rejection_family() {
        let rejections: Vec<_> = OutcomeStatus::ALL
            .into_iter()
            .filter(OutcomeStatus::is_rejection)
            .collect();
        assert_eq!(rejections.len(), 3);
        assert!(rejections.iter().all(|s| s.priority() == 6));
    }
}
