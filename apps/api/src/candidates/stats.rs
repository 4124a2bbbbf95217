use serde::Serialize;

#[cfg(test)]
use crate::candidates::filter::DateWindow;
#[cfg(test)]
use crate::candidates::status::CandidateStatus;
#[cfg(test)]
use crate::models::candidate::Candidate;

/// Dashboard counters for `GET /api/v1/candidates/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub total: i64,
    pub pending: i64,
    pub offer_sent: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub joined: i64,
    pub email_sent: i64,
    pub email_not_sent: i64,
    pub joining_this_week: i64,
}

#[cfg(test)]
impl CandidateStats {
    pub fn tally<'a>(candidates: impl IntoIterator<Item = &'a Candidate>, week: DateWindow) -> Self {
        let mut stats = CandidateStats::default();
        for c in candidates {
            stats.total += 1;
            match c.status {
                CandidateStatus::Pending => stats.pending += 1,
                CandidateStatus::OfferSent => stats.offer_sent += 1,
                CandidateStatus::Accepted => stats.accepted += 1,
                CandidateStatus::Rejected => stats.rejected += 1,
                CandidateStatus::Joined => stats.joined += 1,
            }
            if c.is_email_sent {
                stats.email_sent += 1;
            } else {
                stats.email_not_sent += 1;
            }
            if c.reporting_date.is_some_and(|d| week.contains(d)) {
                stats.joining_this_week += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::filter::week_window;
    use crate::testing::candidate;
    use chrono::{Duration, Utc};

    #[test]
    fn test_tally_counts_every_bucket() {
        let now = Utc::now();
        let week = week_window(now);

        let pending = candidate("A", Some(5.0));
        let mut sent = candidate("B", Some(5.0));
        sent.status = CandidateStatus::OfferSent;
        sent.is_email_sent = true;
        let mut joining = candidate("C", Some(5.0));
        joining.status = CandidateStatus::Accepted;
        joining.is_email_sent = true;
        joining.reporting_date = Some(week.start + Duration::hours(30));

        let stats = CandidateStats::tally([&pending, &sent, &joining], week);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.offer_sent, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.email_sent, 2);
        assert_eq!(stats.email_not_sent, 1);
        assert_eq!(stats.joining_this_week, 1);
    }
}
