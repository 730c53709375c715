//! Active-disruption merging.

use tracing::debug;

use crate::domain::{Disruption, StationCode};
use crate::upstream::{RailSource, UpstreamError};

/// Fetch a station's disruptions and keep only the active ones.
///
/// "No disruptions" (a 404 upstream) arrives as an empty list; any other
/// upstream failure is returned to the caller.
pub async fn fetch_active_disruptions<S: RailSource>(
    source: &S,
    station: &StationCode,
) -> Result<Vec<Disruption>, UpstreamError> {
    let all = source.fetch_station_disruptions(station).await?;
    let total = all.len();
    let active = retain_active(all);

    debug!(
        station = %station,
        total,
        active = active.len(),
        "Fetched station disruptions"
    );

    Ok(active)
}

/// Drop inactive disruptions, preserving order.
pub fn retain_active(disruptions: Vec<Disruption>) -> Vec<Disruption> {
    disruptions.into_iter().filter(|d| d.is_active).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisruptionKind;
    use crate::upstream::{MockFailure, MockRailSource};

    fn disruption(id: &str, is_active: bool) -> Disruption {
        Disruption {
            id: id.to_string(),
            kind: DisruptionKind::Maintenance,
            is_active,
            title: format!("werkzaamheden {id}"),
            situation: None,
            additional_travel_time: None,
            timespans: Vec::new(),
            expected_duration: None,
        }
    }

    fn ut() -> StationCode {
        StationCode::parse("UT").unwrap()
    }

    #[test]
    fn keeps_active_in_order() {
        let kept = retain_active(vec![
            disruption("a", true),
            disruption("b", false),
            disruption("c", true),
        ]);
        let ids: Vec<_> = kept.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn empty_when_station_has_none() {
        let mock = MockRailSource::new();
        let active = fetch_active_disruptions(&mock, &ut()).await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let mock = MockRailSource::new();
        mock.fail_disruptions(&ut(), MockFailure::Status(500));

        let err = fetch_active_disruptions(&mock, &ut()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Inactive records never survive, active ones all do
            #[test]
            fn only_active_survive(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
                let input: Vec<Disruption> = flags
                    .iter()
                    .enumerate()
                    .map(|(i, active)| disruption(&i.to_string(), *active))
                    .collect();

                let kept = retain_active(input);

                prop_assert!(kept.iter().all(|d| d.is_active));
                prop_assert_eq!(kept.len(), flags.iter().filter(|f| **f).count());
            }
        }
    }
}
