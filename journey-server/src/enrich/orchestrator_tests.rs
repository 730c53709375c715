//! Unit tests for the enrichment orchestrator.

use super::*;
use crate::domain::fixtures::{at, journey};
use crate::domain::{
    BoardKind, Composition, Disruption, DisruptionKind, JourneyDetails, RollingStockId,
    StationCode, Stop, TrainNumber, Unit,
};
use crate::upstream::{MockCall, MockFailure, MockRailSource};
use std::sync::Arc;
use std::time::Duration;

fn code(s: &str) -> StationCode {
    StationCode::parse(s).unwrap()
}

fn train(n: u32) -> TrainNumber {
    TrainNumber::try_from(n).unwrap()
}

fn composition(stock: u64) -> Composition {
    Composition {
        length: 1,
        units: vec![Unit {
            type_code: "VIRM-4".to_string(),
            stock_id: Some(RollingStockId::from(stock)),
            destination: Some("Amsterdam Centraal".to_string()),
            image_url: None,
        }],
        direction: Some("RECHTS".to_string()),
    }
}

fn disruption(id: &str, is_active: bool) -> Disruption {
    Disruption {
        id: id.to_string(),
        kind: DisruptionKind::Disruption,
        is_active,
        title: "Utrecht Centraal - Amersfoort".to_string(),
        situation: Some("Er rijden minder treinen".to_string()),
        additional_travel_time: None,
        timespans: Vec::new(),
        expected_duration: None,
    }
}

fn stop(name: &str, destination: Option<&str>) -> Stop {
    Stop {
        name: name.to_string(),
        uic_code: None,
        destination: destination.map(str::to_string),
        arrival: None,
        departure: None,
    }
}

/// A departures board at UT with trains 3001.. spaced ten minutes apart.
fn board(mock: &MockRailSource, numbers: &[u32]) {
    let journeys = numbers
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let mut j = journey(*n, "2024-03-15T10:00:00+01:00");
            j.planned = j.planned + chrono::Duration::minutes(10 * i as i64);
            j.actual = j.planned;
            j
        })
        .collect();
    mock.set_board(&code("UT"), BoardKind::Departures, journeys);
}

fn enricher(mock: MockRailSource) -> JourneyEnricher<MockRailSource> {
    JourneyEnricher::new(Arc::new(mock))
}

#[tokio::test]
async fn every_row_enriched_in_board_order() {
    let mock = MockRailSource::new();
    board(&mock, &[3001, 3002, 3003]);
    mock.set_composition(train(3001), composition(8651));
    mock.set_composition(train(3003), composition(8653));

    let result = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();

    let numbers: Vec<u32> = result
        .journeys
        .iter()
        .map(|j| j.journey.train_number().get())
        .collect();
    assert_eq!(numbers, vec![3001, 3002, 3003]);

    assert!(result.journeys[0].composition.is_some());
    assert!(result.journeys[1].composition.is_none());
    assert!(result.journeys[2].composition.is_some());
}

#[tokio::test]
async fn composition_failure_degrades_only_that_journey() {
    let mock = MockRailSource::new();
    board(&mock, &[3001, 3002, 3003]);
    mock.set_composition(train(3001), composition(8651));
    mock.fail_composition(train(3002), MockFailure::Status(500));
    mock.set_composition(train(3003), composition(8653));

    let result = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();

    assert_eq!(result.journeys.len(), 3);
    assert_eq!(result.journeys[0].composition, Some(composition(8651)));
    assert_eq!(result.journeys[1].composition, None);
    assert_eq!(result.journeys[2].composition, Some(composition(8653)));
}

#[tokio::test]
async fn board_failure_fails_the_call() {
    let mock = MockRailSource::new();
    mock.fail_board(&code("UT"), BoardKind::Departures, MockFailure::Status(503));

    let err = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::Journeys { .. }));
    assert_eq!(err.upstream().status(), Some(503));
    assert!(!err.is_configuration());
}

#[tokio::test]
async fn missing_disruptions_are_an_empty_list() {
    let mock = MockRailSource::new();
    board(&mock, &[3001]);

    let result = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();

    assert!(result.disruptions.is_empty());
    assert_eq!(result.journeys.len(), 1);
}

#[tokio::test]
async fn disruptions_failure_fails_the_call() {
    let mock = MockRailSource::new();
    board(&mock, &[3001]);
    mock.fail_disruptions(&code("UT"), MockFailure::Status(500));

    let err = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::Disruptions { .. }));
}

#[tokio::test]
async fn only_active_disruptions_returned() {
    let mock = MockRailSource::new();
    board(&mock, &[3001]);
    mock.set_disruptions(
        &code("UT"),
        vec![
            disruption("a", true),
            disruption("b", false),
            disruption("c", true),
        ],
    );

    let result = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();

    let ids: Vec<_> = result.disruptions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn configuration_error_gets_generic_message() {
    let mock = MockRailSource::new();
    mock.fail_board(&code("UT"), BoardKind::Departures, MockFailure::Unconfigured);
    mock.fail_disruptions(&code("UT"), MockFailure::Unconfigured);

    let err = enricher(mock)
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(err.public_message(), GENERIC_UNAVAILABLE_MESSAGE);
    assert!(!err.public_message().contains("subscription"));
}

#[tokio::test]
async fn departures_never_look_up_destination() {
    let mock = MockRailSource::new();
    board(&mock, &[3001, 3002]);
    let mock = Arc::new(mock);
    let enricher = JourneyEnricher::new(mock.clone());

    let result = enricher
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();

    assert!(result.journeys.iter().all(|j| j.final_destination.is_none()));
    assert!(
        !mock
            .calls()
            .iter()
            .any(|c| matches!(c, MockCall::Details(_)))
    );
}

#[tokio::test]
async fn arrivals_get_final_destination() {
    let mock = MockRailSource::new();
    mock.set_board(
        &code("ASD"),
        BoardKind::Arrivals,
        vec![
            journey(3001, "2024-03-15T10:00:00+01:00"),
            journey(3002, "2024-03-15T10:10:00+01:00"),
            journey(3003, "2024-03-15T10:20:00+01:00"),
        ],
    );
    mock.set_details(
        train(3001),
        JourneyDetails {
            stops: vec![
                stop("Nijmegen", Some("Den Helder")),
                stop("Den Helder", Some("Den Helder")),
            ],
            notes: Vec::new(),
        },
    );
    mock.set_details(
        train(3002),
        JourneyDetails {
            stops: vec![stop("Vlissingen", Some("Amsterdam Centraal")), stop("Amsterdam Centraal", None)],
            notes: Vec::new(),
        },
    );
    mock.fail_details(train(3003), MockFailure::Status(500));

    let result = enricher(mock)
        .get_enriched_journeys(&code("ASD"), BoardKind::Arrivals, None)
        .await
        .unwrap();

    let destinations: Vec<_> = result
        .journeys
        .iter()
        .map(|j| j.final_destination.as_deref())
        .collect();
    assert_eq!(
        destinations,
        vec![Some("Den Helder"), Some("Amsterdam Centraal"), None]
    );
}

#[tokio::test]
async fn journey_details_pass_through() {
    let mock = MockRailSource::new();
    mock.set_details(
        train(812),
        JourneyDetails {
            stops: vec![stop("Utrecht Centraal", Some("Eindhoven Centraal"))],
            notes: Vec::new(),
        },
    );
    let enricher = enricher(mock);

    let details = enricher.get_journey_details(train(812)).await.unwrap();
    assert_eq!(details.map(|d| d.stops.len()), Some(1));

    // Not running today
    assert!(enricher.get_journey_details(train(813)).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn lookups_run_concurrently() {
    let mock = MockRailSource::new();
    board(&mock, &[3001, 3002, 3003, 3004, 3005, 3006]);
    mock.set_latency(Duration::from_secs(1));
    let enricher = enricher(mock);

    let start = tokio::time::Instant::now();
    let result = enricher
        .get_enriched_journeys(&code("UT"), BoardKind::Departures, None)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.journeys.len(), 6);
    // Board and disruptions together, then all compositions together.
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
}

#[tokio::test]
async fn date_time_is_accepted() {
    let mock = MockRailSource::new();
    board(&mock, &[3001]);

    let result = enricher(mock)
        .get_enriched_journeys(
            &code("UT"),
            BoardKind::Departures,
            Some(at("2024-03-15T09:30:00+01:00")),
        )
        .await
        .unwrap();

    assert_eq!(result.journeys.len(), 1);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Whatever subset of lookups fails, every row comes back in order
        #[test]
        fn output_matches_board(failures in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mock = MockRailSource::new();
            let numbers: Vec<u32> = (0..failures.len() as u32).map(|i| 4000 + i).collect();
            board(&mock, &numbers);
            for (n, fails) in numbers.iter().zip(&failures) {
                if *fails {
                    mock.fail_composition(train(*n), MockFailure::Status(500));
                } else {
                    mock.set_composition(train(*n), composition(u64::from(*n)));
                }
            }

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let result = rt
                .block_on(enricher(mock).get_enriched_journeys(&code("UT"), BoardKind::Departures, None))
                .unwrap();

            let got: Vec<u32> = result.journeys.iter().map(|j| j.journey.train_number().get()).collect();
            prop_assert_eq!(got, numbers);
            for (j, fails) in result.journeys.iter().zip(&failures) {
                prop_assert_eq!(j.composition.is_none(), *fails);
            }
        }
    }
}
