//! End-to-end point queries through `PointDataService`.

mod common;

use common::{zurich, StoreBuilder};
use point_reader::{
    CdsDomain, Era5HourlyVariable, Era5Variable, Era5VariableDerived, PointDataService,
    PointQuery, ReaderConfig, ReaderError,
};
use serde_json::json;
use test_utils::{diurnal_series, fixtures};
use weather_common::SiUnit;

use CdsDomain::{Era5, Era5Land};

const TEMPERATURE: Era5HourlyVariable = Era5HourlyVariable::Raw(Era5Variable::Temperature2m);
const SOIL_MOISTURE: Era5HourlyVariable =
    Era5HourlyVariable::Raw(Era5Variable::SoilMoisture0To7cm);
const HUMIDITY: Era5HourlyVariable =
    Era5HourlyVariable::Derived(Era5VariableDerived::Relativehumidity2m);

fn populated_service() -> PointDataService {
    let store = StoreBuilder::new()
        .with(
            Era5Land,
            Era5Variable::Temperature2m,
            &diurnal_series(24, 18.0, 6.0, 15.0),
        )
        .constant(Era5Land, Era5Variable::Dewpoint2m, 8.0)
        .constant(Era5, Era5Variable::Temperature2m, 19.0)
        .build();
    PointDataService::new(store, ReaderConfig::default()).unwrap()
}

fn land_then_era5() -> PointQuery {
    PointQuery::new(fixtures::day_range())
        .variables([TEMPERATURE, SOIL_MOISTURE, HUMIDITY])
        .domain(zurich(Era5Land))
        .domain(zurich(Era5))
}

#[tokio::test]
async fn test_failed_variable_does_not_abort_others() {
    let service = populated_service();

    let response = service.query(&land_then_era5()).await;

    assert_eq!(response.results.len(), 3);
    let variables: Vec<_> = response.results.iter().map(|r| r.variable).collect();
    assert_eq!(variables, vec![TEMPERATURE, SOIL_MOISTURE, HUMIDITY]);

    let temperature = response.get(TEMPERATURE).unwrap().as_ref().unwrap();
    assert_eq!(temperature.len(), 24);
    assert_eq!(temperature.unit, SiUnit::Celsius);

    let humidity = response.get(HUMIDITY).unwrap().as_ref().unwrap();
    assert!(humidity.data.iter().all(|rh| (0.0..=100.0).contains(rh)));

    let soil = response.get(SOIL_MOISTURE).unwrap();
    assert!(matches!(soil, Err(ReaderError::NotFound { .. })));
    assert!(response.results[1].series().is_none());
    assert_eq!(response.results[0].series(), Some(temperature));

    assert!(response
        .get(Era5HourlyVariable::Derived(Era5VariableDerived::Rain))
        .is_none());
}

#[tokio::test]
async fn test_response_json_shape() {
    let service = populated_service();
    let response = service.query(&land_then_era5()).await;

    let json = serde_json::to_value(&response).unwrap();
    let results = json["results"].as_array().unwrap();

    assert_eq!(results[0]["variable"], "temperature_2m");
    assert_eq!(results[0]["unit"], "celsius");
    assert_eq!(results[0]["data"].as_array().unwrap().len(), 24);
    assert!(results[0].get("error").is_none());

    assert_eq!(results[1]["variable"], "soil_moisture_0_to_7cm");
    assert!(results[1]["error"].is_string());
    assert!(results[1].get("data").is_none());

    assert_eq!(json["time"]["dt_seconds"], 3600);
}

#[tokio::test]
async fn test_query_from_json() {
    let point = fixtures::point_at(fixtures::locations::ZURICH);
    let body = json!({
        "variables": ["temperature_2m", "relativehumidity_2m"],
        "time": {
            "start": "2024-06-01T00:00:00Z",
            "end": "2024-06-02T00:00:00Z",
            "dt_seconds": 3600
        },
        "domains": [
            { "domain": "era5_land", "point": point },
            { "domain": "era5", "point": point }
        ]
    });

    let query: PointQuery = serde_json::from_value(body).unwrap();
    assert_eq!(query.time, fixtures::day_range());
    assert_eq!(query.domains[0], zurich(Era5Land));
    assert_eq!(query.target_elevation, None);

    let response = populated_service().query(&query).await;
    assert!(response.results.iter().all(|r| r.is_ok()));
}

#[test]
fn test_query_rejects_unknown_variable() {
    let body = json!({
        "variables": ["temperature_3m"],
        "time": {
            "start": "2024-06-01T00:00:00Z",
            "end": "2024-06-02T00:00:00Z",
            "dt_seconds": 3600
        },
        "domains": []
    });
    assert!(serde_json::from_value::<PointQuery>(body).is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ReaderConfig {
        decode_cache_entries: 0,
        ..Default::default()
    };
    let result = PointDataService::new(StoreBuilder::new().build(), config);
    assert!(matches!(result, Err(ReaderError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn test_repeated_query_served_from_cache() {
    let service = populated_service();
    let query = PointQuery::new(fixtures::day_range())
        .variables([TEMPERATURE, HUMIDITY])
        .domain(zurich(Era5Land));

    service.query(&query).await;
    let first = service.cache_stats();

    service.query(&query).await;
    let second = service.cache_stats();

    assert_eq!(second.decodes, first.decodes);
    assert!(second.hits > first.hits);

    assert!(service.clear_cache() > 0);
    assert_eq!(service.cache_stats().entries, 0);
}

#[tokio::test]
async fn test_target_elevation_applies_to_query() {
    let service = populated_service();
    let cell = fixtures::point_at(fixtures::locations::ZURICH).elevation;
    let query = PointQuery::new(fixtures::day_range())
        .variable(TEMPERATURE)
        .domain(zurich(Era5))
        .at_elevation(cell + 1000.0);

    let response = service.query(&query).await;
    let temperature = response.get(TEMPERATURE).unwrap().as_ref().unwrap();

    // 1000 m above the cell at 6.5 K/km
    assert!((temperature.data[0] - 12.5).abs() < 1e-3);
}
