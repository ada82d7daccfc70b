//! OSRM HTTP adapter for single-leg travel times.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::OsrmConfig;
use crate::error::LegFailure;
use crate::traits::{Coordinate, LegResolver};

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url, self.config.profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl LegResolver for OsrmClient {
    fn resolve_leg(&self, from: Coordinate, to: Coordinate) -> Result<u32, LegFailure> {
        let url = self.route_url(from, to);
        debug!(%url, "requesting OSRM route");

        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        route_outcome(status, &body)
    }
}

/// Maps an OSRM reply to a leg outcome.
///
/// OSRM reports NoRoute with a 400 and a JSON body, so the body is parsed
/// before the status is looked at.
fn route_outcome(status: StatusCode, body: &str) -> Result<u32, LegFailure> {
    match serde_json::from_str::<OsrmRouteResponse>(body) {
        Ok(response) => response.leg_minutes(),
        Err(_) if !status.is_success() => {
            Err(LegFailure::Transport(format!("OSRM returned {status}")))
        }
        Err(err) => Err(LegFailure::InvalidResponse(err.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
}

impl OsrmRouteResponse {
    fn leg_minutes(&self) -> Result<u32, LegFailure> {
        if self.code != "Ok" {
            return Err(LegFailure::NoRoute);
        }
        let route = self.routes.first().ok_or(LegFailure::NoRoute)?;
        seconds_to_minutes(route.duration)
    }
}

/// Rounds a travel time in seconds up to whole minutes.
pub(crate) fn seconds_to_minutes(seconds: f64) -> Result<u32, LegFailure> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(LegFailure::InvalidResponse(format!(
            "invalid duration {seconds}"
        )));
    }
    let minutes = (seconds / 60.0).ceil();
    if minutes > f64::from(u32::MAX) {
        return Err(LegFailure::InvalidResponse(format!(
            "duration {seconds}s does not fit in minutes"
        )));
    }
    Ok(minutes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> OsrmRouteResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_route_rounds_up() {
        let response = parse(r#"{"code":"Ok","routes":[{"duration":601.2},{"duration":300.0}]}"#);
        assert_eq!(response.leg_minutes(), Ok(11));
    }

    #[test]
    fn test_exact_minutes_do_not_round() {
        assert_eq!(seconds_to_minutes(600.0), Ok(10));
        assert_eq!(seconds_to_minutes(0.0), Ok(0));
    }

    #[test]
    fn test_no_route_code() {
        let response = parse(r#"{"code":"NoRoute","message":"Impossible route"}"#);
        assert_eq!(response.leg_minutes(), Err(LegFailure::NoRoute));
    }

    #[test]
    fn test_ok_without_routes() {
        let response = parse(r#"{"code":"Ok","routes":[]}"#);
        assert_eq!(response.leg_minutes(), Err(LegFailure::NoRoute));
    }

    #[test]
    fn test_negative_duration_is_invalid() {
        assert!(matches!(
            seconds_to_minutes(-1.0),
            Err(LegFailure::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_oversized_duration_is_invalid() {
        assert!(matches!(
            seconds_to_minutes(f64::from(u32::MAX) * 60.0 + 61.0),
            Err(LegFailure::InvalidResponse(_))
        ));
        assert_eq!(seconds_to_minutes(f64::from(u32::MAX) * 60.0), Ok(u32::MAX));
    }

    #[test]
    fn test_no_route_on_bad_request_keeps_json_meaning() {
        let outcome = route_outcome(
            StatusCode::BAD_REQUEST,
            r#"{"code":"NoRoute","message":"Impossible route between points"}"#,
        );
        assert_eq!(outcome, Err(LegFailure::NoRoute));
    }

    #[test]
    fn test_error_status_without_json_is_transport() {
        let outcome = route_outcome(StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>");
        assert_eq!(
            outcome,
            Err(LegFailure::Transport("OSRM returned 502 Bad Gateway".to_string()))
        );
    }

    #[test]
    fn test_success_status_with_garbage_is_invalid() {
        let outcome = route_outcome(StatusCode::OK, "not json");
        assert!(matches!(outcome, Err(LegFailure::InvalidResponse(_))));
    }

    #[test]
    fn test_success_status_with_route() {
        let outcome = route_outcome(StatusCode::OK, r#"{"code":"Ok","routes":[{"duration":59.0}]}"#);
        assert_eq!(outcome, Ok(1));
    }

    #[test]
    fn test_route_url_is_lng_lat() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client.route_url(Coordinate::new(36.1, -115.2), Coordinate::new(36.2, -115.1));
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/car/-115.200000,36.100000;-115.100000,36.200000?overview=false"
        );
    }
}
