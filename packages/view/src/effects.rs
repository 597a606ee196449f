//! Side effects that feed results back through [`reduce`].
//!
//! Each function issues one backend call and folds its outcome into the
//! state as an [`Action`]. Risk failures become the panel's user-facing
//! message; regeneration failures are returned to the caller.

use park_a_don_api_models::MapKind;
use park_a_don_client::{ClientError, ParkingApi};

use crate::state::{Action, RiskPanel, ViewState, reduce};

/// Runs a risk check for `street`.
///
/// Blank input fails without contacting the backend.
pub async fn query_risk(api: &dyn ParkingApi, state: ViewState, street: &str) -> ViewState {
    let state = reduce(state, Action::RiskRequested(street.to_string()));
    let RiskPanel::Loading { street } = &state.risk else {
        return state;
    };
    let street = street.clone();

    let action = match api.risk(&street).await {
        Ok(assessment) => Action::RiskLoaded {
            street,
            assessment: Box::new(assessment),
        },
        Err(e) => {
            log::warn!("Risk lookup for {street:?} failed: {e}");
            Action::RiskFailed {
                street,
                message: e.user_message(),
            }
        }
    };

    reduce(state, action)
}

/// Asks the backend to rebuild `kind`, reloading the map if it is shown.
///
/// # Errors
///
/// Returns the [`ClientError`] if the backend refused or failed. `state` is
/// left untouched in that case.
pub async fn regenerate_map(
    api: &dyn ParkingApi,
    state: &mut ViewState,
    kind: MapKind,
) -> Result<(), ClientError> {
    if let Err(e) = api.regenerate(kind).await {
        log::error!("Map regeneration failed: {e}");
        return Err(e);
    }
    *state = reduce(std::mem::take(state), Action::MapRegenerated(kind));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use park_a_don_api_models::{MapRegeneration, RiskAssessment};
    use park_a_don_zone_models::{TicketPoint, ZoneRecord};

    use super::*;
    use crate::state::MapView;

    #[derive(Default)]
    struct FakeApi {
        risk_calls: AtomicUsize,
    }

    #[async_trait]
    impl ParkingApi for FakeApi {
        async fn zones(&self) -> Result<Vec<ZoneRecord>, ClientError> {
            Ok(vec![])
        }

        async fn tickets(&self) -> Result<Vec<TicketPoint>, ClientError> {
            Ok(vec![])
        }

        async fn risk(&self, street: &str) -> Result<RiskAssessment, ClientError> {
            self.risk_calls.fetch_add(1, Ordering::SeqCst);
            if street != "Fulton St" {
                return Err(ClientError::Api {
                    status: 404,
                    message: format!("No zone found for {street}"),
                });
            }
            Ok(serde_json::from_str(
                r##"{
                    "zone_id": 7,
                    "risk_score": 81.5,
                    "risk_level": "High",
                    "risk_color": "#FF0000",
                    "recommendation": "Avoid parking here"
                }"##,
            )
            .unwrap())
        }

        async fn regenerate(&self, kind: MapKind) -> Result<MapRegeneration, ClientError> {
            match kind {
                MapKind::Current => Ok(MapRegeneration {
                    success: true,
                    timestamp: None,
                    error: None,
                }),
                MapKind::Combined => Err(ClientError::RegenerationFailed {
                    kind,
                    message: "script crashed".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn risk_success() {
        let api = FakeApi::default();
        let state = query_risk(&api, ViewState::default(), " Fulton St ").await;
        let RiskPanel::Loaded { street, assessment } = state.risk else {
            panic!("expected a loaded panel");
        };
        assert_eq!(street, "Fulton St");
        assert_eq!(assessment.risk_level, "High");
    }

    #[tokio::test]
    async fn risk_failure_shows_backend_message() {
        let api = FakeApi::default();
        let state = query_risk(&api, ViewState::default(), "Nowhere Ln").await;
        assert_eq!(
            state.risk,
            RiskPanel::Failed {
                street: "Nowhere Ln".to_string(),
                message: "No zone found for Nowhere Ln".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn blank_street_skips_backend() {
        let api = FakeApi::default();
        let state = query_risk(&api, ViewState::default(), "  ").await;
        assert!(matches!(state.risk, RiskPanel::Failed { .. }));
        assert_eq!(api.risk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn regeneration_reloads_matching_view() {
        let api = FakeApi::default();
        let mut state = reduce(ViewState::default(), Action::SetMapView(MapView::CurrentStatus));
        let key = state.map_reload_key;

        regenerate_map(&api, &mut state, MapKind::Current).await.unwrap();
        assert_eq!(state.map_reload_key, key + 1);

        let err = regenerate_map(&api, &mut state, MapKind::Combined)
            .await
            .unwrap_err();
        assert_eq!(state.map_reload_key, key + 1);
        assert_eq!(
            err.user_message(),
            "Failed to regenerate combined map: script crashed"
        );
    }
}
