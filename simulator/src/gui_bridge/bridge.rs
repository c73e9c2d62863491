use crate::gui_bridge::model::{DashboardRequest, SeriesRequest, VisualizationModel};
use crate::workflow::runner::{DashboardResult, PerformanceResult, Runner};
use anyhow::Result;
use rand::rngs::StdRng;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter, Rejection, Reply};

pub const DEFAULT_PORT: u16 = 9000;

pub fn gui_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Hosts the HTTP endpoint a dashboard front end polls and posts to.
///
/// Requests are served on a dedicated thread; the latest model sits behind
/// an `RwLock` shared with the CLI flows that publish into it. A panic while
/// a lock is held does not take the bridge down: the next request picks the
/// guard back up from the poisoned lock.
#[derive(Clone)]
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
    runner: Arc<Runner>,
    rng: Arc<Mutex<StdRng>>,
}

/// `GET /payload`, `POST /ingest-config` and `POST /series`.
pub fn routes(
    bridge: GuiBridge,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let bridge_filter = warp::any().map(move || bridge.clone());

    let get_route = warp::path("payload")
        .and(warp::get())
        .and(bridge_filter.clone())
        .map(|bridge: GuiBridge| {
            warp::reply::with_status(warp::reply::json(&bridge.snapshot()), StatusCode::OK)
        });

    let ingest_route = warp::path("ingest-config")
        .and(warp::post())
        .and(warp::body::json())
        .and(bridge_filter.clone())
        .map(|request: DashboardRequest, bridge: GuiBridge| {
            match bridge.ingest_dashboard(&request) {
                Ok(model) => warp::reply::with_status(warp::reply::json(&model), StatusCode::OK),
                Err(err) => {
                    log::warn!("ingest-config error: {:#}", err);
                    error_reply(StatusCode::BAD_REQUEST, &err)
                }
            }
        });

    let series_route = warp::path("series")
        .and(warp::post())
        .and(warp::body::json())
        .and(bridge_filter)
        .map(|request: SeriesRequest, bridge: GuiBridge| {
            match bridge.ingest_series(&request) {
                Ok(model) => warp::reply::with_status(warp::reply::json(&model), StatusCode::OK),
                Err(err) => {
                    log::warn!("series error: {:#}", err);
                    error_reply(StatusCode::BAD_REQUEST, &err)
                }
            }
        });

    get_route.or(ingest_route).or(series_route)
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let rng = runner.config().rng();
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Starts serving on `127.0.0.1:<port>` in the background.
    pub fn serve(&self, port: u16) {
        let filter = routes(self.clone());
        let address = gui_bind_address(port);
        thread::spawn(move || match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(async move {
                warp::serve(filter).run(address).await;
            }),
            Err(err) => log::error!("failed to build bridge runtime: {}", err),
        });
        log::info!("HTTP bridge listening on http://{}", address);
    }

    /// Generates a dashboard frame for a request and stores it.
    pub fn ingest_dashboard(&self, request: &DashboardRequest) -> Result<VisualizationModel> {
        let selection = self
            .runner
            .guard(self.runner.config().resolve_selection(&request.cells))?;
        let result = self
            .runner
            .dashboard(&mut *self.lock_rng(), &selection, request.mode)?;
        Ok(self.publish(&result))
    }

    /// Samples a performance series for a request and stores it.
    pub fn ingest_series(&self, request: &SeriesRequest) -> Result<VisualizationModel> {
        let selection = self
            .runner
            .guard(self.runner.config().resolve_selection(&request.cells))?;
        let result = self.runner.series(
            &mut *self.lock_rng(),
            &selection,
            &request.modes,
            request.steps_per_mode,
        )?;
        Ok(self.publish_series(&result))
    }

    pub fn publish(&self, result: &DashboardResult) -> VisualizationModel {
        let metrics = self.runner.metrics();
        self.update(|model| {
            model.mode = Some(result.mode);
            model.readings = result.snapshot.readings().to_vec();
            model.summary = Some(result.summary);
            model.metrics = metrics;
            model.status = format!(
                "Dashboard generated for {} cells ({})",
                result.snapshot.len(),
                result.mode
            );
        })
    }

    pub fn publish_series(&self, result: &PerformanceResult) -> VisualizationModel {
        let metrics = self.runner.metrics();
        self.update(|model| {
            model.series = result.records.clone();
            model.metrics = metrics;
            model.status = format!("Series sampled: {} records", result.records.len());
        })
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
        self.update(|model| model.status = message.to_string());
    }

    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| {
            log::warn!("recovering bridge rng after a panicked request");
            poisoned.into_inner()
        })
    }

    fn update<F>(&self, apply: F) -> VisualizationModel
    where
        F: FnOnce(&mut VisualizationModel),
    {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
        guard.clone()
    }
}

fn error_reply(
    status: StatusCode,
    err: &anyhow::Error,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({
            "status": "error",
            "message": format!("{:#}", err),
        })),
        status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use cellcore::prelude::OperatingMode;
    use cellcore::SimError;

    fn bridge() -> GuiBridge {
        let cfg = WorkflowConfig {
            seed: Some(17),
            ..Default::default()
        };
        GuiBridge::new(Arc::new(Runner::new(cfg)))
    }

    #[test]
    fn gui_bridge_updates_state() {
        let gui = bridge();
        let request = DashboardRequest {
            cells: vec!["lfp".into(), "nimh".into()],
            mode: OperatingMode::Discharging,
        };
        let model = gui.ingest_dashboard(&request).unwrap();
        assert_eq!(model.readings.len(), 2);
        assert_eq!(model.mode, Some(OperatingMode::Discharging));
        assert_eq!(gui.snapshot().readings, model.readings);
        assert_eq!(gui.snapshot().metrics.snapshots, 1);
    }

    #[test]
    fn gui_bridge_rejects_empty_selection() {
        let gui = bridge();
        let request = DashboardRequest {
            cells: Vec::new(),
            mode: OperatingMode::Idle,
        };
        let err = gui.ingest_dashboard(&request).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimError>(),
            Some(&SimError::InvalidSelection)
        );
        assert!(gui.snapshot().readings.is_empty());
    }

    #[test]
    fn gui_bridge_stores_series() {
        let gui = bridge();
        let request: SeriesRequest =
            serde_json::from_str(r#"{"cells": ["lfp", "nmc", "nca"], "steps_per_mode": 2}"#)
                .unwrap();
        let model = gui.ingest_series(&request).unwrap();
        assert_eq!(model.series.len(), 6);
        assert_eq!(model.series[0].mode, OperatingMode::Idle);
    }

    #[test]
    fn gui_bridge_enforces_cell_limit_and_dedupe() {
        let gui = bridge();
        let oversized = DashboardRequest {
            cells: vec!["nmc".into(); 21],
            mode: OperatingMode::Idle,
        };
        let err = gui.ingest_dashboard(&oversized).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::InvalidConfig(_))
        ));
        assert!(gui.snapshot().readings.is_empty());

        let cfg = WorkflowConfig {
            dedupe: true,
            seed: Some(3),
            ..Default::default()
        };
        let deduping = GuiBridge::new(Arc::new(Runner::new(cfg)));
        let request = DashboardRequest {
            cells: vec!["lfp".into(), "lfp".into(), "nca".into()],
            mode: OperatingMode::Charging,
        };
        assert_eq!(deduping.ingest_dashboard(&request).unwrap().readings.len(), 2);
    }

    #[test]
    fn gui_bridge_rejects_unbounded_series_and_keeps_serving() {
        let gui = bridge();
        let request = SeriesRequest {
            cells: vec!["lfp".into()],
            modes: OperatingMode::ALL.to_vec(),
            steps_per_mode: usize::MAX / 2,
        };
        assert!(gui.ingest_series(&request).is_err());

        let next = DashboardRequest {
            cells: vec!["lfp".into()],
            mode: OperatingMode::Idle,
        };
        assert_eq!(gui.ingest_dashboard(&next).unwrap().readings.len(), 1);
    }

    #[test]
    fn gui_bridge_recovers_poisoned_rng() {
        let gui = bridge();
        let poisoner = gui.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.rng.lock();
            panic!("request handler panicked");
        })
        .join();
        assert!(gui.rng.is_poisoned());

        let request = DashboardRequest {
            cells: vec!["nca".into()],
            mode: OperatingMode::Charging,
        };
        assert_eq!(gui.ingest_dashboard(&request).unwrap().readings.len(), 1);
    }

    #[tokio::test]
    async fn ingest_route_answers_bad_request_with_error_body() {
        let filter = routes(bridge());
        let response = warp::test::request()
            .method("POST")
            .path("/ingest-config")
            .json(&json!({ "cells": [], "mode": "Idle" }))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("at least one cell type"));
    }

    #[tokio::test]
    async fn payload_route_returns_latest_model() {
        let filter = routes(bridge());
        let ingest = warp::test::request()
            .method("POST")
            .path("/ingest-config")
            .json(&json!({ "cells": ["lfp", "nmc"], "mode": "charging" }))
            .reply(&filter)
            .await;
        assert_eq!(ingest.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/payload")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["mode"], "Charging");
        assert_eq!(body["readings"].as_array().unwrap().len(), 2);
        assert_eq!(body["metrics"]["snapshots"], 1);
    }

    #[tokio::test]
    async fn series_route_rejects_oversized_steps() {
        let filter = routes(bridge());
        let response = warp::test::request()
            .method("POST")
            .path("/series")
            .json(&json!({ "cells": ["lfp"], "steps_per_mode": 1_000_000_000u64 }))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
