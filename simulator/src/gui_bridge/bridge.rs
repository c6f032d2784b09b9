use crate::generator::profile::{build_stream_payload_from_config, GeneratorConfig};
use crate::gui_bridge::model::DetectionViewModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use csynccore::host_interface::StreamPayload;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9100))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

fn model_from_summary(summary: &crate::workflow::runner::RunSummary) -> DetectionViewModel {
    DetectionViewModel {
        max_score_trace: summary.max_score_trace.clone(),
        frame_count: summary.frame_count,
        best_score: summary.best_score,
        best_lane: summary.best_lane,
        best_offset: summary.best_offset,
        notes: Vec::new(),
    }
}

/// Bridge that hosts the detection HTTP endpoint and processes incoming streams.
pub struct DetectionBridge {
    state: Arc<RwLock<DetectionViewModel>>,
}

impl DetectionBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state = Arc::new(RwLock::new(DetectionViewModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("state")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<DetectionViewModel>>| {
                warp::reply::json(&*state.read().unwrap())
            });

        let post_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |payload: StreamPayload,
                 state: Arc<RwLock<DetectionViewModel>>,
                 runner: Arc<Runner>| async move {
                    match runner.execute(&payload) {
                        Ok(summary) => {
                            let mut guard = state.write().unwrap();
                            *guard = model_from_summary(&summary);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok"})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest error: {}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig,
                 state: Arc<RwLock<DetectionViewModel>>,
                 runner: Arc<Runner>| async move {
                    match build_stream_payload_from_config(&config, runner.reference())
                        .and_then(|payload| runner.execute(&payload))
                    {
                        Ok(summary) => {
                            let mut guard = state.write().unwrap();
                            *guard = model_from_summary(&summary);
                            if let Some(name) = config.scenario.as_ref() {
                                println!(
                                    "[BRIDGE] Scenario {} -> frames {}",
                                    name, summary.frame_count
                                );
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "frames": summary.frame_count,
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-config error: {}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route).or(generator_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &DetectionViewModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[BRIDGE] trace points: {}, frames: {}",
            guard.max_score_trace.len(),
            guard.frame_count
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> DetectionViewModel {
        self.state.read().unwrap().clone()
    }
}
