//! Replay a scripted preview session against the dry-run engine.
//!
//! Host dialogs are answered by a separate task that plays the host process:
//! requests drained from the controller go out over one channel, canned
//! answers from the script come back over another.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use livemix_common::config::AppConfig;
use livemix_common::error::LivemixResult;
use livemix_compositor::{DryRunEngine, EngineCall, MediaPlayerState, PreviewSurface, SessionState};
use livemix_overlay::{
    CameraSelection, CaptureTarget, FileSelection, HostRequest, InputEvent, LivePreviewController,
    MediaKind, PreviewNotification, PreviewSettings,
};
use livemix_platform_core::{CaptureRegion, DeviceDescriptor, Orientation, ScreenSource};
use livemix_source_model::Source;

/// A replay script.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    /// Cameras the engine reports.
    #[serde(default)]
    pub devices: Vec<DeviceDescriptor>,

    /// Displays and windows the engine reports. Defaults to one 1920x1080 display.
    #[serde(default)]
    pub screens: Option<Vec<ScreenSource>>,

    /// Configuration overrides; missing fields take their defaults.
    #[serde(default)]
    pub config: AppConfig,

    #[serde(default)]
    pub orientation: Orientation,

    /// What the simulated host answers to dialog requests.
    #[serde(default)]
    pub answers: HostAnswers,

    pub steps: Vec<Step>,
}

/// Canned host answers. A missing answer means the operator cancelled.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HostAnswers {
    /// File dialog answers, matched by media kind.
    #[serde(default)]
    pub files: Vec<FileSelection>,
    #[serde(default)]
    pub capture_area: Option<CaptureRegion>,
}

/// One scripted operator action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    AddCamera(CameraSelection),
    AddFullScreen,
    RequestCaptureArea,
    AddWindow { window_id: u64 },
    ListWindows,
    RequestMedia { kind: MediaKind },
    MediaState { state: MediaPlayerState },
    Zoom { value: f64 },
    Input { event: InputEvent },
    Delete,
    MoveUp,
    MoveDown,
    Orientation { orientation: Orientation },
    ToggleOrientation,
    Stop,
}

#[derive(Debug)]
enum HostAnswer {
    File(FileSelection),
    CaptureArea(Option<CaptureTarget>),
}

/// A step whose engine call (or host answer) failed.
#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    pub step: usize,
    pub error: String,
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub orientation: Orientation,
    pub session: SessionState,
    pub sources: Vec<Source>,
    pub notifications: Vec<PreviewNotification>,
    pub failures: Vec<StepFailure>,
    pub calls: Vec<EngineCall>,
}

pub async fn run(script: PathBuf, json: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", script.display()))?;
    let parsed: ReplayScript = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid replay script {}: {e}", script.display()))?;

    let report = replay(parsed).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Run every step of `script` and collect the resulting state.
pub async fn replay(script: ReplayScript) -> anyhow::Result<ReplayReport> {
    let mut engine = DryRunEngine::new().with_devices(script.devices);
    if let Some(screens) = script.screens {
        engine = engine.with_screen_sources(screens);
    }
    let mut settings = PreviewSettings::from(&script.config);
    settings.orientation = script.orientation;

    let mut controller = LivePreviewController::new(engine, PreviewSurface(1), settings);
    controller.initialize();

    let (request_tx, request_rx) = mpsc::channel(8);
    let (answer_tx, mut answer_rx) = mpsc::channel(8);
    let host = tokio::spawn(serve_host(script.answers, request_rx, answer_tx));

    let mut failures = Vec::new();
    for (index, step) in script.steps.into_iter().enumerate() {
        tracing::debug!(index, ?step, "Replaying step");
        if let Err(e) = apply_step(&mut controller, step) {
            tracing::warn!(index, error = %e, "Step failed");
            failures.push(StepFailure {
                step: index,
                error: e.to_string(),
            });
        }

        for request in controller.drain_host_requests() {
            request_tx
                .send(request)
                .await
                .map_err(|_| anyhow::anyhow!("Host task exited early"))?;
            let answer = answer_rx
                .recv()
                .await
                .ok_or_else(|| anyhow::anyhow!("Host task exited early"))?;
            if let Err(e) = apply_answer(&mut controller, answer) {
                tracing::warn!(index, error = %e, "Host answer failed");
                failures.push(StepFailure {
                    step: index,
                    error: e.to_string(),
                });
            }
        }
    }

    drop(request_tx);
    host.await?;

    let notifications = controller.drain_notifications();
    let orientation = controller.orientation();
    let session = controller.session_state();
    let sources = controller.sources().to_vec();
    let calls = controller.into_engine().take_calls();

    Ok(ReplayReport {
        orientation,
        session,
        sources,
        notifications,
        failures,
        calls,
    })
}

async fn serve_host(
    answers: HostAnswers,
    mut requests: mpsc::Receiver<HostRequest>,
    replies: mpsc::Sender<HostAnswer>,
) {
    while let Some(request) = requests.recv().await {
        tracing::debug!(?request, "Host request");
        let answer = match request {
            HostRequest::SelectFile { kind, .. } => HostAnswer::File(
                answers
                    .files
                    .iter()
                    .find(|answer| answer.kind == kind)
                    .cloned()
                    .unwrap_or(FileSelection {
                        kind,
                        paths: Vec::new(),
                    }),
            ),
            HostRequest::SelectCaptureArea { .. } => {
                HostAnswer::CaptureArea(answers.capture_area.map(CaptureTarget::Region))
            }
        };
        if replies.send(answer).await.is_err() {
            break;
        }
    }
}

fn apply_step(
    controller: &mut LivePreviewController<DryRunEngine>,
    step: Step,
) -> LivemixResult<()> {
    match step {
        Step::AddCamera(selection) => controller.add_camera(selection),
        Step::AddFullScreen => controller.add_full_screen(),
        Step::RequestCaptureArea => {
            controller.request_capture_area();
            Ok(())
        }
        Step::AddWindow { window_id } => {
            controller.handle_capture_target(CaptureTarget::Window { window_id })
        }
        Step::ListWindows => {
            for window in controller.list_windows() {
                tracing::info!(id = window.source_id, name = %window.name, "Window");
            }
            Ok(())
        }
        Step::RequestMedia { kind } => {
            controller.request_media(kind);
            Ok(())
        }
        Step::MediaState { state } => {
            controller.on_media_player_state(state);
            Ok(())
        }
        Step::Zoom { value } => {
            controller.set_surface_zoom(value);
            Ok(())
        }
        Step::Input { event } => controller.handle_input(event),
        Step::Delete => controller.delete_selected(),
        Step::MoveUp => controller.move_selected_up(),
        Step::MoveDown => controller.move_selected_down(),
        Step::Orientation { orientation } => controller.set_orientation(orientation),
        Step::ToggleOrientation => controller.toggle_orientation(),
        Step::Stop => controller.stop_preview(),
    }
}

fn apply_answer(
    controller: &mut LivePreviewController<DryRunEngine>,
    answer: HostAnswer,
) -> LivemixResult<()> {
    match answer {
        HostAnswer::File(selection) => controller.handle_file_selection(selection),
        HostAnswer::CaptureArea(Some(target)) => controller.handle_capture_target(target),
        HostAnswer::CaptureArea(None) => {
            tracing::debug!("Capture area selection cancelled");
            Ok(())
        }
    }
}

fn print_report(report: &ReplayReport) {
    println!("Orientation: {:?}", report.orientation);
    match report.session {
        SessionState::Inactive => println!("Session: inactive"),
        SessionState::Active { started_at, .. } => println!("Session: active since {started_at}"),
    }
    println!();

    println!("Sources ({}):", report.sources.len());
    for (index, s) in report.sources.iter().enumerate() {
        println!(
            "  [{index}] {:?} at ({}, {}) {}x{} z={}",
            s.source_type, s.x, s.y, s.width, s.height, s.z_order
        );
    }
    println!();

    println!("Engine calls ({}):", report.calls.len());
    for call in &report.calls {
        match call {
            EngineCall::StartComposition(config) => {
                println!("  start_composition ({} streams)", config.stream_count)
            }
            EngineCall::UpdateComposition(config) => {
                println!("  update_composition ({} streams)", config.stream_count)
            }
            other => println!("  {other:?}"),
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("Failures:");
        for failure in &report.failures {
            println!("  step {}: {}", failure.step, failure.error);
        }
    }
}
