//! The live preview controller.
//!
//! Owns the source registry and every piece of state derived from it, and
//! reacts to discrete inputs: menu actions, pointer events, host answers and
//! engine callbacks. Each method runs to completion; registry mutations and
//! the engine calls they trigger happen in the order the inputs arrive.

use std::path::Path;

use serde::Deserialize;

use livemix_common::config::AppConfig;
use livemix_common::error::{LivemixError, LivemixResult};
use livemix_common::throttle::LiveUpdateThrottle;
use livemix_compositor::{
    CompositionEngine, CompositionSessionManager, MediaPlayerState, PreviewSurface, SessionCall,
    SessionState,
};
use livemix_platform_core::{
    capturable_windows, primary_display, CameraCaptureConfig, CaptureConfig, CaptureRegion,
    DeviceDescriptor, Orientation, ScreenCaptureParameters, ScreenSource,
};
use livemix_source_model::{
    MediaPlayerHandle, NewSource, Source, SourceDefaults, SourceRegistry, SourceType, Zoom,
};

use crate::bridge::{CaptureTarget, FileSelection, HostBridge, HostRequest, MediaKind};
use crate::input::{ControlAction, InputEvent};
use crate::layout::LayoutController;
use crate::notification::PreviewNotification;
use crate::selection::{SelectionCommand, SelectionController};

/// Camera and format picked in the camera dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CameraSelection {
    pub device_index: usize,
    pub capability_index: usize,
    /// Frame rate entered by the operator, replacing the capability's.
    #[serde(default)]
    pub fps_override: Option<u32>,
}

/// Tunables of the preview controller.
#[derive(Debug, Clone, Copy)]
pub struct PreviewSettings {
    pub source_defaults: SourceDefaults,
    pub output_frame_rate: u32,
    pub live_update_hz: u32,
    pub screen_capture: ScreenCaptureParameters,
    pub orientation: Orientation,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PreviewSettings {
    fn from(config: &AppConfig) -> Self {
        let capture = &config.screen_capture;
        Self {
            source_defaults: SourceDefaults {
                width: config.preview.source_width,
                height: config.preview.source_height,
            },
            output_frame_rate: config.preview.output_frame_rate,
            live_update_hz: config.preview.live_update_hz,
            screen_capture: ScreenCaptureParameters {
                width: capture.width,
                height: capture.height,
                bitrate: capture.bitrate,
                frame_rate: capture.frame_rate,
                capture_cursor: capture.capture_cursor,
            },
            orientation: Orientation::Horizontal,
        }
    }
}

/// The compositing overlay controller.
///
/// The engine is injected at construction; there is no global engine handle.
pub struct LivePreviewController<E: CompositionEngine> {
    engine: E,
    registry: SourceRegistry,
    selection: SelectionController,
    session: CompositionSessionManager,
    layout: LayoutController,
    bridge: HostBridge,
    throttle: LiveUpdateThrottle,
    zoom: Option<Zoom>,
    devices: Vec<DeviceDescriptor>,
    media_player: Option<MediaPlayerHandle>,
    screen_capture: ScreenCaptureParameters,
    notifications: Vec<PreviewNotification>,
}

impl<E: CompositionEngine> LivePreviewController<E> {
    pub fn new(engine: E, surface: PreviewSurface, settings: PreviewSettings) -> Self {
        Self {
            engine,
            registry: SourceRegistry::new(settings.source_defaults),
            selection: SelectionController::new(),
            session: CompositionSessionManager::new(surface, settings.output_frame_rate),
            layout: LayoutController::new(settings.orientation),
            bridge: HostBridge::new(),
            throttle: LiveUpdateThrottle::new(settings.live_update_hz),
            zoom: None,
            devices: Vec::new(),
            media_player: None,
            screen_capture: settings.screen_capture,
            notifications: Vec::new(),
        }
    }

    /// Enumerate cameras and create the media player, once the engine is up.
    pub fn initialize(&mut self) {
        self.refresh_devices();
        self.ensure_media_player();
    }

    /// Re-enumerate cameras. An empty list is reported, not fatal.
    pub fn refresh_devices(&mut self) -> &[DeviceDescriptor] {
        self.devices = self.engine.enumerate_capture_devices();
        if self.devices.is_empty() {
            tracing::warn!("No capture devices found");
            self.notify(PreviewNotification::NoCaptureDevices);
        } else {
            tracing::info!(count = self.devices.len(), "Capture devices enumerated");
        }
        &self.devices
    }

    // Source additions

    /// Start the selected camera and add it to the composition. Adding a
    /// camera slot that is already present only reconfigures the session.
    pub fn add_camera(&mut self, selection: CameraSelection) -> LivemixResult<()> {
        if self.devices.is_empty() {
            tracing::warn!("Camera requested but no capture devices are available");
            self.notify(PreviewNotification::NoCaptureDevices);
            return Err(LivemixError::DeviceEnumerationEmpty);
        }
        let Some(device) = self.devices.get(selection.device_index) else {
            tracing::debug!(index = selection.device_index, "Unknown camera device");
            return Ok(());
        };
        let Some(mut format) = device.capability(selection.capability_index) else {
            tracing::debug!(
                index = selection.capability_index,
                "Unknown camera capability"
            );
            return Ok(());
        };
        if let Some(fps) = selection.fps_override {
            format.fps = fps;
        }

        let source_type = SourceType::camera_for_device(selection.device_index);
        let config = CaptureConfig::Camera(CameraCaptureConfig {
            device_id: device.device_id.clone(),
            format,
        });
        tracing::info!(
            ?source_type,
            device = %device.device_id,
            width = format.width,
            height = format.height,
            fps = format.fps,
            "Starting camera capture"
        );
        self.start_capture(source_type, &config)?;

        match self.registry.add(NewSource::capture(source_type)) {
            Ok(_) => self.notify_snapshot(),
            Err(LivemixError::DuplicateCaptureSource { index }) => {
                tracing::info!(?source_type, index, "Camera already composited; reconfiguring");
            }
            Err(e) => return Err(e),
        }
        self.sync()
    }

    /// Capture the whole primary display.
    pub fn add_full_screen(&mut self) -> LivemixResult<()> {
        let screens = self.engine.enumerate_screen_sources();
        let Some(display) = primary_display(&screens) else {
            tracing::warn!("No display available for screen capture");
            return Err(LivemixError::capture("no display available"));
        };
        let config = CaptureConfig::Display {
            display_id: display.source_id,
            region: CaptureRegion::FULL,
            parameters: self.screen_capture,
        };
        self.start_capture(SourceType::ScreenPrimary, &config)?;
        self.add_capture_source(SourceType::ScreenPrimary)
    }

    /// Ask the host to let the operator draw a capture area.
    pub fn request_capture_area(&mut self) {
        let screens = self.engine.enumerate_screen_sources();
        let bounds = primary_display(&screens).map(|d| d.position);
        self.bridge.request_capture_area(bounds);
    }

    /// Windows the operator can pick for window capture.
    pub fn list_windows(&mut self) -> Vec<ScreenSource> {
        capturable_windows(&self.engine.enumerate_screen_sources())
    }

    /// Capture the area or window the operator selected.
    pub fn handle_capture_target(&mut self, target: CaptureTarget) -> LivemixResult<()> {
        let config = match target {
            CaptureTarget::Region(region) => {
                if !self.bridge.resolve_capture_area() {
                    tracing::warn!("Capture area answer without an outstanding request");
                }
                let screens = self.engine.enumerate_screen_sources();
                let Some(display) = primary_display(&screens) else {
                    tracing::warn!("No display available for area capture");
                    return Err(LivemixError::capture("no display available"));
                };
                CaptureConfig::Display {
                    display_id: display.source_id,
                    region,
                    parameters: self.screen_capture,
                }
            }
            CaptureTarget::Window { window_id } => CaptureConfig::Window {
                window_id,
                parameters: self.screen_capture,
            },
        };
        // The screen slot captures one area or window at a time.
        if self.registry.contains_type(SourceType::ScreenPrimary) {
            let status = self.engine.stop_capture(SourceType::ScreenPrimary);
            tracing::debug!(status = status.0, "Stopped previous screen capture");
        }
        self.start_capture(SourceType::ScreenPrimary, &config)?;
        self.add_capture_source(SourceType::ScreenPrimary)
    }

    /// Ask the host for a media file of the given kind.
    pub fn request_media(&mut self, kind: MediaKind) {
        self.bridge.request_file(kind);
    }

    /// Route a file dialog answer. A cancelled dialog is a no-op.
    pub fn handle_file_selection(&mut self, selection: FileSelection) -> LivemixResult<()> {
        match self.bridge.resolve_file(selection) {
            Some((kind, path)) => self.handle_add_media_source(&path, kind),
            None => {
                tracing::debug!("File selection cancelled");
                Ok(())
            }
        }
    }

    /// Add an image, GIF or video file to the composition.
    pub fn handle_add_media_source(&mut self, path: &Path, kind: MediaKind) -> LivemixResult<()> {
        let new = match kind {
            MediaKind::Image => NewSource::image(SourceType::image_for_path(path), path),
            MediaKind::Gif => NewSource::image(SourceType::ImageGif, path),
            MediaKind::Video => {
                let handle = self.ensure_media_player();
                let status = self.engine.open_media(handle, path);
                if !status.is_ok() {
                    tracing::warn!(path = %path.display(), status = status.0, "Failed to open media");
                    self.notify(PreviewNotification::CaptureFailed {
                        source_type: SourceType::MediaPlayer,
                        status: status.0,
                    });
                    return Err(LivemixError::capture(format!(
                        "failed to open {}",
                        path.display()
                    )));
                }
                NewSource::media_player(handle)
            }
        };
        tracing::info!(?kind, path = %path.display(), "Adding media source");
        self.registry.add(new)?;
        self.notify_snapshot();
        self.sync()
    }

    /// React to media player state changes; playback starts once open.
    pub fn on_media_player_state(&mut self, state: MediaPlayerState) {
        tracing::debug!(?state, "Media player state changed");
        if state == MediaPlayerState::OpenCompleted {
            if let Some(handle) = self.media_player {
                let status = self.engine.play_media(handle);
                if !status.is_ok() {
                    tracing::warn!(status = status.0, "Failed to start media playback");
                }
            }
        }
    }

    // Pointer input

    /// Record the zoom of the rendered preview. A non-positive value means
    /// the surface is not laid out yet; pointer geometry is deferred until
    /// a usable zoom arrives.
    pub fn set_surface_zoom(&mut self, value: f64) {
        match Zoom::new(value) {
            Ok(zoom) => {
                self.zoom = Some(zoom);
                if self.selection.refresh(self.registry.snapshot(), zoom) {
                    self.notify_selection();
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Preview surface not ready");
                self.zoom = None;
            }
        }
    }

    /// Feed one pointer event through the selection state machine.
    pub fn handle_input(&mut self, event: InputEvent) -> LivemixResult<()> {
        let Some(zoom) = self.zoom else {
            tracing::debug!(?event, "Ignoring pointer input until the preview has a zoom");
            return Ok(());
        };
        if matches!(event, InputEvent::PointerDown { .. }) {
            self.throttle.reset();
        }

        let Some(command) = self
            .selection
            .handle(event, self.registry.snapshot(), zoom)
        else {
            return Ok(());
        };

        match command {
            SelectionCommand::SelectionChanged => {
                self.notify_selection();
                Ok(())
            }
            SelectionCommand::LivePreview {
                index,
                delta,
                timestamp_ns,
            } => {
                self.notify_selection();
                if !self.throttle.should_tick(timestamp_ns) {
                    return Ok(());
                }
                let candidate = match self.registry.preview_with(index, delta) {
                    Ok(candidate) => candidate,
                    Err(e) => return self.recover(e),
                };
                match self.session.push_live(&mut self.engine, &candidate) {
                    Ok(_) => Ok(()),
                    Err(e) => self.report(e),
                }
            }
            SelectionCommand::Commit { index, delta } => {
                if let Err(e) = self.registry.update_geometry(index, delta) {
                    return self.recover(e);
                }
                self.notify_snapshot();
                self.selection.refresh(self.registry.snapshot(), zoom);
                self.notify_selection();
                self.sync()
            }
            SelectionCommand::Control { action, index } => self.apply_control(action, index),
        }
    }

    /// Remove the selected source.
    pub fn delete_selected(&mut self) -> LivemixResult<()> {
        self.control_selected(ControlAction::Delete)
    }

    /// Raise the selected source.
    pub fn move_selected_up(&mut self) -> LivemixResult<()> {
        self.control_selected(ControlAction::MoveUp)
    }

    /// Lower the selected source.
    pub fn move_selected_down(&mut self) -> LivemixResult<()> {
        self.control_selected(ControlAction::MoveDown)
    }

    // Session and layout

    /// Switch the output canvas. Any change tears the session down and
    /// clears every source.
    pub fn set_orientation(&mut self, orientation: Orientation) -> LivemixResult<()> {
        if !self.layout.set(orientation) {
            return Ok(());
        }
        self.stop_preview()
    }

    pub fn toggle_orientation(&mut self) -> LivemixResult<()> {
        self.set_orientation(self.layout.orientation().toggled())
    }

    /// Stop the composition and clear all sources and the selection.
    pub fn stop_preview(&mut self) -> LivemixResult<()> {
        let stopped = self.session.stop(&mut self.engine);
        if !matches!(stopped, Ok(false)) {
            self.notify(PreviewNotification::SessionStopped);
        }

        let had_sources = !self.registry.is_empty();
        let had_selection = self.selection.selected().is_some();
        self.registry.clear();
        self.selection.clear();
        if had_sources {
            self.notify_snapshot();
        }
        if had_selection {
            self.notify_selection();
        }

        match stopped {
            Ok(_) => Ok(()),
            Err(e) => self.report(e),
        }
    }

    // Accessors

    pub fn sources(&self) -> &[Source] {
        self.registry.snapshot()
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_previewing(&self) -> bool {
        self.session.is_active()
    }

    pub fn orientation(&self) -> Orientation {
        self.layout.orientation()
    }

    pub fn zoom(&self) -> Option<Zoom> {
        self.zoom
    }

    /// Extent of the pointer mask, once the preview has a zoom.
    pub fn mask_size(&self) -> Option<(i32, i32)> {
        self.zoom.map(|zoom| self.layout.mask_size(zoom))
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Take all notifications emitted since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<PreviewNotification> {
        std::mem::take(&mut self.notifications)
    }

    /// Take all requests queued for the host process.
    pub fn drain_host_requests(&mut self) -> Vec<HostRequest> {
        self.bridge.drain()
    }

    // Internal helpers

    fn control_selected(&mut self, action: ControlAction) -> LivemixResult<()> {
        match self.selection.selected() {
            Some(index) => self.apply_control(action, index),
            None => Ok(()),
        }
    }

    /// Run a selection-box action. The selection is cleared afterwards so a
    /// shifted collection is never addressed through a stale index.
    fn apply_control(&mut self, action: ControlAction, index: usize) -> LivemixResult<()> {
        let changed = match action {
            ControlAction::Delete => self.registry.remove(index).map(|_| true),
            ControlAction::MoveUp => self.registry.move_up(index).map(|_| true),
            ControlAction::MoveDown => self.registry.move_down(index),
        };
        match changed {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => return self.recover(e),
        }

        tracing::debug!(?action, index, "Selection action applied");
        self.notify_snapshot();
        let result = self.sync();
        self.selection.clear();
        self.notify_selection();
        result
    }

    fn add_capture_source(&mut self, source_type: SourceType) -> LivemixResult<()> {
        match self.registry.add(NewSource::capture(source_type)) {
            Ok(_) => self.notify_snapshot(),
            Err(e) if e.is_local() => tracing::debug!(error = %e, "Capture source not inserted"),
            Err(e) => return Err(e),
        }
        self.sync()
    }

    fn start_capture(&mut self, source_type: SourceType, config: &CaptureConfig) -> LivemixResult<()> {
        let status = self.engine.start_capture(source_type, config);
        if status.is_ok() {
            return Ok(());
        }
        tracing::warn!(?source_type, status = status.0, "Capture failed to start");
        self.notify(PreviewNotification::CaptureFailed {
            source_type,
            status: status.0,
        });
        Err(LivemixError::capture(format!(
            "{source_type:?} capture failed with status {}",
            status.0
        )))
    }

    fn ensure_media_player(&mut self) -> MediaPlayerHandle {
        match self.media_player {
            Some(handle) => handle,
            None => {
                let handle = self.engine.create_media_player();
                tracing::debug!(?handle, "Media player created");
                self.media_player = Some(handle);
                handle
            }
        }
    }

    /// Push the committed registry to the engine, starting the session if
    /// needed. Failures are reported but the registry is kept as is.
    fn sync(&mut self) -> LivemixResult<()> {
        let orientation = self.layout.orientation();
        match self
            .session
            .sync(&mut self.engine, self.registry.snapshot(), orientation)
        {
            Ok(SessionCall::Started) => {
                if let SessionState::Active {
                    orientation,
                    started_at,
                } = self.session.state()
                {
                    self.notify(PreviewNotification::SessionStarted {
                        orientation,
                        started_at,
                    });
                }
                Ok(())
            }
            Ok(SessionCall::Updated) => Ok(()),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: LivemixError) -> LivemixResult<()> {
        tracing::warn!(error = %err, "Engine call failed; registry kept");
        if let LivemixError::CompositionFailure { operation, status } = err {
            self.notify(PreviewNotification::CompositionFailed { operation, status });
        }
        Err(err)
    }

    fn recover(&mut self, err: LivemixError) -> LivemixResult<()> {
        tracing::debug!(error = %err, "Ignoring request");
        if matches!(err, LivemixError::InvalidIndex { .. }) {
            self.selection.clear();
        }
        Ok(())
    }

    fn notify(&mut self, notification: PreviewNotification) {
        self.notifications.push(notification);
    }

    fn notify_snapshot(&mut self) {
        self.notify(PreviewNotification::SnapshotChanged {
            source_count: self.registry.len(),
        });
    }

    fn notify_selection(&mut self) {
        self.notify(PreviewNotification::SelectionChanged {
            selected: self.selection.selected(),
            selection_box: self.selection.selection_box(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemix_compositor::{DryRunEngine, EngineCall};
    use livemix_platform_core::DeviceCapability;

    fn camera_device(id: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            device_id: id.to_string(),
            device_name: id.to_string(),
            capabilities: vec![DeviceCapability {
                width: 1280,
                height: 720,
                fps: 30,
            }],
        }
    }

    fn controller(engine: DryRunEngine) -> LivePreviewController<DryRunEngine> {
        let mut controller =
            LivePreviewController::new(engine, PreviewSurface(7), PreviewSettings::default());
        controller.initialize();
        controller
    }

    fn first_camera() -> CameraSelection {
        CameraSelection {
            device_index: 0,
            capability_index: 0,
            fps_override: None,
        }
    }

    #[test]
    fn initialize_reports_missing_cameras() {
        let mut c = controller(DryRunEngine::new());
        assert!(c
            .drain_notifications()
            .contains(&PreviewNotification::NoCaptureDevices));
        assert!(matches!(
            c.add_camera(first_camera()),
            Err(LivemixError::DeviceEnumerationEmpty)
        ));
        assert!(c.sources().is_empty());
    }

    #[test]
    fn fps_override_reaches_capture_config() {
        let engine = DryRunEngine::new().with_devices(vec![camera_device("cam0")]);
        let mut c = controller(engine);
        c.add_camera(CameraSelection {
            fps_override: Some(15),
            ..first_camera()
        })
        .unwrap();

        let format = c.engine().calls().iter().find_map(|call| match call {
            EngineCall::StartCapture {
                config: CaptureConfig::Camera(camera),
                ..
            } => Some(camera.format),
            _ => None,
        });
        assert_eq!(format.map(|f| f.fps), Some(15));
    }

    #[test]
    fn duplicate_camera_reconfigures_only() {
        let engine = DryRunEngine::new().with_devices(vec![camera_device("cam0")]);
        let mut c = controller(engine);
        c.add_camera(first_camera()).unwrap();
        c.add_camera(first_camera()).unwrap();

        assert_eq!(c.sources().len(), 1);
        assert_eq!(c.engine().start_count(), 1);
        assert_eq!(c.engine().update_count(), 1);
    }

    #[test]
    fn failed_capture_adds_nothing() {
        let mut engine = DryRunEngine::new();
        engine.fail_capture(Some(-3));
        let mut c = controller(engine);
        c.drain_notifications();

        assert!(c.add_full_screen().is_err());
        assert!(c.sources().is_empty());
        assert_eq!(c.engine().start_count(), 0);
        assert_eq!(
            c.drain_notifications(),
            vec![PreviewNotification::CaptureFailed {
                source_type: SourceType::ScreenPrimary,
                status: -3,
            }]
        );
    }

    #[test]
    fn region_capture_restarts_screen_slot() {
        let mut c = controller(DryRunEngine::new());
        c.request_capture_area();
        assert_eq!(
            c.drain_host_requests(),
            vec![HostRequest::SelectCaptureArea {
                display_bounds: Some(CaptureRegion {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1080,
                }),
            }]
        );

        let region = CaptureRegion {
            x: 100,
            y: 50,
            width: 640,
            height: 360,
        };
        c.handle_capture_target(CaptureTarget::Region(region)).unwrap();
        // Nothing to stop while the screen slot is unused.
        assert!(!c
            .engine()
            .calls()
            .contains(&EngineCall::StopCapture(SourceType::ScreenPrimary)));

        c.handle_capture_target(CaptureTarget::Window { window_id: 7 })
            .unwrap();
        let calls = c.engine().calls();
        let stop = calls
            .iter()
            .position(|call| *call == EngineCall::StopCapture(SourceType::ScreenPrimary));
        let start = calls.iter().position(|call| {
            matches!(
                call,
                EngineCall::StartCapture {
                    config: CaptureConfig::Window { window_id: 7, .. },
                    ..
                }
            )
        });
        assert!(stop.is_some() && start.is_some());
        assert!(stop < start);
        assert_eq!(c.sources().len(), 2);
        assert!(c
            .sources()
            .iter()
            .all(|s| s.source_type == SourceType::ScreenPrimary));
    }

    #[test]
    fn video_opens_on_player_and_plays_when_ready() {
        let mut c = controller(DryRunEngine::new());
        c.request_media(MediaKind::Video);
        c.handle_file_selection(FileSelection {
            kind: MediaKind::Video,
            paths: vec!["/tmp/clip.mp4".into()],
        })
        .unwrap();

        let source = &c.sources()[0];
        assert_eq!(source.source_type, SourceType::MediaPlayer);
        assert_eq!(source.media_player(), Some(MediaPlayerHandle(1)));

        c.on_media_player_state(MediaPlayerState::Opening);
        c.on_media_player_state(MediaPlayerState::OpenCompleted);
        let plays = c
            .engine()
            .calls()
            .iter()
            .filter(|call| matches!(call, EngineCall::PlayMedia(_)))
            .count();
        assert_eq!(plays, 1);
    }

    #[test]
    fn cancelled_file_dialog_is_a_noop() {
        let mut c = controller(DryRunEngine::new());
        c.request_media(MediaKind::Image);
        c.handle_file_selection(FileSelection {
            kind: MediaKind::Image,
            paths: vec![],
        })
        .unwrap();
        assert!(c.sources().is_empty());
        assert_eq!(c.engine().start_count(), 0);
    }

    #[test]
    fn input_is_deferred_without_zoom() {
        let mut c = controller(DryRunEngine::new());
        c.handle_add_media_source(Path::new("/tmp/a.png"), MediaKind::Image)
            .unwrap();
        c.set_surface_zoom(0.0);
        c.handle_input(InputEvent::PointerDown {
            target: crate::input::PointerTarget::Mask,
            x: 10,
            y: 10,
        })
        .unwrap();
        assert_eq!(c.selection().selected(), None);
        assert_eq!(c.mask_size(), None);

        c.set_surface_zoom(1.0);
        c.handle_input(InputEvent::PointerDown {
            target: crate::input::PointerTarget::Mask,
            x: 10,
            y: 10,
        })
        .unwrap();
        assert_eq!(c.selection().selected(), Some(0));
        assert_eq!(c.mask_size(), Some((1280, 720)));
    }

    #[test]
    fn move_down_at_floor_keeps_selection() {
        let mut c = controller(DryRunEngine::new());
        c.set_surface_zoom(1.0);
        c.handle_add_media_source(Path::new("/tmp/a.png"), MediaKind::Image)
            .unwrap();
        c.handle_input(InputEvent::PointerDown {
            target: crate::input::PointerTarget::Mask,
            x: 5,
            y: 5,
        })
        .unwrap();
        let updates = c.engine().update_count();

        // z_order 2 -> 1 is allowed once, then the floor is reached.
        c.move_selected_down().unwrap();
        assert_eq!(c.sources()[0].z_order, 1);
        assert_eq!(c.selection().selected(), None);
        assert_eq!(c.engine().update_count(), updates + 1);

        c.handle_input(InputEvent::PointerDown {
            target: crate::input::PointerTarget::Mask,
            x: 5,
            y: 5,
        })
        .unwrap();
        c.move_selected_down().unwrap();
        assert_eq!(c.sources()[0].z_order, 1);
        assert_eq!(c.selection().selected(), Some(0));
        assert_eq!(c.engine().update_count(), updates + 1);
    }

    #[test]
    fn failed_update_keeps_registry_and_reports() {
        let mut c = controller(DryRunEngine::new());
        c.handle_add_media_source(Path::new("/tmp/a.png"), MediaKind::Image)
            .unwrap();
        c.engine_mut().fail_update(Some(-1));
        c.drain_notifications();

        let result = c.handle_add_media_source(Path::new("/tmp/b.gif"), MediaKind::Gif);
        assert!(matches!(
            result,
            Err(LivemixError::CompositionFailure { operation: "update", status: -1 })
        ));
        assert_eq!(c.sources().len(), 2);
        assert!(c.is_previewing());
        assert!(c
            .drain_notifications()
            .contains(&PreviewNotification::CompositionFailed {
                operation: "update",
                status: -1,
            }));
    }

    #[test]
    fn stop_preview_clears_everything() {
        let mut c = controller(DryRunEngine::new());
        c.add_full_screen().unwrap();
        c.drain_notifications();

        c.stop_preview().unwrap();
        assert!(c.sources().is_empty());
        assert_eq!(c.session_state(), SessionState::Inactive);
        assert_eq!(
            c.drain_notifications(),
            vec![
                PreviewNotification::SessionStopped,
                PreviewNotification::SnapshotChanged { source_count: 0 },
            ]
        );
    }
}
