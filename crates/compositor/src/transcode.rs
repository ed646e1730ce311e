//! Translation of the source registry into the engine's layer list.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use livemix_platform_core::Orientation;
use livemix_source_model::{MediaPlayerHandle, Source, SourceType};

/// One input layer of the composition, as the engine expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStream {
    pub source_type: SourceType,
    /// Local sources only; always zero.
    pub connection_id: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z_order: i32,
    pub alpha: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_player_id: Option<MediaPlayerHandle>,
}

impl From<&Source> for LayerStream {
    fn from(source: &Source) -> Self {
        Self {
            source_type: source.source_type,
            connection_id: 0,
            x: source.x,
            y: source.y,
            width: source.width,
            height: source.height,
            z_order: source.z_order,
            alpha: source.alpha,
            image_url: source.image_url().map(|p| p.to_path_buf()),
            media_player_id: source.media_player(),
        }
    }
}

/// Encoded output parameters. Dimensions are fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    /// Zero lets the engine choose.
    pub bitrate: i32,
    /// Negative lets the engine choose.
    pub min_bitrate: i32,
}

impl OutputConfig {
    pub fn for_orientation(orientation: Orientation, frame_rate: u32) -> Self {
        let preset = orientation.preset();
        Self {
            width: preset.width,
            height: preset.height,
            frame_rate,
            bitrate: 0,
            min_bitrate: -1,
        }
    }
}

/// Complete configuration handed to a start or update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodingConfig {
    pub stream_count: usize,
    pub streams: Vec<LayerStream>,
    pub output: OutputConfig,
}

impl TranscodingConfig {
    pub fn new(sources: &[Source], output: OutputConfig) -> Self {
        let streams: Vec<LayerStream> = sources.iter().map(LayerStream::from).collect();
        Self {
            stream_count: streams.len(),
            streams,
            output,
        }
    }
}
