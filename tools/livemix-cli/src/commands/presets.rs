//! Show output canvas presets.

use livemix_platform_core::Orientation;
use livemix_source_model::{preview_mask_size, Zoom};

pub fn run() -> anyhow::Result<()> {
    println!("Output presets:");
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let preset = orientation.preset();
        println!("  {:?}: {}x{}", orientation, preset.width, preset.height);
        for zoom in [0.5, 1.0, 1.5] {
            let (w, h) = preview_mask_size(preset.width, preset.height, Zoom::new(zoom)?);
            println!("    preview at {zoom}x: {w}x{h}");
        }
    }
    Ok(())
}
