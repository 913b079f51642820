//! Batch rectification of a still frame driven by a JSON config.

use crate::frame::{load_frame, save_image, FrameError};
use advision_banner::{rectify_batch, BannerIoError, RectifiedEntry, RectifyConfig, RectifyReport};
use std::fs;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Banner(#[from] BannerIoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load the config at `config_path`, rectify every observation, save the
/// rectified PNGs and the JSON report. Paths in the config resolve against
/// the config file's directory.
///
/// Failed observations are recorded in the report; only I/O problems abort.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn run_rectify_config(config_path: &Path) -> Result<RectifyReport, BatchError> {
    let cfg = RectifyConfig::load_json(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    run_rectify(&cfg, config_path, base)
}

/// Same as [`run_rectify_config`] for an already loaded config.
pub fn run_rectify(
    cfg: &RectifyConfig,
    config_path: &Path,
    base: &Path,
) -> Result<RectifyReport, BatchError> {
    let frame = load_frame(cfg.image_path(base))?;
    log::info!(
        "loaded {}x{} frame with {} observations",
        frame.width,
        frame.height,
        cfg.observations.len()
    );

    let out_dir = cfg.output_dir(base);
    fs::create_dir_all(&out_dir)?;

    let size = frame.size();
    let results = rectify_batch(&frame.view(), &cfg.observations, &cfg.rectify);
    let mut report = RectifyReport::new(cfg, config_path, frame.width, frame.height);

    for (index, (obs, res)) in cfg.observations.iter().zip(results).enumerate() {
        let (region, _) = obs.to_pixel(size);
        let entry = match res {
            Ok(rectified) => {
                let path = out_dir.join(format!("rectified_{index:02}.png"));
                save_image(&rectified.image, &path)?;
                RectifiedEntry::ok(
                    index,
                    region,
                    rectified.image.width,
                    rectified.image.height,
                    &path,
                )
            }
            Err(err) => RectifiedEntry::failed(index, region, &err),
        };
        report.entries.push(entry);
    }

    let report_path = cfg.report_path(base);
    report.write_json(&report_path)?;
    log::info!(
        "{} of {} observations rectified, report at {}",
        report.succeeded(),
        report.entries.len(),
        report_path.display()
    );
    Ok(report)
}
