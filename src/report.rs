use std::error::Error;

use photobooth::PhotoboothError;

pub fn report_error(err: &PhotoboothError) {
    eprintln!("{err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }

    match err.root() {
        PhotoboothError::UnknownFrame { .. } => {
            eprintln!();
            eprintln!("Run `photobooth frames` to list the frames in the layout catalog,");
            eprintln!("or point --catalog (PHOTOBOOTH_CATALOG) at another catalog file.");
        }
        PhotoboothError::FrameAssetNotFound { .. } => {
            eprintln!();
            eprintln!("Check --frame-dir (PHOTOBOOTH_FRAME_DIR); templates are named `frame-<id>.png`.");
        }
        PhotoboothError::InvalidGeometry(_) | PhotoboothError::DimensionMismatch { .. } => {
            eprintln!();
            eprintln!("The frame's catalog entry does not fit its template; check the layout catalog.");
        }
        _ => {}
    }
}
