use model::ElevationSeries;

use crate::{ProfileError, ProfileResult};

pub const CSV_HEADER: [&str; 4] = ["Index", "Lat", "Long", "Elevation"];
pub const CSV_FILE_NAME: &str = "elevation.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Writes one row per sample, in series order, below the
/// `Index,Lat,Long,Elevation` header.
///
/// Numbers use Rust's shortest round-trip formatting, so `10.0` is written
/// as `10` and the output does not depend on the locale.
pub fn to_csv(series: &ElevationSeries) -> ProfileResult<String> {
    if series.is_empty() {
        return Err(ProfileError::EmptySeries);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;
    for (index, sample) in series.samples().iter().enumerate() {
        writer.write_record([
            index.to_string(),
            sample.location.lat().to_string(),
            sample.location.lng().to_string(),
            sample.elevation.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|why| ProfileError::Export(why.to_string()))?;
    String::from_utf8(bytes).map_err(|why| ProfileError::Export(why.to_string()))
}
