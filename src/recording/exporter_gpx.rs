//! GPX 1.1 export of recorded tracks.
//!
//! The document holds a single `<trk>` with a single `<trkseg>`; every
//! recorded point becomes a `<trkpt>` with elevation, UTC time and, when an
//! accelerometer sample was cached, a `<desc>` carrying the three axes.

use crate::recording::types::{ExportError, ExportOutcome, TrackPoint};
use crate::storage::config::ExportSettings;
use crate::storage::files::TrackStorage;
use chrono::{DateTime, Local};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::sync::Arc;

/// GPX 1.1 namespace
const NS_GPX: &str = "http://www.topografix.com/GPX/1/1";

/// Point time format (UTC, second precision)
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Timestamp format embedded in file names
const FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render points to a GPX document.
///
/// Pure: the same points always produce the same bytes.
pub fn render_gpx(points: &[TrackPoint], creator: &str, track_name: &str) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    // XML declaration
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    // Root element
    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", creator));
    root.push_attribute(("xmlns", NS_GPX));
    writer
        .write_event(Event::Start(root))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::Start(BytesStart::new("trk")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    write_element(&mut writer, "name", track_name)?;

    write_segment(&mut writer, points)?;

    writer
        .write_event(Event::End(BytesEnd::new("trk")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new("gpx")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).map_err(|e| ExportError::XmlError(e.to_string()))
}

/// Write the track segment with all points.
fn write_segment<W: std::io::Write>(
    writer: &mut Writer<W>,
    points: &[TrackPoint],
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new("trkseg")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    for point in points {
        write_trackpoint(writer, point)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("trkseg")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Write a single trackpoint.
fn write_trackpoint<W: std::io::Write>(
    writer: &mut Writer<W>,
    point: &TrackPoint,
) -> Result<(), ExportError> {
    let lat = point.latitude().to_string();
    let lon = point.longitude().to_string();

    let mut trkpt = BytesStart::new("trkpt");
    trkpt.push_attribute(("lat", lat.as_str()));
    trkpt.push_attribute(("lon", lon.as_str()));
    writer
        .write_event(Event::Start(trkpt))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    write_element(writer, "ele", &point.elevation().to_string())?;
    write_element(
        writer,
        "time",
        &point.timestamp().format(TIME_FORMAT).to_string(),
    )?;

    if let Some(accel) = point.accel() {
        let desc = format!("accel x:{} y:{} z:{}", accel.x(), accel.y(), accel.z());
        write_element(writer, "desc", &desc)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("trkpt")))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// Write a simple element with text content.
fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| ExportError::XmlError(e.to_string()))?;

    Ok(())
}

/// File name for an export taken at `exported_at`.
pub fn gpx_file_name(prefix: &str, exported_at: DateTime<Local>) -> String {
    format!("{}_{}.gpx", prefix, exported_at.format(FILE_TIME_FORMAT))
}

/// Serializes tracks and hands them to storage.
#[derive(Clone)]
pub struct GpxExporter {
    storage: Arc<dyn TrackStorage>,
    settings: ExportSettings,
}

impl std::fmt::Debug for GpxExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpxExporter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl GpxExporter {
    /// Create an exporter writing to `storage`.
    pub fn new(storage: Arc<dyn TrackStorage>, settings: ExportSettings) -> Self {
        Self { storage, settings }
    }

    /// Export `points` using the current local time for the file name.
    pub fn export(&self, points: &[TrackPoint]) -> Result<ExportOutcome, ExportError> {
        self.export_at(points, Local::now())
    }

    /// Export `points` with an explicit export time.
    pub fn export_at(
        &self,
        points: &[TrackPoint],
        exported_at: DateTime<Local>,
    ) -> Result<ExportOutcome, ExportError> {
        if points.is_empty() {
            tracing::info!("No points recorded, nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let content = render_gpx(points, &self.settings.creator, &self.settings.track_name)?;
        let file_name = gpx_file_name(&self.settings.file_prefix, exported_at);
        let path = self.storage.write(&file_name, &content)?;

        tracing::info!("Exported {} points to {}", points.len(), path.display());
        Ok(ExportOutcome::Written(path))
    }
}
