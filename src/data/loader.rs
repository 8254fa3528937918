use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    MetadataRecord, MetadataValue, PlateBoundaries, PlateLine, QuakeCollection, QuakeFeature,
    Sample, SampleId, SamplesDataset,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A document opened from disk, classified by content.
#[derive(Debug, Clone)]
pub enum LoadedFile {
    Samples(SamplesDataset),
    Earthquakes(QuakeCollection),
    Plates(PlateBoundaries),
}

/// Load a dataset from a local file.  Dispatch by extension, then by
/// content for JSON.
///
/// Supported formats:
/// * `.json` / `.geojson` – a samples document, an earthquake
///   `FeatureCollection` of points, or a plate boundary `FeatureCollection`
/// * `.csv`               – the USGS earthquake CSV feed
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    match ext.as_str() {
        "json" | "geojson" => classify_json(&bytes),
        "csv" => parse_earthquakes_csv(&bytes).map(LoadedFile::Earthquakes),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn classify_json(bytes: &[u8]) -> Result<LoadedFile> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;

    if root.get("samples").is_some() {
        return samples_from_value(root).map(LoadedFile::Samples);
    }
    if root.get("type").and_then(|t| t.as_str()) == Some("FeatureCollection") {
        let first_geometry = root
            .get("features")
            .and_then(|f| f.as_array())
            .and_then(|features| {
                features
                    .iter()
                    .find_map(|f| f.pointer("/geometry/type").and_then(|t| t.as_str()))
            });
        return match first_geometry {
            Some("Point") => earthquakes_from_value(root).map(LoadedFile::Earthquakes),
            Some(_) => plates_from_value(root).map(LoadedFile::Plates),
            None => bail!("FeatureCollection has no geometries"),
        };
    }
    bail!("Unrecognised JSON document: expected a samples document or a GeoJSON FeatureCollection")
}

// ---------------------------------------------------------------------------
// Samples document
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "names": ["940", "941"],
///   "metadata": [{ "id": 940, "ethnicity": "Caucasian", "age": 24.0 }],
///   "samples": [{
///     "id": "940",
///     "otu_ids": [1167, 2859],
///     "otu_labels": ["Bacteria;Bacteroidetes", "Bacteria;Firmicutes"],
///     "sample_values": [163, 126]
///   }]
/// }
/// ```
pub fn parse_samples(bytes: &[u8]) -> Result<SamplesDataset> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing samples JSON")?;
    samples_from_value(root)
}

#[derive(Deserialize)]
struct RawSamplesDocument {
    #[serde(default)]
    names: Vec<SampleId>,
    #[serde(default)]
    metadata: Vec<Map<String, JsonValue>>,
    samples: Vec<Sample>,
}

fn samples_from_value(root: JsonValue) -> Result<SamplesDataset> {
    let raw: RawSamplesDocument =
        serde_json::from_value(root).context("samples document does not match the schema")?;

    for (i, sample) in raw.samples.iter().enumerate() {
        if !sample.is_aligned() {
            bail!(
                "Sample {i} (id {}): otu_ids has {} values, otu_labels {}, sample_values {}",
                sample.id,
                sample.otu_ids.len(),
                sample.otu_labels.len(),
                sample.sample_values.len()
            );
        }
    }

    let metadata = raw
        .metadata
        .into_iter()
        .enumerate()
        .map(|(i, obj)| metadata_record(i, obj))
        .collect::<Result<Vec<_>>>()?;

    Ok(SamplesDataset {
        names: raw.names,
        metadata,
        samples: raw.samples,
    })
}

fn metadata_record(row: usize, obj: Map<String, JsonValue>) -> Result<MetadataRecord> {
    let id_value = obj
        .get("id")
        .with_context(|| format!("Metadata row {row}: missing 'id'"))?;
    let id: SampleId = serde_json::from_value(id_value.clone())
        .with_context(|| format!("Metadata row {row}: 'id' is not a string or number"))?;

    let fields = obj
        .iter()
        .map(|(key, val)| (key.clone(), MetadataValue::from(val)))
        .collect();

    Ok(MetadataRecord { id, fields })
}

// ---------------------------------------------------------------------------
// Earthquakes: GeoJSON
// ---------------------------------------------------------------------------

/// Parse an earthquake feed, GeoJSON or CSV, by looking at the first
/// non-blank byte.
pub fn parse_earthquakes(bytes: &[u8]) -> Result<QuakeCollection> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => {
            let root: JsonValue =
                serde_json::from_slice(bytes).context("parsing earthquake GeoJSON")?;
            earthquakes_from_value(root)
        }
        Some(_) => parse_earthquakes_csv(bytes),
        None => bail!("Earthquake feed is empty"),
    }
}

#[derive(Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    metadata: Option<RawCollectionMetadata>,
    features: Vec<RawQuakeFeature>,
}

#[derive(Deserialize)]
struct RawCollectionMetadata {
    title: Option<String>,
}

#[derive(Deserialize)]
struct RawQuakeFeature {
    geometry: Option<RawPointGeometry>,
    #[serde(default)]
    properties: RawQuakeProperties,
}

#[derive(Deserialize)]
struct RawPointGeometry {
    coordinates: Vec<f64>,
}

#[derive(Deserialize, Default)]
struct RawQuakeProperties {
    mag: Option<f64>,
    place: Option<String>,
}

fn earthquakes_from_value(root: JsonValue) -> Result<QuakeCollection> {
    let raw: RawFeatureCollection =
        serde_json::from_value(root).context("earthquake FeatureCollection does not match the schema")?;

    let mut features = Vec::with_capacity(raw.features.len());
    for (i, feature) in raw.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            log::warn!("Earthquake feature {i} has no geometry, skipping");
            continue;
        };
        let [longitude, latitude, depth] = match geometry.coordinates[..] {
            [lon, lat, depth, ..] => [lon, lat, depth],
            _ => {
                log::warn!(
                    "Earthquake feature {i}: expected [lon, lat, depth], got {} coordinates, skipping",
                    geometry.coordinates.len()
                );
                continue;
            }
        };
        features.push(QuakeFeature {
            longitude,
            latitude,
            depth,
            magnitude: feature.properties.mag,
            place: feature.properties.place,
        });
    }

    Ok(QuakeCollection {
        title: raw.metadata.and_then(|m| m.title),
        features,
    })
}

// ---------------------------------------------------------------------------
// Earthquakes: USGS CSV feed
// ---------------------------------------------------------------------------

/// CSV layout of the USGS summary feeds (`all_week.csv`): a header row with
/// at least `latitude`, `longitude`, `depth`, `mag` and `place`; other
/// columns are ignored.
#[derive(Deserialize)]
struct CsvQuakeRow {
    latitude: f64,
    longitude: f64,
    depth: f64,
    mag: Option<f64>,
    place: Option<String>,
}

pub fn parse_earthquakes_csv(bytes: &[u8]) -> Result<QuakeCollection> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut features = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvQuakeRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        features.push(QuakeFeature {
            longitude: row.longitude,
            latitude: row.latitude,
            depth: row.depth,
            magnitude: row.mag,
            place: row.place.filter(|p| !p.is_empty()),
        });
    }

    Ok(QuakeCollection {
        title: None,
        features,
    })
}

// ---------------------------------------------------------------------------
// Tectonic plate boundaries
// ---------------------------------------------------------------------------

/// Parse a plate boundary GeoJSON document. The document itself is kept
/// as-is; `LineString`, `MultiLineString` and `Polygon` geometries become
/// drawable lines, anything else is ignored.
pub fn parse_plates(bytes: &[u8]) -> Result<PlateBoundaries> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing plate GeoJSON")?;
    plates_from_value(root)
}

fn plates_from_value(root: JsonValue) -> Result<PlateBoundaries> {
    let features = root
        .get("features")
        .and_then(|f| f.as_array())
        .context("Plate document has no 'features' array")?;

    let mut lines = Vec::new();
    for (i, feature) in features.iter().enumerate() {
        let name = feature
            .pointer("/properties/Name")
            .and_then(|n| n.as_str())
            .map(str::to_string);
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        let kind = geometry.get("type").and_then(|t| t.as_str()).unwrap_or("");
        let coords = geometry.get("coordinates");

        let rings: Vec<Vec<[f64; 2]>> = match kind {
            "LineString" => vec![positions(coords, i)?],
            "MultiLineString" | "Polygon" => coords
                .and_then(|c| c.as_array())
                .map(|parts| {
                    parts
                        .iter()
                        .map(|part| positions(Some(part), i))
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default(),
            _ => continue,
        };

        for ring in rings {
            for points in split_at_antimeridian(&ring) {
                lines.push(PlateLine {
                    name: name.clone(),
                    points,
                });
            }
        }
    }

    Ok(PlateBoundaries { raw: root, lines })
}

fn positions(coords: Option<&JsonValue>, feature: usize) -> Result<Vec<[f64; 2]>> {
    let arr = coords
        .and_then(|c| c.as_array())
        .with_context(|| format!("Plate feature {feature}: missing coordinates"))?;

    arr.iter()
        .enumerate()
        .map(|(j, pos)| {
            let lon = pos.get(0).and_then(|v| v.as_f64());
            let lat = pos.get(1).and_then(|v| v.as_f64());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok([lon, lat]),
                _ => bail!("Plate feature {feature}, position {j}: not a [lon, lat] pair"),
            }
        })
        .collect()
}

/// Break a polyline wherever it jumps more than 180° in longitude, so lines
/// crossing the date line are not drawn across the whole map.
pub fn split_at_antimeridian(points: &[[f64; 2]]) -> Vec<Vec<[f64; 2]>> {
    let mut parts: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();

    for &point in points {
        if let Some(prev) = current.last() {
            if (point[0] - prev[0]).abs() > 180.0 {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts.retain(|p| p.len() > 1);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLES_JSON: &str = r#"{
        "names": ["940", "941"],
        "metadata": [
            {"id": 940, "ethnicity": "Caucasian", "gender": "F", "age": 24.0,
             "location": "Beaufort/NC", "bbtype": "I", "wfreq": 2.0},
            {"id": 941, "ethnicity": "Caucasian/Midleastern", "gender": "F", "age": 34.0,
             "location": "Chicago/IL", "bbtype": "I", "wfreq": null}
        ],
        "samples": [
            {"id": "940", "otu_ids": [1167, 2859, 482],
             "otu_labels": ["Bacteria;Bacteroidetes", "Bacteria;Firmicutes", "Bacteria"],
             "sample_values": [163, 126, 113]},
            {"id": "941", "otu_ids": [2722],
             "otu_labels": ["Bacteria;Firmicutes;Clostridia"],
             "sample_values": [103]}
        ]
    }"#;

    const QUAKES_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Week"},
        "features": [
            {"type": "Feature",
             "properties": {"mag": 1.3, "place": "7 km NW of The Geysers, CA",
                            "time": 1700000000000, "url": "https://earthquake.usgs.gov/x"},
             "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.1]}},
            {"type": "Feature",
             "properties": {"mag": null, "place": "Fiji region"},
             "geometry": {"type": "Point", "coordinates": [178.2, -17.9, 560.0]}}
        ]
    }"#;

    const QUAKES_CSV: &str = "\
time,latitude,longitude,depth,mag,magType,place,type
2024-01-01T00:00:00.000Z,38.8,-122.8,2.1,1.3,md,\"7 km NW of The Geysers, CA\",earthquake
2024-01-01T01:00:00.000Z,-17.9,178.2,560,,mb,Fiji region,earthquake
";

    #[test]
    fn test_parse_samples() {
        let ds = parse_samples(SAMPLES_JSON.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.names, vec![SampleId::from(940), SampleId::from(941)]);
        assert_eq!(ds.metadata[0].id, SampleId::from("940"));
        assert_eq!(ds.samples[0].sample_values, vec![163.0, 126.0, 113.0]);
        assert_eq!(ds.metadata[1].get("wfreq"), Some(&MetadataValue::Null));
    }

    #[test]
    fn test_metadata_keeps_document_order() {
        let ds = parse_samples(SAMPLES_JSON.as_bytes()).unwrap();
        let keys: Vec<&str> = ds.metadata[0].fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["id", "ethnicity", "gender", "age", "location", "bbtype", "wfreq"]
        );
        assert_eq!(ds.metadata[0].lines()[3], "age: 24");
    }

    #[test]
    fn test_parse_samples_rejects_misaligned_sample() {
        let doc = r#"{"names": ["1"], "metadata": [],
            "samples": [{"id": "1", "otu_ids": [1, 2], "otu_labels": ["a"], "sample_values": [2, 1]}]}"#;
        let err = parse_samples(doc.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("otu_labels 1"));
    }

    #[test]
    fn test_parse_samples_metadata_without_id() {
        let doc = r#"{"names": [], "metadata": [{"age": 3}], "samples": []}"#;
        let err = parse_samples(doc.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("missing 'id'"));
    }

    #[test]
    fn test_parse_earthquakes_geojson() {
        let quakes = parse_earthquakes(QUAKES_GEOJSON.as_bytes()).unwrap();
        assert_eq!(quakes.title.as_deref(), Some("USGS All Earthquakes, Past Week"));
        assert_eq!(quakes.len(), 2);
        assert_eq!(quakes.features[0].depth, 2.1);
        assert_eq!(quakes.features[1].magnitude, None);
        assert_eq!(quakes.max_magnitude(), Some(1.3));
    }

    #[test]
    fn test_csv_and_geojson_agree() {
        let from_json = parse_earthquakes(QUAKES_GEOJSON.as_bytes()).unwrap();
        let from_csv = parse_earthquakes(QUAKES_CSV.as_bytes()).unwrap();
        assert_eq!(from_json.len(), from_csv.len());
        for (a, b) in from_json.features.iter().zip(&from_csv.features) {
            assert_eq!((a.longitude, a.latitude, a.depth), (b.longitude, b.latitude, b.depth));
            assert_eq!(a.magnitude, b.magnitude);
            assert_eq!(a.place, b.place);
        }
    }

    #[test]
    fn test_malformed_earthquakes_are_skipped() {
        let doc = r#"{"type": "FeatureCollection", "features": [
            {"properties": {"mag": 1.0}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"properties": {"mag": 2.0}, "geometry": null},
            {"properties": {"mag": 3.0}, "geometry": {"type": "Point", "coordinates": [5.0, 6.0, 7.0]}}]}"#;
        let quakes = parse_earthquakes(doc.as_bytes()).unwrap();
        assert_eq!(quakes.len(), 1);
        assert_eq!(quakes.features[0].magnitude, Some(3.0));
        assert_eq!(quakes.features[0].depth, 7.0);
    }

    #[test]
    fn test_parse_plates() {
        let doc = r#"{"type": "FeatureCollection", "features": [
            {"properties": {"Name": "AF-AN"},
             "geometry": {"type": "LineString", "coordinates": [[-0.4, -54.8], [0.0, -54.6]]}},
            {"properties": {"Name": "PA-AU"},
             "geometry": {"type": "LineString",
                          "coordinates": [[179.0, -20.0], [180.0, -21.0], [-179.5, -22.0], [-179.0, -23.0]]}}
        ]}"#;
        let plates = parse_plates(doc.as_bytes()).unwrap();
        assert_eq!(plates.lines.len(), 3);
        assert_eq!(plates.lines[0].name.as_deref(), Some("AF-AN"));
        assert_eq!(plates.raw["features"].as_array().map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_split_at_antimeridian() {
        let parts = split_at_antimeridian(&[[170.0, 0.0], [179.0, 1.0], [-179.0, 2.0], [-170.0, 3.0]]);
        assert_eq!(parts, vec![vec![[170.0, 0.0], [179.0, 1.0]], vec![[-179.0, 2.0], [-170.0, 3.0]]]);
        assert!(split_at_antimeridian(&[[0.0, 0.0]]).is_empty());
    }

    #[test]
    fn test_load_file_classifies_by_content() {
        let dir = tempfile::tempdir().unwrap();

        let samples_path = dir.path().join("samples.json");
        std::fs::File::create(&samples_path)
            .unwrap()
            .write_all(SAMPLES_JSON.as_bytes())
            .unwrap();
        assert!(matches!(load_file(&samples_path).unwrap(), LoadedFile::Samples(_)));

        let quakes_path = dir.path().join("all_week.geojson");
        std::fs::write(&quakes_path, QUAKES_GEOJSON).unwrap();
        assert!(matches!(load_file(&quakes_path).unwrap(), LoadedFile::Earthquakes(_)));

        let csv_path = dir.path().join("all_week.csv");
        std::fs::write(&csv_path, QUAKES_CSV).unwrap();
        assert!(matches!(load_file(&csv_path).unwrap(), LoadedFile::Earthquakes(_)));

        let txt_path = dir.path().join("notes.txt");
        std::fs::write(&txt_path, "hello").unwrap();
        assert!(load_file(&txt_path).is_err());
    }
}
