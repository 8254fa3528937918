use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Value, json};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const TAXA: [&str; 6] = [
    "Bacteria",
    "Bacteria;Actinobacteria;Actinobacteria;Actinomycetales",
    "Bacteria;Bacteroidetes;Bacteroidia;Bacteroidales;Porphyromonadaceae;Porphyromonas",
    "Bacteria;Firmicutes;Clostridia;Clostridiales;IncertaeSedis XI;Anaerococcus",
    "Bacteria;Firmicutes;Bacilli;Lactobacillales;Streptococcaceae;Streptococcus",
    "Bacteria;Proteobacteria;Gammaproteobacteria;Pseudomonadales",
];

/// Samples document: every subject's readings sorted by value, largest
/// first, with metadata ids as numbers and sample ids as strings.
fn samples_document(rng: &mut SimpleRng) -> Value {
    let ethnicities = ["Caucasian", "Asian", "European", "Caucasian/Midleastern", "Unspecified"];
    let locations = ["Beaufort/NC", "Chicago/IL", "Raleigh/NC", "Durham/NC", "Omaha/NE"];

    let mut names = Vec::new();
    let mut metadata = Vec::new();
    let mut samples = Vec::new();

    for subject in 940..970i64 {
        let n_otus = 3 + (rng.next_u64() % 60) as usize;
        let mut readings: Vec<(i64, String, i64)> = (0..n_otus)
            .map(|_| {
                let otu = 1 + (rng.next_u64() % 3600) as i64;
                let label = rng.pick(&TAXA).to_string();
                let value = 1 + (rng.next_f64().powi(3) * 220.0) as i64;
                (otu, label, value)
            })
            .collect();
        readings.sort_by(|a, b| b.2.cmp(&a.2));

        names.push(json!(subject.to_string()));
        let wfreq = if rng.next_f64() < 0.1 {
            Value::Null
        } else {
            json!((rng.next_u64() % 10) as f64)
        };
        metadata.push(json!({
            "id": subject,
            "ethnicity": rng.pick(&ethnicities),
            "gender": if rng.next_f64() < 0.5 { "F" } else { "M" },
            "age": (18 + rng.next_u64() % 60) as f64,
            "location": rng.pick(&locations),
            "bbtype": if rng.next_f64() < 0.8 { "I" } else { "O" },
            "wfreq": wfreq,
        }));
        samples.push(json!({
            "id": subject.to_string(),
            "otu_ids": readings.iter().map(|r| r.0).collect::<Vec<_>>(),
            "otu_labels": readings.iter().map(|r| r.1.clone()).collect::<Vec<_>>(),
            "sample_values": readings.iter().map(|r| r.2).collect::<Vec<_>>(),
        }));
    }

    json!({ "names": names, "metadata": metadata, "samples": samples })
}

/// Earthquake FeatureCollection shaped like the USGS weekly summary feed.
fn earthquakes_document(rng: &mut SimpleRng) -> Value {
    // (lon, lat, spread, typical depth)
    let regions = [
        (-118.0, 35.5, 3.0, 8.0, "CA"),
        (-152.0, 60.0, 5.0, 60.0, "Alaska"),
        (142.0, 38.0, 4.0, 40.0, "Japan"),
        (178.0, -18.0, 3.0, 450.0, "Fiji"),
        (-71.0, -30.0, 4.0, 110.0, "Chile"),
    ];

    let features: Vec<Value> = (0..400)
        .map(|i| {
            let (lon, lat, spread, depth, region) = *rng.pick(&regions);
            let magnitude = if i % 97 == 0 {
                Value::Null
            } else {
                json!((rng.range(-0.5, 6.5) * 10.0).round() / 10.0)
            };
            json!({
                "type": "Feature",
                "properties": {
                    "mag": magnitude,
                    "place": format!("{} km of {region}", (rng.range(1.0, 80.0)) as i64),
                    "time": 1_700_000_000_000i64 + i * 1_512_000,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [
                        lon + rng.range(-spread, spread),
                        lat + rng.range(-spread, spread),
                        (depth * rng.range(0.2, 1.8) - 2.0).max(-3.0),
                    ],
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "metadata": { "title": "Generated Earthquakes, Past Week" },
        "features": features,
    })
}

/// A few plate boundaries, one of them crossing the date line.
fn plates_document() -> Value {
    let boundary = |name: &str, coords: Vec<[f64; 2]>| {
        json!({
            "type": "Feature",
            "properties": { "Name": name },
            "geometry": { "type": "LineString", "coordinates": coords },
        })
    };
    json!({
        "type": "FeatureCollection",
        "features": [
            boundary("PA-NA", vec![[-124.5, 40.3], [-121.0, 36.5], [-116.0, 32.5], [-114.5, 30.0]]),
            boundary("PA-AU", vec![[170.0, -15.0], [176.0, -18.0], [179.9, -20.0], [-179.8, -22.0], [-176.0, -25.0]]),
            boundary("NA-EU", vec![[-30.0, 60.0], [-28.0, 50.0], [-30.0, 40.0]]),
        ],
    })
}

fn write_json(path: &PathBuf, doc: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sample_data".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let samples_path = out_dir.join("samples.json");
    write_json(&samples_path, &samples_document(&mut rng))?;

    let quakes_path = out_dir.join("earthquakes.geojson");
    write_json(&quakes_path, &earthquakes_document(&mut rng))?;

    let plates_path = out_dir.join("plates.json");
    write_json(&plates_path, &plates_document())?;

    println!(
        "Wrote {}, {} and {}\nRun with RUSTY_ATLAS_SAMPLES_URL={} RUSTY_ATLAS_EARTHQUAKES_URL={} RUSTY_ATLAS_PLATES_URL={}",
        samples_path.display(),
        quakes_path.display(),
        plates_path.display(),
        samples_path.display(),
        quakes_path.display(),
        plates_path.display(),
    );
    Ok(())
}
