use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

/// Write a synthetic launch records file for trying the dashboard.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    #[arg(long, default_value_t = 56)]
    rows: usize,

    /// Defaults to `sample_launches.csv` / `sample_launches.parquet`.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One output row, serialized with the dashboard's column names.
#[derive(Debug, Serialize)]
struct SampleLaunch {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: &'static str,
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: &'static str,
}

const SITES: [&str; 4] = ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"];

/// Booster eras: (category, max payload kg, landing success rate).
const ERAS: [(&str, f64, f64); 5] = [
    ("v1.0", 1_000.0, 0.0),
    ("v1.1", 4_500.0, 0.15),
    ("FT", 9_600.0, 0.65),
    ("B4", 7_000.0, 0.55),
    ("B5", 9_600.0, 0.95),
];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<SampleLaunch> {
    (0..rows)
        .map(|i| {
            // Later flights use later boosters.
            let era = (i * ERAS.len() / rows.max(1)).min(ERAS.len() - 1);
            let (category, max_payload, success_rate) = ERAS[era];

            let payload = if rng.next_f64() < 0.05 {
                0.0
            } else {
                (rng.next_f64() * max_payload).round()
            };

            SampleLaunch {
                flight_number: i as i64 + 1,
                launch_site: *rng.pick(&SITES),
                class: i64::from(rng.next_f64() < success_rate),
                payload_mass: payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + i),
                booster_category: category,
            }
        })
        .collect()
}

fn write_csv(path: &Path, launches: &[SampleLaunch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for launch in launches {
        writer.serialize(launch).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, launches: &[SampleLaunch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(
                launches.iter().map(|l| l.flight_number),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.launch_site),
            )),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(
                launches.iter().map(|l| l.payload_mass),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_category),
            )),
        ],
    )
    .context("building record batch")?;

    print_batches(&[batch.slice(0, batch.num_rows().min(5))]).context("printing preview")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let launches = generate(args.rows, &mut rng);

    let output = args.output.unwrap_or_else(|| match args.format {
        Format::Csv => PathBuf::from("sample_launches.csv"),
        Format::Parquet => PathBuf::from("sample_launches.parquet"),
    });

    match args.format {
        Format::Csv => write_csv(&output, &launches)?,
        Format::Parquet => write_parquet(&output, &launches)?,
    }

    println!("Wrote {} launches to {}", launches.len(), output.display());
    Ok(())
}
