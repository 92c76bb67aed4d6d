use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{LaunchRecord, LaunchTable, Outcome};
use super::DataError;

// Source column names.
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_CLASS: &str = "class";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the fixed launch columns (extra columns ignored)
/// * `.json`    – `[{ "Launch Site": ..., "class": ..., ... }, ...]`
/// * `.parquet` – same column names, one row per launch
pub fn load_file(path: &Path) -> Result<LaunchTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            load_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} launches from {} ({} sites)",
        table.len(),
        path.display(),
        table.sites().len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row schema shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the delimited / JSON source.
/// Unknown columns (e.g. the unnamed pandas index) are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunch {
    #[serde(rename = "Flight Number", default)]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

impl TryFrom<RawLaunch> for LaunchRecord {
    type Error = DataError;

    fn try_from(raw: RawLaunch) -> Result<Self, Self::Error> {
        Ok(LaunchRecord {
            flight_number: raw.flight_number,
            launch_site: raw.launch_site,
            outcome: Outcome::from_class(raw.class)?,
            payload_mass: raw.payload_mass,
            booster_version: raw.booster_version,
            booster_category: raw.booster_category,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a comma-delimited launch table with a header row.
pub fn load_csv<R: Read>(input: R) -> Result<LaunchTable> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for required in [
        COL_LAUNCH_SITE,
        COL_CLASS,
        COL_PAYLOAD_MASS,
        COL_BOOSTER_CATEGORY,
    ] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawLaunch>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        let record =
            LaunchRecord::try_from(raw).with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(LaunchTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   {
///     "Flight Number": 1,
///     "Launch Site": "CCAFS LC-40",
///     "class": 0,
///     "Payload Mass (kg)": 0.0,
///     "Booster Version": "F9 v1.0  B0003",
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<LaunchTable> {
    let rows: Vec<RawLaunch> = serde_json::from_str(text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| LaunchRecord::try_from(raw).with_context(|| format!("JSON row {i}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(LaunchTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or polars.
///
/// Integer columns may be Int32 or Int64, payload may be any numeric type,
/// text columns Utf8 or LargeUtf8. `Flight Number` and `Booster Version`
/// are optional.
pub fn load_parquet(path: &Path) -> Result<LaunchTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(records_from_batch(&batch).with_context(|| {
            format!("parquet rows starting at {offset}")
        })?);
    }

    Ok(LaunchTable::from_records(records))
}

/// Convert one Arrow record batch into launch records.
pub fn records_from_batch(batch: &RecordBatch) -> Result<Vec<LaunchRecord>> {
    let site_col = column(batch, COL_LAUNCH_SITE)?;
    let class_col = column(batch, COL_CLASS)?;
    let payload_col = column(batch, COL_PAYLOAD_MASS)?;
    let category_col = column(batch, COL_BOOSTER_CATEGORY)?;
    let flight_col = column(batch, COL_FLIGHT_NUMBER).ok();
    let version_col = column(batch, COL_BOOSTER_VERSION).ok();

    (0..batch.num_rows())
        .map(|row| {
            let record = LaunchRecord {
                flight_number: match flight_col {
                    Some(col) => int_at(col, row, COL_FLIGHT_NUMBER)?,
                    None => 0,
                },
                launch_site: string_at(site_col, row, COL_LAUNCH_SITE)?,
                outcome: Outcome::from_class(int_at(class_col, row, COL_CLASS)?)?,
                payload_mass: float_at(payload_col, row, COL_PAYLOAD_MASS)?,
                booster_version: match version_col {
                    Some(col) => string_at(col, row, COL_BOOSTER_VERSION)?,
                    None => String::new(),
                },
                booster_category: string_at(category_col, row, COL_BOOSTER_CATEGORY)?,
            };
            Ok::<_, DataError>(record)
        })
        .collect::<Result<Vec<_>, DataError>>()
        .map_err(Into::into)
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef, DataError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn downcast<'a, T: 'static>(
    col: &'a ArrayRef,
    name: &'static str,
    expected: &'static str,
) -> Result<&'a T, DataError> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| type_error(col, name, expected))
}

fn type_error(col: &ArrayRef, name: &'static str, expected: &'static str) -> DataError {
    DataError::ColumnType {
        column: name,
        found: format!("{:?}", col.data_type()),
        expected,
    }
}

fn int_at(col: &ArrayRef, row: usize, name: &'static str) -> Result<i64, DataError> {
    const EXPECTED: &str = "an integer";
    if col.is_null(row) {
        return Err(DataError::NullValue(name));
    }
    match col.data_type() {
        DataType::Int64 => Ok(downcast::<Int64Array>(col, name, EXPECTED)?.value(row)),
        DataType::Int32 => Ok(i64::from(
            downcast::<Int32Array>(col, name, EXPECTED)?.value(row),
        )),
        _ => Err(type_error(col, name, EXPECTED)),
    }
}

fn float_at(col: &ArrayRef, row: usize, name: &'static str) -> Result<f64, DataError> {
    const EXPECTED: &str = "a number";
    if col.is_null(row) {
        return Err(DataError::NullValue(name));
    }
    match col.data_type() {
        DataType::Float64 => Ok(downcast::<Float64Array>(col, name, EXPECTED)?.value(row)),
        DataType::Float32 => Ok(f64::from(
            downcast::<Float32Array>(col, name, EXPECTED)?.value(row),
        )),
        DataType::Int64 | DataType::Int32 => int_at(col, row, name).map(|v| v as f64),
        _ => Err(type_error(col, name, EXPECTED)),
    }
}

fn string_at(col: &ArrayRef, row: usize, name: &'static str) -> Result<String, DataError> {
    const EXPECTED: &str = "a string";
    if col.is_null(row) {
        return Err(DataError::NullValue(name));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(downcast::<StringArray>(col, name, EXPECTED)?
            .value(row)
            .to_string()),
        DataType::LargeUtf8 => Ok(downcast::<LargeStringArray>(col, name, EXPECTED)?
            .value(row)
            .to_string()),
        _ => Err(type_error(col, name, EXPECTED)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const CSV: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,6,VAFB SLC-4E,0,500.0,F9 v1.1  B1003,v1.1
4,19,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
5,42,CCAFS SLC-40,1,5384.0,F9 B4 B1043.1,B4
";

    #[test]
    fn csv_parses_fixed_schema() {
        let table = load_csv(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 6);

        let rec = &table.records()[4];
        assert_eq!(rec.flight_number, 19);
        assert_eq!(rec.launch_site, "KSC LC-39A");
        assert_eq!(rec.outcome, Outcome::Success);
        assert_eq!(rec.payload_mass, 2490.0);
        assert_eq!(rec.booster_version, "F9 FT B1031.1");
        assert_eq!(rec.booster_category, "FT");

        let bounds = table.payload_bounds().unwrap();
        assert_eq!((bounds.min, bounds.max), (0.0, 5384.0));
        assert_eq!(table.sites().len(), 4);
    }

    #[test]
    fn csv_rejects_invalid_class() {
        let input = "\
Launch Site,class,Payload Mass (kg),Booster Version Category
KSC LC-39A,2,2490.0,FT
";
        let err = load_csv(input.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("class must be 0 or 1, got 2"));
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn csv_reports_missing_column() {
        let input = "Launch Site,class\nKSC LC-39A,1\n";
        let err = load_csv(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn(COL_PAYLOAD_MASS))
        ));
    }

    #[test]
    fn csv_reports_malformed_number() {
        let input = "\
Launch Site,class,Payload Mass (kg),Booster Version Category
KSC LC-39A,1,heavy,FT
";
        let err = load_csv(input.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn json_records_orientation() {
        let text = r#"[
            {"Flight Number": 1, "Launch Site": "CCAFS LC-40", "class": 0,
             "Payload Mass (kg)": 0.0, "Booster Version": "F9 v1.0  B0003",
             "Booster Version Category": "v1.0"},
            {"Launch Site": "VAFB SLC-4E", "class": 1,
             "Payload Mass (kg)": 9600, "Booster Version Category": "FT"}
        ]"#;
        let table = load_json(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].flight_number, 0);
        assert_eq!(table.records()[1].payload_mass, 9600.0);
        assert!(table.records()[1].booster_version.is_empty());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("launches.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn arrow_batch_with_mixed_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int32, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::LargeUtf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["KSC LC-39A", "VAFB SLC-4E"])),
                Arc::new(Int32Array::from(vec![1, 0])),
                Arc::new(Int64Array::from(vec![5300, 500])),
                Arc::new(LargeStringArray::from(vec!["FT", "v1.1"])),
            ],
        )
        .unwrap();

        let records = records_from_batch(&batch).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].outcome, Outcome::Success);
        assert_eq!(records[0].payload_mass, 5300.0);
        assert_eq!(records[1].booster_category, "v1.1");
        assert_eq!(records[1].flight_number, 0);
    }

    #[test]
    fn arrow_batch_wrong_column_type() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["KSC LC-39A"])),
                Arc::new(StringArray::from(vec!["yes"])),
                Arc::new(Float64Array::from(vec![5300.0])),
                Arc::new(StringArray::from(vec!["FT"])),
            ],
        )
        .unwrap();

        let err = records_from_batch(&batch).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::ColumnType { column: COL_CLASS, .. })
        ));
    }

    #[test]
    fn load_file_reads_csv_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launches.csv");
        std::fs::write(&path, CSV).unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.records()[5].booster_category, "B4");
        assert_eq!(table.payload_bounds().unwrap().max, 5384.0);
    }

    #[test]
    fn load_file_reads_json_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launches.JSON");
        std::fs::write(
            &path,
            r#"[{"Launch Site": "KSC LC-39A", "class": 1,
                 "Payload Mass (kg)": 2490.0, "Booster Version Category": "FT"}]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn load_file_reads_parquet_from_disk() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_FLIGHT_NUMBER, DataType::Int64, false),
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_VERSION, DataType::Utf8, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 42, 56])),
                Arc::new(StringArray::from(vec![
                    "CCAFS LC-40",
                    "CCAFS SLC-40",
                    "KSC LC-39A",
                ])),
                Arc::new(Int64Array::from(vec![0, 1, 1])),
                Arc::new(Float64Array::from(vec![0.0, 5384.0, 9600.0])),
                Arc::new(StringArray::from(vec![
                    "F9 v1.0  B0003",
                    "F9 B4 B1043.1",
                    "F9 B5 B1060.1",
                ])),
                Arc::new(StringArray::from(vec!["v1.0", "B4", "B5"])),
            ],
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launches.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        let rec = &table.records()[2];
        assert_eq!(rec.flight_number, 56);
        assert_eq!(rec.launch_site, "KSC LC-39A");
        assert_eq!(rec.outcome, Outcome::Success);
        assert_eq!(rec.payload_mass, 9600.0);
        assert_eq!(rec.booster_version, "F9 B5 B1060.1");
        assert_eq!(table.sites().len(), 3);
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("opening"));
    }
}
