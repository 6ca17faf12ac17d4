//! CSV reading and writing of intersection tables.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result, bail, ensure};
use countysplit::IntersectionPopulations;
use polars::{
    frame::DataFrame,
    io::{SerReader, SerWriter},
    prelude::{Column, CsvReadOptions, CsvWriter, DataType, Field, NamedFrom, Schema},
    series::Series,
};

use crate::cli::ColumnArgs;

pub(crate) type Intersections = IntersectionPopulations<String, String>;

/// Reads an intersection table from `path`.
/// County and district columns are forced to strings to preserve leading zeros.
pub(crate) fn read_intersections(path: &Path, columns: &ColumnArgs) -> Result<Intersections> {
    let schema = Arc::new(Schema::from_iter([
        Field::new(columns.county_column.as_str().into(), DataType::String),
        Field::new(columns.district_column.as_str().into(), DataType::String),
    ]));

    let file = File::open(path)
        .with_context(|| format!("[io] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(schema))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io] Failed to read CSV from {:?}", path))?;

    intersections_from_frame(&df, columns)
        .with_context(|| format!("[io] Invalid intersection table {:?}", path))
}

/// Convert a DataFrame of (county, district, population) rows into a mapping.
/// Repeated pairs are summed.
pub(crate) fn intersections_from_frame(df: &DataFrame, columns: &ColumnArgs) -> Result<Intersections> {
    let counties = df.column(&columns.county_column)
        .with_context(|| format!("[io] Missing county column '{}'", columns.county_column))?
        .cast(&DataType::String)?;
    let districts = df.column(&columns.district_column)
        .with_context(|| format!("[io] Missing district column '{}'", columns.district_column))?
        .cast(&DataType::String)?;
    let populations = df.column(&columns.population_column)
        .with_context(|| format!("[io] Missing population column '{}'", columns.population_column))?;
    let populations = population_values(populations)?;

    let rows = counties.str()?.into_iter()
        .zip(districts.str()?.into_iter())
        .zip(populations)
        .enumerate()
        .map(|(row, ((county, district), population))| {
            let (Some(county), Some(district), Some(population)) = (county, district, population) else {
                bail!("[io] Row {} has an empty field", row + 1);
            };
            Ok((county.to_string(), district.to_string(), population))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(IntersectionPopulations::from_entries(rows)?)
}

/// Population column as whole people.
/// Integer columns are read exactly. Fractional populations from area-weighted
/// apportionment are rounded to the nearest person and must fit in an `i64`.
fn population_values(column: &Column) -> Result<Vec<Option<i64>>> {
    if column.dtype().is_integer() {
        let values = column.strict_cast(&DataType::Int64)
            .context("[io] Population column exceeds the 64-bit integer range")?;
        return Ok(values.i64()?.into_iter().collect());
    }

    let values = column.cast(&DataType::Float64)?;
    values.f64()?.into_iter()
        .enumerate()
        .map(|(row, value)| value.map(|population| -> Result<i64> {
            ensure!(population.is_finite(), "[io] Row {} has a non-numeric population", row + 1);
            let rounded = population.round();
            // i64::MAX as f64 is 2^63, itself one past the range
            ensure!((i64::MIN as f64..i64::MAX as f64).contains(&rounded),
                "[io] Row {} population out of range", row + 1);
            Ok(rounded as i64)
        }).transpose())
        .collect()
}

/// Write a mapping as a CSV file, sorted by county then district.
pub(crate) fn write_intersections(pops: &Intersections, columns: &ColumnArgs, path: &Path) -> Result<()> {
    let mut rows = pops.iter().collect::<Vec<_>>();
    rows.sort_unstable();

    let (counties, (districts, populations)) = rows.into_iter()
        .map(|(county, district, population)| (county.as_str(), (district.as_str(), population)))
        .unzip::<_, _, Vec<_>, (Vec<_>, Vec<_>)>();

    let mut df = DataFrame::new(vec![
        Series::new(columns.county_column.as_str().into(), counties).into(),
        Series::new(columns.district_column.as_str().into(), districts).into(),
        Series::new(columns.population_column.as_str().into(), populations).into(),
    ])?;

    let file = File::create(path)
        .with_context(|| format!("[io] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io] Failed to write CSV to {:?}", path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn default_columns() -> ColumnArgs {
        ColumnArgs {
            county_column: "county".into(),
            district_column: "district".into(),
            population_column: "population".into(),
        }
    }

    #[test]
    fn reads_and_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "county,district,population\n01001,01,120\n01001,02,30.4\n01003,02,75\n01001,01,5\n").unwrap();

        let pops = read_intersections(&path, &default_columns()).unwrap();
        assert_eq!(pops.len(), 3);
        assert_eq!(pops.get(&"01001".to_string(), &"01".to_string()), Some(125));
        assert_eq!(pops.get(&"01001".to_string(), &"02".to_string()), Some(30));
        assert_eq!(pops.counties_split(), 1);
    }

    #[test]
    fn custom_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "COUNTYFP,CD116FP,P001001\n031,1,500\n").unwrap();

        let columns = ColumnArgs {
            county_column: "COUNTYFP".into(),
            district_column: "CD116FP".into(),
            population_column: "P001001".into(),
        };
        let pops = read_intersections(&path, &columns).unwrap();
        assert_eq!(pops.get(&"031".to_string(), &"1".to_string()), Some(500));
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "county,district,pop\nA,1,10\n").unwrap();

        let err = read_intersections(&path, &default_columns()).unwrap_err();
        assert!(format!("{err:#}").contains("population"));
    }

    #[test]
    fn negative_population_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "county,district,population\nA,1,-10\n").unwrap();

        let err = read_intersections(&path, &default_columns()).unwrap_err();
        assert!(format!("{err:#}").contains("negative population"));
    }

    #[test]
    fn huge_fractional_population_is_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "county,district,population\nA,1,10.5\nA,1,1e20\n").unwrap();

        let err = read_intersections(&path, &default_columns()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 2 population out of range"), "{err:#}");
    }

    #[test]
    fn integer_populations_are_read_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        // 2^53 + 1 has no exact f64 representation
        fs::write(&path, "county,district,population\nA,1,9007199254740993\nB,1,7\n").unwrap();

        let pops = read_intersections(&path, &default_columns()).unwrap();
        assert_eq!(pops.get(&"A".to_string(), &"1".to_string()), Some(9_007_199_254_740_993));
    }

    #[test]
    fn table_total_past_u64_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        let max = i64::MAX;
        fs::write(&path, format!("county,district,population\nA,1,{max}\nB,1,{max}\nC,1,10\n")).unwrap();

        let err = read_intersections(&path, &default_columns()).unwrap_err();
        assert!(format!("{err:#}").contains("overflows"), "{err:#}");
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        let pops = Intersections::from_entries([
            ("002".to_string(), "1".to_string(), 400),
            ("001".to_string(), "2".to_string(), 90),
        ]).unwrap();

        write_intersections(&pops, &default_columns(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("county,district,population\n001,2,90\n"));
        assert_eq!(read_intersections(&path, &default_columns()).unwrap(), pops);
    }
}
