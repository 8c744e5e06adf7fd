// Reader for the Statistics Canada full-table CSV download.

use log::{debug, info};

use std::fs::File;
use std::io::Read;

use flate2::read::GzDecoder;
use labour_stats::Observation;

use crate::lfs::*;

// Column headers of the extract, as published. Columns are matched by name
// so their order does not matter, and extra columns are ignored.
const COL_DATE: &str = "REF_DATE";
const COL_GEO: &str = "GEO";
const COL_LABOUR: &str = "Labour force characteristics";
const COL_INDUSTRY: &str = "North American Industry Classification System (NAICS)";
const COL_SEX: &str = "Sex";
const COL_AGE: &str = "Age group";
const COL_VALUE: &str = "VALUE";

// The extract publishes person counts in thousands.
const VALUE_SCALE: f64 = 1000.0;

pub fn read_statcan_extract(path: &str) -> DashResult<Vec<Observation>> {
    info!("Attempting to read extract file {:?}", path);
    let f = File::open(path).context(OpeningDataSnafu {
        path: path.to_string(),
    })?;
    let observations = if io_common::is_gzip_path(path) {
        read_statcan_records(GzDecoder::new(f))?
    } else {
        read_statcan_records(f)?
    };
    info!(
        "read_statcan_extract: {}: {} observations",
        io_common::simplify_file_name(path),
        observations.len()
    );
    Ok(observations)
}

pub fn read_statcan_records<R: Read>(input: R) -> DashResult<Vec<Observation>> {
    let mut rdr = csv::Reader::from_reader(input);
    let headers = rdr.headers().context(CsvLineParseSnafu {})?.clone();
    debug!("read_statcan_records: header: {:?}", headers);
    let columns = ColumnIndexes::from_headers(&headers)?;

    let mut res: Vec<Observation> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header occupies the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let obs = columns.parse_record(&line, lineno)?;
        debug!("read_statcan_records: line {}: {:?}", lineno, obs);
        res.push(obs);
    }
    Ok(res)
}

struct ColumnIndexes {
    date: usize,
    geography: usize,
    labour_status: usize,
    industry: usize,
    sex: usize,
    age_group: usize,
    value: usize,
}

impl ColumnIndexes {
    fn from_headers(headers: &csv::StringRecord) -> DashResult<ColumnIndexes> {
        Ok(ColumnIndexes {
            date: find_column(headers, COL_DATE)?,
            geography: find_column(headers, COL_GEO)?,
            labour_status: find_column(headers, COL_LABOUR)?,
            industry: find_column(headers, COL_INDUSTRY)?,
            sex: find_column(headers, COL_SEX)?,
            age_group: find_column(headers, COL_AGE)?,
            value: find_column(headers, COL_VALUE)?,
        })
    }

    fn parse_record(&self, line: &csv::StringRecord, lineno: usize) -> DashResult<Observation> {
        let date_raw = field(line, self.date, lineno)?;
        // Monthly extracts write the period as 2020-01; keep the year part.
        let date = date_raw
            .split('-')
            .next()
            .and_then(|y| y.parse::<i32>().ok())
            .context(BadYearSnafu { lineno })?;

        // An empty or non-numeric cell ("..", "F", ...) marks a suppressed
        // value. Such rows load as missing and are discarded by the
        // reshaping, matching the treatment of the published tables.
        let value = match field(line, self.value, lineno)? {
            "" => None,
            s => s.parse::<f64>().ok().map(|v| v * VALUE_SCALE),
        };

        Ok(Observation {
            date,
            geography: field(line, self.geography, lineno)?.to_string(),
            labour_status: field(line, self.labour_status, lineno)?.to_string(),
            industry: field(line, self.industry, lineno)?.to_string(),
            sex: field(line, self.sex, lineno)?.to_string(),
            age_group: field(line, self.age_group, lineno)?.to_string(),
            value,
        })
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> DashResult<usize> {
    headers.iter().position(|h| h == name).context(MissingColumnSnafu {
        name: name.to_string(),
    })
}

fn field<'a>(line: &'a csv::StringRecord, idx: usize, lineno: usize) -> DashResult<&'a str> {
    line.get(idx).context(CsvLineTooShortSnafu { lineno })
}
