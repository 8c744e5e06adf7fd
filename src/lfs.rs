use log::{debug, info, warn};

use labour_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::lfs::config_reader::*;

pub mod controls;
pub mod io_common;
pub mod io_csv;
pub mod io_geojson;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening data file {path}"))]
    OpeningData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing line in data file"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Missing column {name} in the data file header"))]
    MissingColumn { name: String },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno} does not carry a readable year"))]
    BadYear { lineno: usize },
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error parsing boundary file {path}"))]
    ParsingBoundary {
        source: geojson::Error,
        path: String,
    },
    #[snafu(display("Boundary file {path} is not a feature collection"))]
    BoundaryNotCollection { path: String },
    #[snafu(display("Could not build the analysis table"))]
    BuildingTable { source: StatsError },
    #[snafu(display("No data file was provided (use --data or a configuration file)"))]
    MissingDataFile {},
    #[snafu(display("Error writing output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

pub mod config_reader {
    use crate::lfs::*;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputSettings {
        #[serde(rename = "dashboardTitle")]
        pub dashboard_title: String,
        #[serde(rename = "subtitle")]
        pub subtitle: Option<String>,
        #[serde(rename = "outputPath")]
        pub output_path: Option<String>,
    }

    // The header block echoed at the top of the summary output.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputConfig {
        pub title: String,
        pub subtitle: Option<String>,
        #[serde(rename = "dataFile")]
        pub data_file: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct FileSource {
        pub provider: String,
        #[serde(rename = "filePath")]
        pub file_path: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct DefaultSelection {
        pub year: Option<i32>,
        #[serde(rename = "ageGroup")]
        pub age_group: Option<String>,
        pub industry: Option<String>,
        pub province: Option<String>,
        #[serde(rename = "labourStatus")]
        pub labour_status: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct DashConfig {
        #[serde(rename = "outputSettings")]
        pub output_settings: OutputSettings,
        #[serde(rename = "dataSources")]
        pub data_sources: Vec<FileSource>,
        #[serde(rename = "boundaryFile")]
        pub boundary_file: Option<String>,
        #[serde(rename = "defaultSelection")]
        pub default_selection: Option<DefaultSelection>,
    }

    pub fn read_config(path: &str) -> DashResult<DashConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let config: DashConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        debug!("read_config: {:?}", config);
        Ok(config)
    }

    pub fn read_summary(path: &str) -> DashResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }
}

// The sex colours of the bar view.
const FEMALE_COLOUR: &str = "rgb(247, 87, 226)";
const MALE_COLOUR: &str = "rgb(15, 105, 250)";

fn map_figure_js(map_rows: &[AnalysisRow], year: i32) -> JSValue {
    // The choropleth is coloured by the female share; the male rows of the
    // subset carry the complementary value and are not drawn.
    let mut locations: Vec<JSValue> = Vec::new();
    let mut values: Vec<JSValue> = Vec::new();
    for r in map_rows.iter().filter(|r| r.sex == Sex::Female) {
        locations.push(json!(r.geography));
        values.push(json!(r.percent));
    }
    json!({
        "type": "choropleth",
        "featureIdKey": "properties.prov_name_en",
        "locations": locations,
        "values": values,
        "colorLabel": "% of Females",
        "colorMidpoint": 50,
        "colorRange": [100, 0],
        "colorScale": [
            [0.0, "rgb(2, 10, 250)"],
            [0.5, "rgb(196, 157, 250)"],
            [1.0, "rgb(250, 2, 163)"]
        ],
        "center": {"lat": 54.1304, "lon": -97.3468},
        "zoom": 2.5,
        "title": format!("The percentage of females in industry by province in {}", year),
    })
}

fn bar_figure_js(bar_rows: &[AnalysisRow], province: &str) -> JSValue {
    let mut traces: Vec<JSValue> = Vec::new();
    for (sex, colour) in [(Sex::Female, FEMALE_COLOUR), (Sex::Male, MALE_COLOUR)] {
        let selected: Vec<&AnalysisRow> = bar_rows.iter().filter(|r| r.sex == sex).collect();
        traces.push(json!({
            "name": sex.label(),
            "color": colour,
            "x": selected.iter().map(|r| json!(r.percent)).collect::<Vec<JSValue>>(),
            "y": selected.iter().map(|r| json!(r.date)).collect::<Vec<JSValue>>(),
        }));
    }
    json!({
        "type": "bar",
        "orientation": "h",
        "xLabel": "Percent",
        "yLabel": "Year",
        "xRange": [0, 100],
        "traces": traces,
        "title": format!("Male vs Female in {}", province),
    })
}

fn selection_js(criteria: &Criteria) -> JSValue {
    json!({
        "year": criteria.year,
        "ageGroup": criteria.age_group,
        "industry": criteria.industry,
        "province": criteria.province,
        "labourStatus": criteria.labour_status,
    })
}

fn build_summary_js(
    output_config: &OutputConfig,
    criteria: &Criteria,
    age_groups: &[String],
    output: &QueryOutput,
    boundary: Option<&geojson::FeatureCollection>,
) -> DashResult<JSValue> {
    let mut summary = json!({
        "config": output_config,
        "selection": selection_js(criteria),
        "controls": controls::controls_js(age_groups),
        "mapFigure": map_figure_js(&output.map_rows, criteria.year),
        "barFigure": bar_figure_js(&output.bar_rows, &criteria.province),
    });
    if let Some(fc) = boundary {
        let js = serde_json::to_value(fc).context(ParsingJsonSnafu {})?;
        summary["boundary"] = js;
    }
    Ok(summary)
}

// Joins a path found in the configuration file to the configuration file's
// own directory.
fn resolve_from_config(config_path: &str, file_path: &str) -> String {
    let parent = Path::new(config_path)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    parent.join(file_path).display().to_string()
}

fn resolve_data_path(args: &Args, config: Option<&DashConfig>) -> DashResult<String> {
    if let Some(p) = &args.data {
        return Ok(p.clone());
    }
    if let Some(c) = config {
        for source in c.data_sources.iter() {
            match source.provider.as_str() {
                "statcan_csv" => {
                    return Ok(resolve_from_config(
                        args.config.as_deref().unwrap_or(""),
                        &source.file_path,
                    ))
                }
                x => {
                    whatever!("Provider not implemented {:?}", x)
                }
            }
        }
    }
    MissingDataFileSnafu {}.fail()
}

fn resolve_boundary_path(args: &Args, config: Option<&DashConfig>) -> Option<String> {
    if let Some(p) = &args.boundary {
        return Some(p.clone());
    }
    config.and_then(|c| {
        c.boundary_file
            .as_ref()
            .map(|p| resolve_from_config(args.config.as_deref().unwrap_or(""), p))
    })
}

fn resolve_criteria(args: &Args, defaults: Option<&DefaultSelection>) -> Criteria {
    let builtin = controls::default_criteria();
    Criteria {
        year: args
            .year
            .or_else(|| defaults.and_then(|d| d.year))
            .unwrap_or(builtin.year),
        age_group: args
            .age_group
            .clone()
            .or_else(|| defaults.and_then(|d| d.age_group.clone()))
            .unwrap_or(builtin.age_group),
        industry: args
            .industry
            .clone()
            .or_else(|| defaults.and_then(|d| d.industry.clone()))
            .unwrap_or(builtin.industry),
        province: args
            .province
            .clone()
            .or_else(|| defaults.and_then(|d| d.province.clone()))
            .unwrap_or(builtin.province),
        labour_status: args
            .labour_status
            .clone()
            .or_else(|| defaults.and_then(|d| d.labour_status.clone()))
            .unwrap_or(builtin.labour_status),
    }
}

/// Loads the inputs, builds the analysis table once, runs one query for the
/// resolved selection and writes the chart summary.
///
/// Any failure before the table is fully built aborts the run: queries are
/// never served from a partial snapshot.
pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let config: Option<DashConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    info!("run_dashboard: config: {:?}", config);

    let data_path = resolve_data_path(args, config.as_ref())?;
    let observations = io_csv::read_statcan_extract(&data_path)?;

    let boundary = match resolve_boundary_path(args, config.as_ref()) {
        Some(p) => Some(io_geojson::read_boundary(&p)?),
        None => None,
    };

    let table =
        build_analysis_table(&observations, &ReshapeRules::DEFAULT_RULES).context(BuildingTableSnafu {})?;
    info!("run_dashboard: analysis table has {} rows", table.len());

    let criteria = resolve_criteria(
        args,
        config.as_ref().and_then(|c| c.default_selection.as_ref()),
    );
    info!("run_dashboard: selection: {:?}", criteria);

    let output = run_query(&table, &criteria);
    if output.map_rows.is_empty() && output.bar_rows.is_empty() {
        warn!("run_dashboard: the selection matches no row; the charts will be empty");
    }

    let output_config = OutputConfig {
        title: config
            .as_ref()
            .map(|c| c.output_settings.dashboard_title.clone())
            .unwrap_or_else(|| "Canadian Workforce".to_string()),
        subtitle: config
            .as_ref()
            .and_then(|c| c.output_settings.subtitle.clone()),
        data_file: io_common::simplify_file_name(&data_path),
    };
    let summary = build_summary_js(
        &output_config,
        &criteria,
        &table.age_groups(),
        &output,
        boundary.as_ref(),
    )?;
    let pretty_js_summary = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;

    let out_dest = args
        .out
        .clone()
        .or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.output_settings.output_path.clone())
        })
        .unwrap_or_else(|| "stdout".to_string());
    if out_dest == "stdout" {
        println!("{}", pretty_js_summary);
    } else {
        fs::write(&out_dest, &pretty_js_summary).context(WritingOutputSnafu {
            path: out_dest.clone(),
        })?;
        info!("run_dashboard: summary written to {}", out_dest);
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const SAMPLE_EXTRACT: &str = "\
REF_DATE,GEO,DGUID,Labour force characteristics,North American Industry Classification System (NAICS),Sex,Age group,VALUE
2020,Alberta,2016A000248,Full-time employment,\"Total, all industries\",Females,25 to 54 years,500.0
2020,Alberta,2016A000248,Full-time employment,\"Total, all industries\",Males,25 to 54 years,700.0
2020,Alberta,2016A000248,Full-time employment,\"Total, all industries\",Both sexes,25 to 54 years,1200.0
2020,Quebec,2016A000224,Full-time employment,\"Total, all industries\",Females,25 to 54 years,
2020,Quebec,2016A000224,Full-time employment,\"Total, all industries\",Males,25 to 54 years,..
";

    fn sample_args(argv: &[&str]) -> Args {
        let mut full = vec!["wfdash"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    fn sample_table() -> AnalysisTable {
        let observations =
            io_csv::read_statcan_records(SAMPLE_EXTRACT.as_bytes()).unwrap();
        build_analysis_table(&observations, &ReshapeRules::DEFAULT_RULES).unwrap()
    }

    #[test]
    fn read_extract_from_buffer() {
        let observations =
            io_csv::read_statcan_records(SAMPLE_EXTRACT.as_bytes()).unwrap();
        assert_eq!(observations.len(), 5);

        // Columns are matched by header name, with extra columns ignored,
        // and values are rescaled to person units.
        let first = &observations[0];
        assert_eq!(first.date, 2020);
        assert_eq!(first.geography, "Alberta");
        assert_eq!(first.labour_status, "Full-time employment");
        assert_eq!(first.industry, "Total, all industries");
        assert_eq!(first.sex, "Females");
        assert_eq!(first.age_group, "25 to 54 years");
        assert_eq!(first.value, Some(500_000.0));

        // Suppressed cells, empty or "..", load as missing values.
        assert_eq!(observations[3].value, None);
        assert_eq!(observations[4].value, None);
    }

    #[test]
    fn read_extract_with_monthly_periods() {
        let extract = "\
REF_DATE,GEO,Labour force characteristics,North American Industry Classification System (NAICS),Sex,Age group,VALUE
2020-01,Alberta,Unemployment,Utilities [22],Females,15 years and over,12.5
";
        let observations = io_csv::read_statcan_records(extract.as_bytes()).unwrap();
        assert_eq!(observations[0].date, 2020);
        assert_eq!(observations[0].value, Some(12_500.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let extract = "REF_DATE,GEO,Sex,Age group,VALUE\n2020,Alberta,Females,25 to 54 years,1.0\n";
        let res = io_csv::read_statcan_records(extract.as_bytes());
        match res {
            Err(DashError::MissingColumn { name }) => {
                assert_eq!(name, "Labour force characteristics")
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn bad_year_is_an_error() {
        let extract = "\
REF_DATE,GEO,Labour force characteristics,North American Industry Classification System (NAICS),Sex,Age group,VALUE
soon,Alberta,Unemployment,Utilities [22],Females,15 years and over,1.0
";
        let res = io_csv::read_statcan_records(extract.as_bytes());
        match res {
            Err(DashError::BadYear { lineno }) => assert_eq!(lineno, 2),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn read_gzipped_extract() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(SAMPLE_EXTRACT.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let path = std::env::temp_dir().join("wfdash_test_extract.csv.gz");
        fs::write(&path, compressed).unwrap();

        let observations =
            io_csv::read_statcan_extract(path.display().to_string().as_str()).unwrap();
        assert_eq!(observations.len(), 5);
        assert_eq!(observations[1].value, Some(700_000.0));
    }

    #[test]
    fn parse_config() {
        let raw = r#"{
            "outputSettings": {"dashboardTitle": "Canadian Workforce", "subtitle": null, "outputPath": "summary.json"},
            "dataSources": [{"provider": "statcan_csv", "filePath": "statcanada.csv.gz"}],
            "boundaryFile": "georef-canada-province.geojson",
            "defaultSelection": {"year": 1990, "ageGroup": null, "industry": null, "province": "Quebec", "labourStatus": null}
        }"#;
        let config: DashConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.data_sources[0].provider, "statcan_csv");
        assert_eq!(config.output_settings.output_path.as_deref(), Some("summary.json"));
        let defaults = config.default_selection.unwrap();
        assert_eq!(defaults.year, Some(1990));
        assert_eq!(defaults.province.as_deref(), Some("Quebec"));
    }

    #[test]
    fn criteria_resolution_order() {
        let args = sample_args(&["--year", "1985"]);
        let defaults = DefaultSelection {
            year: Some(1990),
            age_group: None,
            industry: None,
            province: Some("Quebec".to_string()),
            labour_status: None,
        };
        let criteria = resolve_criteria(&args, Some(&defaults));
        // Flag beats configuration, configuration beats builtin.
        assert_eq!(criteria.year, 1985);
        assert_eq!(criteria.province, "Quebec");
        // The remaining fields come from the builtin defaults.
        assert_eq!(criteria.age_group, "25 to 54 years");
        assert_eq!(criteria.industry, "Total, all industries");
        assert_eq!(criteria.labour_status, "Full-time employment");
    }

    #[test]
    fn map_figure_uses_female_share() {
        let table = sample_table();
        let criteria = controls::default_criteria();
        let output = run_query(&table, &criteria);
        let fig = map_figure_js(&output.map_rows, criteria.year);
        assert_eq!(fig["featureIdKey"], "properties.prov_name_en");
        assert_eq!(fig["locations"], json!(["Alberta"]));
        assert_eq!(fig["values"], json!([41.67]));
    }

    #[test]
    fn bar_figure_groups_by_sex() {
        let table = sample_table();
        let criteria = controls::default_criteria();
        let output = run_query(&table, &criteria);
        let fig = bar_figure_js(&output.bar_rows, &criteria.province);
        let traces = fig["traces"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "Female");
        assert_eq!(traces[0]["x"], json!([41.67]));
        assert_eq!(traces[0]["y"], json!([2020]));
        assert_eq!(traces[1]["name"], "Male");
        assert_eq!(traces[1]["x"], json!([58.33]));
    }

    #[test]
    fn empty_selection_produces_valid_empty_figures() {
        let table = sample_table();
        let criteria = Criteria {
            year: 1900,
            age_group: "25 to 54 years".to_string(),
            industry: "Total, all industries".to_string(),
            province: "Atlantis".to_string(),
            labour_status: "Full-time employment".to_string(),
        };
        let output = run_query(&table, &criteria);
        let map_fig = map_figure_js(&output.map_rows, criteria.year);
        assert_eq!(map_fig["locations"], json!([]));
        assert_eq!(map_fig["values"], json!([]));
        let bar_fig = bar_figure_js(&output.bar_rows, &criteria.province);
        assert_eq!(bar_fig["traces"][0]["x"], json!([]));
        assert_eq!(bar_fig["traces"][1]["x"], json!([]));
    }

    #[test]
    fn summary_structure() {
        let table = sample_table();
        let criteria = controls::default_criteria();
        let output = run_query(&table, &criteria);
        let output_config = OutputConfig {
            title: "Canadian Workforce".to_string(),
            subtitle: None,
            data_file: "statcanada.csv.gz".to_string(),
        };
        let summary =
            build_summary_js(&output_config, &criteria, &table.age_groups(), &output, None)
                .unwrap();
        assert_eq!(summary["config"]["title"], "Canadian Workforce");
        assert_eq!(summary["selection"]["year"], 2020);
        assert_eq!(summary["selection"]["province"], "Alberta");
        assert_eq!(
            summary["controls"]["ageGroups"],
            json!(["25 to 54 years"])
        );
        assert!(summary["mapFigure"].is_object());
        assert!(summary["barFigure"].is_object());
        assert!(summary.get("boundary").is_none());
    }
}
