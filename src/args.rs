use clap::Parser;

/// This is the data backend of a dashboard over Canadian workforce
/// statistics.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file fixing the input
    /// locations and the initial selection. Command line flags override the
    /// values it contains. For more information about the file format, read
    /// the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The statistics extract, a Statistics Canada full-table
    /// CSV download, plain or gzip-compressed.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, optional) The province boundary document in GeoJSON
    /// format. When provided, it is embedded untouched in the map output.
    #[clap(short, long, value_parser)]
    pub boundary: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the chart summary will
    /// be written in JSON format to the given location. Setting this option
    /// overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, wfdash
    /// will check that the generated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Selected year for the map view.
    #[clap(long, value_parser)]
    pub year: Option<i32>,

    /// Selected age group, as labeled in the extract.
    #[clap(long, value_parser)]
    pub age_group: Option<String>,

    /// Selected industry (NAICS label, as found in the extract).
    #[clap(long, value_parser)]
    pub industry: Option<String>,

    /// Selected province for the bar view.
    #[clap(long, value_parser)]
    pub province: Option<String>,

    /// Selected labour force characteristic.
    #[clap(long, value_parser)]
    pub labour_status: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
