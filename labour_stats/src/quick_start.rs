/*!

# Quick start with a Statistics Canada extract

This example shows how to go from a published labour force extract to the
chart-ready output, end to end, using the `wfdash` command line tool.

**Getting the data** Download a labour force characteristics table from the
Statistics Canada web site, with the dimensions broken down by province,
industry (NAICS), sex and age group, using the "Download entire table / CSV"
option. The download is a gzip-compressed CSV file whose header contains at
least the following columns:

```text
REF_DATE,GEO,Labour force characteristics,North American Industry Classification System (NAICS),Sex,Age group,VALUE
```

Extra columns are ignored. A province boundary file in GeoJSON format (one
feature per province, with the province name under
`properties.prov_name_en`) completes the inputs; it is only passed through
to the map output and its geometry is never interpreted.

**Running** Point `wfdash` at the two files:

```bash
wfdash --data statcanada.csv.gz --boundary georef-canada-province.geojson
```

This loads the extract, reshapes it once into the analysis table, runs one
query with the default selection (year 2020, ages 25 to 54, all industries,
Alberta, full-time employment) and prints a JSON summary on the standard
output with two figure specifications:

- `mapFigure`: a choropleth of the female share per province for the
  selected year, industry and age group;
- `barFigure`: a horizontal bar chart of the female and male shares in the
  selected province, one bar group per year of the extract.

The selection can be changed from the command line:

```bash
wfdash --data statcanada.csv.gz --boundary georef-canada-province.geojson \
    --year 1976 --province "Quebec" --labour-status "Unemployment"
```

**Checking against a reference** Like the reference tables published with
the extract, a previously generated summary can be used to validate a run.
If the tabulated output differs from the reference, `wfdash` prints a diff
and fails:

```bash
wfdash --data statcanada.csv.gz --out stdout --reference expected_summary.json
```

**Using the library** The reshaping and query core is available separately
in the `labour_stats` crate, without any file format or I/O concern. See
[`crate::builder::TableBuilder`] for assembling a table in memory, and
[`crate::run_query`] for the query contract. For the input and
configuration file reference, see the [manual](../manual/index.html).

*/
