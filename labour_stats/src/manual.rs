/*!

This is the long-form manual for `labour_stats` and `wfdash`.

## Input formats

The following data providers are supported:
* `statcan_csv` Statistics Canada full-table CSV download, plain or
  gzip-compressed.

### `statcan_csv`

A long-format table with one row per observation. Columns are matched by
header name, in any order; columns not listed here are ignored.

| column | content |
|--------|---------|
| `REF_DATE` | reference year (`2020`); a leading year in a `2020-01` style period is accepted |
| `GEO` | province name |
| `Labour force characteristics` | e.g. `Full-time employment`, `Part-time employment`, `Unemployment` |
| `North American Industry Classification System (NAICS)` | industry label, including aggregates |
| `Sex` | `Females`, `Males` or `Both sexes` |
| `Age group` | e.g. `15 years and over`, `25 to 54 years` |
| `VALUE` | person count in thousands; empty or non-numeric cells mark suppressed data |

Values are rescaled to raw person units (multiplied by 1000) at load time.
Rows with a suppressed `VALUE` and the `Both sexes` aggregate rows never
reach the analysis table. A key present for only one sex, or whose total is
zero, is excluded during reshaping: its percentage share is undefined.

## Boundary file

A GeoJSON `FeatureCollection` with one feature per province. The province
name is expected under `properties.prov_name_en`, matching the `GEO` column
of the extract. The file is checked for well-formedness and then passed
through to the map figure untouched.

## Configuration

`wfdash` comes with sensible defaults but accepts a configuration file in
JSON to fix the input locations and the initial selection:

```json
{
    "outputSettings": {
        "dashboardTitle": "Canadian Workforce",
        "outputPath": "summary.json"
    },
    "dataSources": [
        {"provider": "statcan_csv", "filePath": "statcanada.csv.gz"}
    ],
    "boundaryFile": "georef-canada-province.geojson",
    "defaultSelection": {
        "year": 2020,
        "ageGroup": "25 to 54 years",
        "industry": "Total, all industries",
        "province": "Alberta",
        "labourStatus": "Full-time employment"
    }
}
```

All fields of `defaultSelection` are optional; omitted fields fall back to
the built-in defaults shown above. Command line flags override the
configuration file. File paths are resolved relative to the configuration
file's directory.

## Query semantics

One run performs one query against the analysis table, producing the two
chart subsets:

* the **map** subset matches the selected year, age group and industry and
  spans every province, both sexes and every labour force characteristic;
* the **bar** subset matches the selected age group, industry, province and
  labour force characteristic and spans every year of the extract.

A selection that matches nothing produces structurally valid figures with
empty data arrays, never an error.

 */
