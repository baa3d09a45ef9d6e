use csv::Writer;
use serde::Serialize;
use std::io;

use crate::plot::types::FamilyGroup;

#[derive(Serialize)]
struct CsvRow<'a> {
    family: &'a str,
    label: &'a str,
    x: f64,
    y: f64,
    draw_x: f64,
    draw_y: f64,
}

/// One row per mapped sample: `family,label,x,y,draw_x,draw_y`.
pub fn to_csv(groups: &[FamilyGroup]) -> Result<String, csv::Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    let mut wrote_row = false;

    for group in groups {
        for (series, points) in group.series.iter().zip(&group.mapping.series) {
            for p in points {
                wtr.serialize(CsvRow {
                    family: group.family.name(),
                    label: &series.label,
                    x: p.x,
                    y: p.y,
                    draw_x: p.draw_x,
                    draw_y: p.draw_y,
                })?;
                wrote_row = true;
            }
        }
    }
    if !wrote_row {
        wtr.write_record(["family", "label", "x", "y", "draw_x", "draw_y"])?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Pretty-printed JSON array of groups.
pub fn to_json(groups: &[FamilyGroup]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;
    use crate::plot::aggregate::sample_and_map;
    use crate::plot::types::PlotOptions;

    fn groups() -> Vec<FamilyGroup> {
        let specs = vec![parse("linear:2,3,-1,1,1").unwrap(), parse("y=x^2:0,1,1").unwrap()];
        sample_and_map(&specs, &PlotOptions::default()).unwrap()
    }

    #[test]
    fn test_csv_rows() {
        let csv = to_csv(&groups()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "family,label,x,y,draw_x,draw_y");
        assert_eq!(lines.len(), 1 + 3 + 2);
        assert!(lines[1].starts_with("linear,\"linear:2,3,-1,1,1\",-1.0,1.0,"));
        assert!(lines[4].starts_with("quadratic,\"y=x^2:0,1,1\",0.0,0.0,"));
    }

    #[test]
    fn test_csv_empty_has_header() {
        assert_eq!(to_csv(&[]).unwrap().trim(), "family,label,x,y,draw_x,draw_y");
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&groups()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["family"], "Linear");
        assert_eq!(value[0]["series"][0]["samples"].as_array().unwrap().len(), 3);
        assert_eq!(value[0]["mapping"]["series"][0][0]["draw_x"], 10.0);
    }
}
