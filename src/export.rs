use std::io::Write;

use _model::Eatery;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct Row<'a> {
    name: &'a str,
    latitude: f64,
    longitude: f64,
}

/// Writes one `NAME,LATITUDE,LONGITUDE` row per eatery whose first location
/// was geocoded. Returns the number of rows written.
pub fn write_csv(eateries: &[Eatery], writer: impl Write) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut count = 0;
    for eatery in eateries {
        let Some(coordinate) = eatery.first_coordinate() else {
            log::debug!("{} has no coordinate, leaving it out", eatery.name);
            continue;
        };
        csv.serialize(Row {
            name: &eatery.name,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        })?;
        count += 1;
    }
    csv.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use _model::{Coordinate, Location};

    use super::*;

    #[test]
    fn flattens_first_location() {
        let eatery = |name: &str, locations: Vec<Location>| {
            let mut eatery = Eatery::new(name);
            eatery.locations = locations;
            eatery
        };
        let at = |latitude, longitude| Some(Coordinate::new(latitude, longitude));

        let kopi = eatery(
            "Cafe Kopi",
            vec![
                Location::new("109 N Walnut St", at(40.1169, -88.2434)),
                Location::new("elsewhere", at(0.0, 0.0)),
            ],
        );
        let lost = eatery(
            "Lost",
            vec![
                Location::unresolved("?"),
                Location::new("2nd", at(1.0, 1.0)),
            ],
        );
        let comma = eatery(
            "Dos Reales, Urbana",
            vec![Location::new("1407 N Prospect", at(40.13, -88.26))],
        );

        let mut output = Vec::new();
        let count = write_csv(&[kopi, lost, comma], &mut output).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "NAME,LATITUDE,LONGITUDE\n\
             Cafe Kopi,40.1169,-88.2434\n\
             \"Dos Reales, Urbana\",40.13,-88.26\n"
        );
    }

    #[test]
    fn nothing_to_write() {
        let mut output = Vec::new();
        assert_eq!(write_csv(&[], &mut output).unwrap(), 0);
    }
}
