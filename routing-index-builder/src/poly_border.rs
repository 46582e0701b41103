//! A border loader for the Osmosis `.poly` polygon filter format (§6:
//! `<path>/borders/<country>.poly`), backed by `geo`'s point-in-polygon test.

use std::fs;
use std::path::Path;

use geo::{Contains, LineString, Polygon};
use routing_graph::border::{BorderLoader, Region};
use routing_graph::error::BorderLoadError;
use routing_graph::geometry::Point;

/// One ring of a `.poly` file, tested via `geo`'s winding-number containment.
pub struct PolyRegion {
    polygon: Polygon<f64>,
}

impl Region for PolyRegion {
    fn contains(&self, point: Point) -> bool {
        self.polygon.contains(&geo::Point::new(point.x, point.y))
    }
}

/// Loads `.poly` files: a name line, one or more rings (each introduced by a
/// ring id line, terminated by `END`, coordinates as `x y` pairs), and a
/// final `END` closing the file.
pub struct PolyBorderLoader;

impl BorderLoader for PolyBorderLoader {
    type Region = PolyRegion;

    fn load_borders(&self, path: &Path) -> Result<Vec<PolyRegion>, BorderLoadError> {
        let text = fs::read_to_string(path).map_err(|source| BorderLoadError::Io { path: path.display().to_string(), source })?;
        parse_poly(&text, path)
    }
}

fn parse_poly(text: &str, path: &Path) -> Result<Vec<PolyRegion>, BorderLoadError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    lines.next().ok_or_else(|| BorderLoadError::Malformed { path: path.display().to_string(), reason: "empty file".to_owned() })?;

    let mut regions = Vec::new();
    loop {
        let Some(ring_header) = lines.next() else { break };
        if ring_header.eq_ignore_ascii_case("END") {
            break;
        }

        let mut coords = Vec::new();
        for line in lines.by_ref() {
            if line.eq_ignore_ascii_case("END") {
                break;
            }
            let mut parts = line.split_whitespace();
            let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
                return Err(BorderLoadError::Malformed { path: path.display().to_string(), reason: format!("expected 'x y', got {line:?}") });
            };
            let x: f64 = x.parse().map_err(|_| BorderLoadError::Malformed { path: path.display().to_string(), reason: format!("bad longitude {x:?}") })?;
            let y: f64 = y.parse().map_err(|_| BorderLoadError::Malformed { path: path.display().to_string(), reason: format!("bad latitude {y:?}") })?;
            coords.push((x, y));
        }

        if coords.len() < 3 {
            return Err(BorderLoadError::Malformed { path: path.display().to_string(), reason: "ring has fewer than 3 points".to_owned() });
        }
        let polygon = Polygon::new(LineString::from(coords), vec![]);
        regions.push(PolyRegion { polygon });
    }

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "test-border\n1\n   0 0\n   0 1\n   1 1\n   1 0\n   0 0\nEND\nEND\n";

    #[test]
    fn parses_a_single_ring_and_answers_containment() {
        let regions = parse_poly(SQUARE, Path::new("test.poly")).unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions[0].contains(Point::new(0.5, 0.5)));
        assert!(!regions[0].contains(Point::new(1.5, 0.5)));
    }

    #[test]
    fn rejects_a_ring_with_too_few_points() {
        let text = "test-border\n1\n  0 0\n  1 1\nEND\nEND\n";
        let err = parse_poly(text, Path::new("test.poly")).unwrap_err();
        assert!(matches!(err, BorderLoadError::Malformed { .. }));
    }
}
