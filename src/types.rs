use geo::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub name: String,
    pub state_id: String,
    // x = longitude, y = latitude
    pub coordinates: Point<f64>,
    pub population: u64,
}
