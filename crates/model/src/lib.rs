pub use serde_with;

pub mod coordinate;
pub mod directions;
pub mod elevation;
pub mod route;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use directions::{LegSummary, Route, TravelMode};
pub use elevation::{ChartPoint, ElevationSample, ElevationSeries};
pub use route::RoutePath;

pub trait ExampleData {
    fn example_data() -> Self;
}
