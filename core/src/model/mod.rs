pub mod counts;
pub mod spot;
pub mod zone;

pub use counts::{DirectionalCounts, Heading, ParseHeadingError};
pub use spot::{OccupancySnapshot, Spot};
pub use zone::{Basement, ParseBasementError};
