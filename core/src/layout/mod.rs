//! Turning the flat spot list into displayable structure.

pub mod expanded;
pub mod grouping;
pub mod partition;

pub use expanded::ExpandedSections;
pub use grouping::{group_by_initial, SpotGroups};
pub use partition::{
    basement_spots, partition, section_label, Partition, Section, SectionNames, SECTION_SIZE,
};
