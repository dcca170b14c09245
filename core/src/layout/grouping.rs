use crate::model::Spot;
use indexmap::IndexMap;
use log::debug;

/// Spots keyed by the first character of their name, in first-seen order.
pub type SpotGroups<'a> = IndexMap<char, Vec<&'a Spot>>;

/// Builds the compact grid index. Independent of basement sectioning.
pub fn group_by_initial<'a, I>(spots: I) -> SpotGroups<'a>
where
    I: IntoIterator<Item = &'a Spot>,
{
    let mut groups = SpotGroups::new();
    for spot in spots {
        match spot.name.chars().next() {
            Some(initial) => groups.entry(initial).or_default().push(spot),
            None => debug!("skipping unnamed spot {}", spot.id),
        }
    }
    groups
}
