use parkcore::model::{Basement, Heading, Spot};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Spots per lettered row before the next letter starts.
pub const SPOTS_PER_ROW: usize = 12;

/// Name for the spot at `position` within a basement, e.g. `B03 Zone B2`.
pub fn spot_name(basement: Basement, position: usize) -> String {
    let row = (b'A' + (position / SPOTS_PER_ROW % 26) as u8) as char;
    let number = position % SPOTS_PER_ROW + 1;
    format!("{row}{number:02} {}", basement.zone_token())
}

/// Direction of the spot at `position` within its zone, as seen from the ramp.
pub fn heading_for(position: usize) -> Heading {
    Heading::ALL[position % Heading::ALL.len()]
}

/// Builds both basements with seeded random reservations, ids starting at 1.
pub fn build_lot(spots_per_basement: usize, occupancy: f64, seed: u64) -> Vec<Spot> {
    let mut rng = StdRng::seed_from_u64(seed);
    let occupancy = occupancy.clamp(0.0, 1.0);
    let mut spots = Vec::with_capacity(spots_per_basement * Basement::ALL.len());
    let mut next_id = 1;

    for basement in Basement::ALL {
        for position in 0..spots_per_basement {
            spots.push(Spot::new(
                next_id,
                spot_name(basement, position),
                rng.gen_bool(occupancy),
            ));
            next_id += 1;
        }
    }
    spots
}
