use proptest::prelude::*;

use atmo_core::accumulator::AdvectionAccumulator;
use atmo_core::neighborhood::NeighborhoodOffsets;
use atmo_core::{
    AtmosphereLayer, AtmosphereParams, AtmospherePoint, Falloff, ForcingFields, Grid, LandCover,
    WeightNormalizer, Wind,
};

fn swirl(width: usize, height: usize) -> Grid<AtmospherePoint> {
    Grid::from_fn(width, height, |x, y| {
        let fx = x as f64 / width as f64 - 0.5;
        let fy = y as f64 / height as f64 - 0.5;
        AtmospherePoint::new(
            Wind::new(-fy * 0.8, fx * 0.8),
            (fx * 7.0).sin(),
            (fy * 5.0).cos() * 0.5,
        )
    })
    .unwrap()
}

fn grassland(width: usize, height: usize) -> Grid<LandCover> {
    Grid::filled(width, height, LandCover::Grass).unwrap()
}

#[test]
fn calm_three_by_three_relaxes_toward_forcing() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let current = Grid::filled(3, 3, AtmospherePoint::ZERO).unwrap();
    let forcing = ForcingFields::uniform(3, 3, Wind::CALM, 10.0, 0.0).unwrap();

    let (next, _) = layer.update(&current, &forcing, &grassland(3, 3)).unwrap();

    let expected = 0.0 * layer.params().temperature_retention
        + 10.0 * layer.params().temperature_forcing();
    assert_eq!(expected, 2.5);
    for (x, y, point) in next.iter_cells() {
        assert_eq!(point.temperature, expected, "cell ({x}, {y})");
        assert_eq!(point.wetness, 0.0, "cell ({x}, {y})");
        assert_eq!(point.wind.x, 0.0, "cell ({x}, {y})");
        assert_eq!(point.wind.y, 0.0, "cell ({x}, {y})");
    }
}

#[test]
fn gathered_weights_sum_to_one_for_every_cell() {
    let current = swirl(9, 7);
    let params = AtmosphereParams::default();
    let mut accumulator = AdvectionAccumulator::new(9, 7).unwrap();
    accumulator
        .scatter(
            &current,
            &NeighborhoodOffsets::new(params.radius),
            params.max_speed,
        )
        .unwrap();

    for falloff in [Falloff::default(), Falloff::Gaussian { sigma: 1.0 }] {
        for y in 0..7 {
            for x in 0..9 {
                let contributions = accumulator.contributions(x, y);
                assert!(contributions.iter().all(|c| c.distance >= 0.0));
                let weights = falloff.normalize(contributions, AtmospherePoint::ZERO);
                let total: f64 = weights.iter().map(|(w, _)| *w).sum();
                assert!(
                    (total - 1.0).abs() < 1e-9,
                    "cell ({x}, {y}) weights sum to {total}"
                );
            }
        }
    }
}

#[test]
fn repeated_ticks_are_bit_identical() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let current = swirl(12, 8);
    let forcing = ForcingFields::uniform(12, 8, Wind::new(0.2, -0.1), 0.3, 0.6).unwrap();
    let cover = Grid::from_fn(12, 8, |x, y| {
        if (x + y) % 3 == 0 {
            LandCover::Forest
        } else {
            LandCover::Desert
        }
    })
    .unwrap();

    let (first, first_stats) = layer.update(&current, &forcing, &cover).unwrap();
    let (second, second_stats) = layer.update(&current, &forcing, &cover).unwrap();

    assert_eq!(first_stats, second_stats);
    for (a, b) in first.as_slice().iter().zip(second.as_slice()) {
        assert_eq!(a.wind.x.to_bits(), b.wind.x.to_bits());
        assert_eq!(a.wind.y.to_bits(), b.wind.y.to_bits());
        assert_eq!(a.temperature.to_bits(), b.temperature.to_bits());
        assert_eq!(a.wetness.to_bits(), b.wetness.to_bits());
    }
}

#[test]
fn parcel_blown_past_the_edge_does_not_wrap() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let mut current = Grid::filled(5, 5, AtmospherePoint::ZERO).unwrap();
    // Top-right corner blowing further right and up.
    current.set(4, 0, AtmospherePoint::new(Wind::new(1.0, -1.0), 1.0, 1.0));
    let forcing = ForcingFields::uniform(5, 5, Wind::CALM, 0.0, 0.0).unwrap();

    let (next, stats) = layer.update(&current, &forcing, &grassland(5, 5)).unwrap();

    assert!(stats.dropped >= layer.offsets().len());
    for y in 0..5 {
        assert_eq!(next[(0, y)].temperature, 0.0, "left edge row {y}");
        assert_eq!(next[(0, y)].wetness, 0.0, "left edge row {y}");
    }
    assert!(next
        .as_slice()
        .iter()
        .all(|point| point.temperature == 0.0 && point.wetness == 0.0));
}

#[test]
fn forest_damps_wind_by_exact_factor() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let current = Grid::filled(
        7,
        7,
        AtmospherePoint::new(Wind::new(0.3, 0.1), 1.0, 0.5),
    )
    .unwrap();
    let forcing = ForcingFields::uniform(7, 7, Wind::new(0.2, 0.0), 1.0, 0.5).unwrap();
    let open = grassland(7, 7);
    let mut wooded = open.clone();
    wooded.set(3, 3, LandCover::Forest);

    let (open_next, _) = layer.update(&current, &forcing, &open).unwrap();
    let (wooded_next, _) = layer.update(&current, &forcing, &wooded).unwrap();

    let damping = layer.params().forest_wind_damping;
    let open_cell = open_next[(3, 3)];
    let forest_cell = wooded_next[(3, 3)];
    assert_eq!(forest_cell.wind.x, open_cell.wind.x * damping);
    assert_eq!(forest_cell.wind.y, open_cell.wind.y * damping);
    assert!(forest_cell.wind.speed() <= open_cell.wind.speed());
    assert_eq!(forest_cell.temperature, open_cell.temperature);
    assert_eq!(forest_cell.wetness, open_cell.wetness);

    // Land cover only touches its own cell.
    assert_eq!(open_next[(2, 3)], wooded_next[(2, 3)]);
}

#[test]
fn calm_world_converges_toward_forcing() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let params = *layer.params();
    let (width, height) = (6, 5);
    let forcing_temperature = 12.0;
    let forcing_wetness = 0.4;
    let forcing = ForcingFields::uniform(
        width,
        height,
        Wind::CALM,
        forcing_temperature,
        forcing_wetness,
    )
    .unwrap();
    let cover = grassland(width, height);

    let initial = Grid::from_fn(width, height, |x, y| {
        AtmospherePoint::new(Wind::CALM, (x * 3 + y) as f64, (y as f64) * 0.2)
    })
    .unwrap();
    let initial_temperature_gap = initial
        .as_slice()
        .iter()
        .map(|p| (p.temperature - forcing_temperature).abs())
        .fold(0.0, f64::max);
    let initial_wetness_gap = initial
        .as_slice()
        .iter()
        .map(|p| (p.wetness - forcing_wetness).abs())
        .fold(0.0, f64::max);

    let mut current = initial;
    for n in 1..=12 {
        let (next, _) = layer.update(&current, &forcing, &cover).unwrap();
        let temperature_bound =
            initial_temperature_gap * params.temperature_retention.powi(n) + 1e-9;
        let wetness_bound = initial_wetness_gap * params.wetness_retention.powi(n) + 1e-9;
        for point in next.as_slice() {
            assert!((point.temperature - forcing_temperature).abs() <= temperature_bound);
            assert!((point.wetness - forcing_wetness).abs() <= wetness_bound);
            assert_eq!(point.wind, Wind::CALM);
        }
        current = next;
    }
}

#[test]
fn shape_mismatch_is_reported() {
    let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
    let current = Grid::filled(4, 4, AtmospherePoint::ZERO).unwrap();
    let forcing = ForcingFields::uniform(4, 5, Wind::CALM, 0.0, 0.0).unwrap();
    let err = layer
        .update(&current, &forcing, &grassland(4, 4))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "wind forcing grid is 4x5 but the atmosphere grid is 4x4"
    );
}

fn unit() -> impl Strategy<Value = f64> {
    -1.0f64..=1.0
}

fn unit_cell() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (unit(), unit(), unit(), unit())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unit_bounded_state_stays_bounded_over_ticks(
        cells in prop::collection::vec(unit_cell(), 30),
        forcing_cells in prop::collection::vec(unit_cell(), 30),
        forest_mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let layer = AtmosphereLayer::new(AtmosphereParams::default()).unwrap();
        let point = |(wx, wy, t, w): (f64, f64, f64, f64)| {
            AtmospherePoint::new(Wind::new(wx, wy), t, w)
        };
        let mut current =
            Grid::from_vec(6, 5, cells.into_iter().map(point).collect()).unwrap();
        let forcing = ForcingFields::new(
            Grid::from_vec(6, 5, forcing_cells.iter().map(|c| Wind::new(c.0, c.1)).collect()).unwrap(),
            Grid::from_vec(6, 5, forcing_cells.iter().map(|c| c.2).collect()).unwrap(),
            Grid::from_vec(6, 5, forcing_cells.iter().map(|c| c.3).collect()).unwrap(),
        ).unwrap();
        let cover = Grid::from_vec(
            6,
            5,
            forest_mask
                .into_iter()
                .map(|forest| if forest { LandCover::Forest } else { LandCover::Grass })
                .collect(),
        ).unwrap();

        let bound = 1.0 + 1e-9;
        for _ in 0..4 {
            let (next, _) = layer.update(&current, &forcing, &cover).unwrap();
            for p in next.as_slice() {
                prop_assert!(p.wind.x.abs() <= bound);
                prop_assert!(p.wind.y.abs() <= bound);
                prop_assert!(p.temperature.abs() <= bound);
                prop_assert!(p.wetness.abs() <= bound);
            }
            current = next;
        }
    }
}
