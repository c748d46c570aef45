//! Built-in BS 7671 data set.
//!
//! Copper conductors, single-phase circuits of two single-core or one
//! two-core cable. Capacities follow Tables 4D1A (70 °C thermoplastic) and
//! 4E1A (90 °C thermosetting) for reference methods A, B and C. Voltage drop
//! constants follow Table 4D1B. Maximum loop impedances are for a 0.4 s
//! disconnection at `Cmin = 1.0`.

use crate::{
    Band, BandTable, ConductorData, EarthFaultRules, MagneticMultipliers, MaxZsRow,
    MethodCapacities, SelectivityRules, Standards, VoltageDropLimits,
};

/// `(size mm², thermoplastic [A, B, C], thermosetting [A, B, C], mV/A/m, mΩ/m at 20 °C)`
const CONDUCTORS: [(f64, [f64; 3], [f64; 3], f64, f64); 12] = [
    (1.5, [14.5, 17.5, 19.5], [19.0, 23.0, 27.0], 29.0, 12.10),
    (2.5, [19.5, 24.0, 27.0], [26.0, 31.0, 37.0], 18.0, 7.41),
    (4.0, [26.0, 32.0, 36.0], [35.0, 42.0, 51.0], 11.0, 4.61),
    (6.0, [34.0, 41.0, 46.0], [45.0, 54.0, 65.0], 7.3, 3.08),
    (10.0, [46.0, 57.0, 63.0], [61.0, 75.0, 87.0], 4.4, 1.83),
    (16.0, [61.0, 76.0, 85.0], [81.0, 100.0, 115.0], 2.8, 1.15),
    (25.0, [80.0, 101.0, 112.0], [106.0, 133.0, 149.0], 1.75, 0.727),
    (35.0, [99.0, 125.0, 138.0], [131.0, 164.0, 185.0], 1.25, 0.524),
    (50.0, [119.0, 151.0, 168.0], [158.0, 198.0, 225.0], 0.93, 0.387),
    (70.0, [151.0, 192.0, 213.0], [200.0, 253.0, 289.0], 0.64, 0.268),
    (95.0, [182.0, 232.0, 258.0], [241.0, 306.0, 352.0], 0.46, 0.193),
    (120.0, [210.0, 269.0, 299.0], [278.0, 354.0, 410.0], 0.37, 0.153),
];

const DEVICE_RATINGS: [f64; 12] = [
    6.0, 10.0, 16.0, 20.0, 25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0,
];

/// `(rating A, [B, C, D] Ω)`
const MAX_ZS: [(f64, [f64; 3]); 12] = [
    (6.0, [7.67, 3.83, 1.92]),
    (10.0, [4.60, 2.30, 1.15]),
    (16.0, [2.87, 1.44, 0.72]),
    (20.0, [2.30, 1.15, 0.57]),
    (25.0, [1.84, 0.92, 0.46]),
    (32.0, [1.44, 0.72, 0.36]),
    (40.0, [1.15, 0.57, 0.29]),
    (50.0, [0.92, 0.46, 0.23]),
    (63.0, [0.73, 0.36, 0.18]),
    (80.0, [0.57, 0.29, 0.14]),
    (100.0, [0.46, 0.23, 0.11]),
    (125.0, [0.37, 0.18, 0.09]),
];

/// `(ambient °C upper bound, Ca)`
const TEMPERATURE_BANDS: [(f64, f64); 6] = [
    (25.0, 1.0),
    (30.0, 0.94),
    (35.0, 0.87),
    (40.0, 0.79),
    (45.0, 0.71),
    (50.0, 0.61),
];

/// `(circuit count upper bound, Cg)`
const GROUPING_BANDS: [(f64, f64); 5] = [(1.0, 1.0), (2.0, 0.8), (3.0, 0.7), (6.0, 0.65), (9.0, 0.6)];

fn capacities([a, b, c]: [f64; 3]) -> MethodCapacities {
    MethodCapacities {
        a: Some(a),
        b: Some(b),
        c: Some(c),
    }
}

fn bands(rows: &[(f64, f64)], otherwise: f64) -> BandTable {
    BandTable {
        bands: rows
            .iter()
            .map(|&(up_to, factor)| Band { up_to, factor })
            .collect(),
        otherwise,
    }
}

pub(crate) fn standards() -> Standards {
    Standards {
        name: "BS 7671:2018".to_owned(),
        conductors: CONDUCTORS
            .iter()
            .map(
                |&(size, thermoplastic, thermosetting, mv, resistance)| ConductorData {
                    size,
                    thermoplastic: capacities(thermoplastic),
                    thermosetting: capacities(thermosetting),
                    mv_per_amp_metre: Some(mv),
                    resistance: Some(resistance),
                },
            )
            .collect(),
        device_ratings: DEVICE_RATINGS.to_vec(),
        temperature_factors: bands(&TEMPERATURE_BANDS, 0.5),
        grouping_factors: bands(&GROUPING_BANDS, 0.5),
        max_zs: MAX_ZS
            .iter()
            .map(|&(rating, [b, c, d])| MaxZsRow {
                rating,
                b: Some(b),
                c: Some(c),
                d: Some(d),
            })
            .collect(),
        magnetic_multipliers: MagneticMultipliers {
            b: 5.0,
            c: 10.0,
            d: 20.0,
            fuse: 8.0,
            mccb: 10.0,
        },
        voltage_drop_limits: VoltageDropLimits {
            lighting: 3.0,
            other: 5.0,
        },
        selectivity: SelectivityRules {
            min_ratio: 1.6,
            overload_factor: 1.45,
            time_margin: 0.1,
            magnetic_time: 0.01,
            thermal_time: 5.0,
            upstream_limit_factor: 0.8,
            downstream_limit_factor: 2.5,
            marginal_limit_fraction: 0.9,
        },
        earth_fault: EarthFaultRules {
            disconnection_time: 0.4,
            operating_temperature_factor: 1.2,
        },
    }
}
