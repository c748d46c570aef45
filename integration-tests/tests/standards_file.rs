use approx::assert_relative_eq;
use integration_tests::{amps, fixture, load};
use uom::si::electric_current::ampere;
use wirecheck_compliance::{CircuitDesigner, DesignError, InstallationContext, design};
use wirecheck_core::Component;
use wirecheck_tables::{InstallationMethod, Insulation, Standards, TableError, TripCurve};

fn reduced() -> Standards {
    Standards::from_toml_file(fixture("reduced_ladder.toml")).unwrap()
}

#[test]
fn fixture_loads_and_validates() {
    let standards = reduced();

    assert_eq!(standards.name, "Reduced ladder");
    assert_eq!(standards.conductor_sizes().count(), 3);
    assert_eq!(
        standards.largest_device_rating().map(|rating| rating.get::<ampere>()),
        Some(32.0)
    );
    assert!(standards.conductors[0].thermosetting.a.is_none());
}

#[test]
fn short_ladder_falls_back_with_warnings() {
    let result = CircuitDesigner::new(reduced())
        .call(load(7360.0, 20.0))
        .unwrap();

    assert!(!result.success);
    assert_relative_eq!(result.size.mm2(), 4.0);
    assert_eq!(result.candidates_evaluated, 3);
    assert!(result.compliance.capacity_compliant());
    assert!(
        result
            .warnings
            .iter()
            .any(|warning| warning.starts_with("voltage drop"))
    );
}

#[test]
fn same_load_passes_on_the_built_in_tables() {
    let result = design(&Standards::bs7671(), &load(7360.0, 20.0)).unwrap();
    assert!(result.success);
}

#[test]
fn untabulated_curve_is_a_hard_error() {
    let err = design(&reduced(), &load(2300.0, 10.0).with_curve(TripCurve::C)).unwrap_err();
    assert!(matches!(
        err,
        DesignError::Table(TableError::UnsupportedDeviceRating {
            curve: TripCurve::C,
            ..
        })
    ));
}

#[test]
fn untabulated_method_leaves_nothing_to_evaluate() {
    let context = InstallationContext::default()
        .with_method(InstallationMethod::A)
        .with_insulation(Insulation::Thermosetting);
    let err = design(&reduced(), &load(2300.0, 10.0).with_context(context)).unwrap_err();
    assert!(matches!(
        err,
        DesignError::Table(TableError::UnsupportedConfiguration { .. })
    ));
}

#[test]
fn ratings_beyond_the_ladder_are_rejected() {
    let standards = reduced();
    assert!(standards.device_rating(amps(40.0)).is_err());
    assert_eq!(standards.next_device_rating(amps(33.0)), None);
}

#[test]
fn malformed_files_are_reported() {
    let text = std::fs::read_to_string(fixture("reduced_ladder.toml")).unwrap();

    let out_of_range = text.replacen("otherwise = 0.5", "otherwise = 1.5", 1);
    assert!(matches!(
        Standards::from_toml_str(&out_of_range),
        Err(TableError::Invalid { .. })
    ));

    assert!(matches!(
        Standards::from_toml_str("name = 1"),
        Err(TableError::Parse(_))
    ));

    assert!(matches!(
        Standards::from_toml_file(fixture("missing.toml")),
        Err(TableError::Io(_))
    ));
}

#[test]
fn built_in_tables_survive_a_toml_round_trip() {
    let standards = Standards::bs7671();
    let text = toml::to_string(&standards).unwrap();
    let reloaded = Standards::from_toml_str(&text).unwrap();

    assert_eq!(reloaded, standards);
    assert_eq!(
        design(&reloaded, &load(3680.0, 25.0)).unwrap(),
        design(&standards, &load(3680.0, 25.0)).unwrap()
    );
}
