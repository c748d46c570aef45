use integration_tests::load;
use uom::si::{electric_potential::volt, f64::ElectricPotential};
use wirecheck_compliance::{CircuitDesigner, InstallationContext, design, design_batch};
use wirecheck_tables::{LoadCategory, PhaseConfig, Standards};

fn board() -> Vec<wirecheck_compliance::DesignRequest> {
    let sockets = InstallationContext::default().with_category(LoadCategory::Other);
    let three_phase = sockets
        .with_voltage(ElectricPotential::new::<volt>(400.0))
        .with_phases(PhaseConfig::Three);

    vec![
        load(460.0, 12.0),
        load(7360.0, 20.0),
        load(7360.0, 20.0).with_context(sockets),
        load(9200.0, 35.0).with_context(sockets),
        load(-100.0, 10.0),
        load(22_000.0, 40.0).with_context(three_phase),
        load(40_000.0, 10.0),
    ]
}

#[test]
fn batch_matches_sequential_designs_in_order() {
    let standards = Standards::bs7671();
    let requests = board();

    let parallel = design_batch(&standards, &requests);

    assert_eq!(parallel.len(), requests.len());
    for (request, result) in requests.iter().zip(parallel) {
        let sequential = design(&standards, request);
        match (result, sequential) {
            (Ok(parallel), Ok(sequential)) => assert_eq!(parallel, sequential),
            (Err(_), Err(_)) => {}
            (parallel, sequential) => {
                panic!("batch and sequential disagree: {parallel:?} vs {sequential:?}")
            }
        }
    }
}

#[test]
fn batch_outcomes_are_flagged_per_circuit() {
    let results = CircuitDesigner::default().call_batch(&board());

    assert!(results[0].as_ref().unwrap().success);
    assert!(results[4].is_err());
    assert!(!results[6].as_ref().unwrap().success);
}

#[test]
fn results_serialize_to_json() {
    let result = design(&Standards::bs7671(), &load(7360.0, 20.0)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["size"], 6.0);
    assert_eq!(json["curve"], "B");
    assert_eq!(json["compliance"]["overall_compliant"], true);
    assert!(json["regulations"].as_array().unwrap().len() > 1);
}
