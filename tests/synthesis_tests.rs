use curvestat::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn float_curve(samples: &[(f64, f64)]) -> String {
    let keys: Vec<_> = samples
        .iter()
        .map(|(t, v)| json!({ "Time": t, "Value": v }))
        .collect();
    json!([{ "FloatCurves": [{ "Keys": keys }] }]).to_string()
}

fn setup() -> (TempDir, StatCatalog) {
    let root = TempDir::new().unwrap();
    let species = root.path().join("Allosaurus");
    write(
        &species.join("DT_AllosaurusBalanceAttributes.json"),
        &json!([{ "Rows": {
            "Health": { "AttributePercentageValues": 900 },
            "AttackPower_Base": { "AttributePercentageValues": 120 },
            "Damage.Claw": { "AttributePercentageValues": "80" },
            "Damage.Tail": { "AttributePercentageValues": 0 }
        } }])
        .to_string(),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_AttackPower.json"),
        &float_curve(&[(0.0, 0.25), (1.0, 1.0)]),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Bite_AttackPower.json"),
        &float_curve(&[(0.0, 0.5), (0.5, 0.8), (1.0, 1.0)]),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Stamina.json"),
        &float_curve(&[(0.5, 100.0)]),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Tail_AttackPower.json"),
        &float_curve(&[(0.0, 0.5), (1.0, 1.0)]),
    );
    let catalog = StatCatalog::new(root.path());
    (root, catalog)
}

fn values(curve: &VirtualCurve) -> Vec<(f64, f64)> {
    curve.series[0]
        .curve
        .samples()
        .iter()
        .map(|s| (s.growth, s.value))
        .collect()
}

#[test]
fn test_allosaurus_bite_damage() {
    let (_root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    let bite = catalog
        .synthesize(&allo, "BalanceAttributes", "Bite_AttackPower")
        .unwrap();
    assert_eq!(values(&bite), [(0.0, 60.0), (0.5, 96.0), (1.0, 120.0)]);
    assert_eq!(bite.name, "Bite_AttackPower");
    assert_eq!(bite.display_name, "Bite Attack");
    assert_eq!(bite.provenance.field, "AttackPower_Base");
    assert_eq!(bite.provenance.base, 120.0);
    assert_eq!(bite.provenance.formula.to_string(), "base × curve(growth)");

    let view = PlotView::from_virtual(&bite, catalog.config());
    assert_eq!(view.y_label, "Damage");
    assert_eq!(view.markers, [0.75]);
}

#[test]
fn test_one_base_feeds_several_attacks() {
    let (_root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    let bite = catalog
        .synthesize(&allo, "BalanceAttributes", "Bite_AttackPower")
        .unwrap();
    let tail = catalog
        .synthesize(&allo, "BalanceAttributes", "Tail_AttackPower")
        .unwrap();
    assert_eq!(bite.provenance.field, tail.provenance.field);
    assert_eq!(tail.display_name, "Tail Attack");
    assert_eq!(values(&tail), [(0.0, 60.0), (1.0, 120.0)]);
    assert_ne!(bite, tail);
}

#[test]
fn test_synthesis_is_deterministic() {
    let (root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    let first = catalog
        .synthesize(&allo, "BalanceAttributes", "AttackPower")
        .unwrap();
    let second = catalog
        .synthesize(&allo, "BalanceAttributes", "AttackPower")
        .unwrap();
    let mut fresh = StatCatalog::new(root.path());
    let third = fresh
        .synthesize(&allo, "BalanceAttributes", "AttackPower")
        .unwrap();

    let bits = |c: &VirtualCurve| -> Vec<(u64, u64)> {
        values(c)
            .iter()
            .map(|(g, v)| (g.to_bits(), v.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
    assert_eq!(bits(&first), bits(&third));
}

#[test]
fn test_best_field_and_explicit_field() {
    let (_root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    // The generic base matches the generic curve exactly.
    let generic = catalog
        .synthesize(&allo, "BalanceAttributes", "AttackPower")
        .unwrap();
    assert_eq!(generic.provenance.field, "AttackPower_Base");
    assert_eq!(generic.display_name, "Attack Power");
    assert_eq!(values(&generic), [(0.0, 30.0), (1.0, 120.0)]);

    let claw = catalog
        .synthesize_field(&allo, "BalanceAttributes", "Damage.Claw", "AttackPower")
        .unwrap();
    assert_eq!(values(&claw), [(0.0, 20.0), (1.0, 80.0)]);
    assert_eq!(claw.name, "Claw_AttackPower");
    assert_eq!(claw.display_name, "Claw Attack");

    let err = catalog
        .synthesize_field(&allo, "BalanceAttributes", "Health", "AttackPower")
        .unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn test_unavailable_combinations() {
    let (_root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    // A zero damage row is not a base field.
    let err = catalog
        .synthesize_field(&allo, "BalanceAttributes", "Damage.Tail", "Tail_AttackPower")
        .unwrap_err();
    assert!(matches!(err, StatError::SynthesisUnavailable { .. }));

    // Single-sample curve is not plottable.
    let err = catalog
        .synthesize(&allo, "BalanceAttributes", "Stamina")
        .unwrap_err();
    assert!(err.is_unavailable());

    let err = catalog
        .synthesize(&allo, "BalanceAttributes", "Bite_Claw")
        .unwrap_err();
    assert!(matches!(err, StatError::NotFound { .. }));
}

#[test]
fn test_virtual_candidates_listing() {
    let (_root, mut catalog) = setup();
    let allo = SpeciesId::new("Allosaurus");

    let pairs: Vec<(String, String, MatchRank)> = catalog
        .virtual_candidates(&allo)
        .unwrap()
        .into_iter()
        .map(|c| (c.field, c.curve, c.rank))
        .collect();
    let expected = [
        ("AttackPower_Base", "AttackPower", MatchRank::Exact),
        ("AttackPower_Base", "Bite_AttackPower", MatchRank::Shared(1)),
        ("AttackPower_Base", "Tail_AttackPower", MatchRank::Shared(1)),
        ("Damage.Claw", "AttackPower", MatchRank::Partial(1)),
    ];
    assert_eq!(pairs.len(), expected.len());
    for ((field, curve, rank), (f, c, r)) in pairs.iter().zip(expected) {
        assert_eq!((field.as_str(), curve.as_str(), *rank), (f, c, r));
    }

    // Virtual curves are never added to the catalog.
    assert_eq!(catalog.list(&allo).unwrap().len(), 5);
}
