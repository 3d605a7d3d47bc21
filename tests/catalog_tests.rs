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

/// A species folder the way the exporter lays it out.
fn allosaurus() -> TempDir {
    let root = TempDir::new().unwrap();
    let species = root.path().join("Allosaurus");
    write(
        &species.join("DT_AllosaurusBalanceAttributes.json"),
        &json!([{ "Rows": {
            "Health": { "AttributePercentageValues": 900 },
            "AttackPower_Base": { "AttributePercentageValues": 120 },
            "Diet": { "AttributePercentageValues": "Carnivore" }
        } }])
        .to_string(),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Bite_AttackPower.json"),
        &float_curve(&[(0.0, 0.5), (0.5, 0.8), (1.0, 1.0)]),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_RunSpeed.json"),
        &json!([
            { "Growth": 0.0, "Senior": 500, "Elder": 450 },
            { "Growth": 0.5, "Senior": 800, "Elder": 700 },
            { "Growth": 1.0, "Senior": 1000, "Elder": 900 }
        ])
        .to_string(),
    );
    root
}

#[test]
fn test_malformed_file_does_not_block_species() {
    let root = TempDir::new().unwrap();
    let species = root.path().join("Allosaurus");
    write(
        &species.join("DT_AllosaurusBalanceAttributes.json"),
        r#"{ "Health": 900 }"#,
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Stamina.json"),
        &float_curve(&[(0.0, 100.0), (1.0, 200.0)]),
    );
    write(
        &species.join("Attributes/ATT_Allosaurus_Weight.json"),
        r#"[{ "FloatCurves": [{ "Keys": [ { "Time": 0.0, "#,
    );

    let mut catalog = StatCatalog::new(root.path());
    let allo = SpeciesId::new("Allosaurus");

    let names: Vec<String> = catalog
        .list(&allo)
        .unwrap()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, ["BalanceAttributes", "Stamina"]);

    let loaded = catalog.load(&allo).unwrap();
    assert_eq!(loaded.skipped().len(), 1);
    assert!(matches!(
        loaded.skipped()[0].error,
        StatError::MalformedDocument { .. }
    ));
}

#[test]
fn test_unknown_shape_skipped() {
    let root = allosaurus();
    write(&root.path().join("Allosaurus/notes.json"), "[1, 2, 3]");

    let mut catalog = StatCatalog::new(root.path());
    let loaded = catalog.load(&SpeciesId::new("Allosaurus")).unwrap();
    assert_eq!(loaded.entries().len(), 3);
    assert!(matches!(
        loaded.skipped()[0].error,
        StatError::UnknownShape { .. }
    ));
}

#[test]
fn test_load_is_idempotent() {
    let root = allosaurus();
    let allo = SpeciesId::new("Allosaurus");

    let mut catalog = StatCatalog::new(root.path());
    let first = catalog.load(&allo).unwrap().clone();
    let second = catalog.load(&allo).unwrap();
    assert_eq!(&first, second);
    assert_eq!(second.entries().len(), 3);

    // A fresh load from disk gives the same entries.
    let mut fresh = StatCatalog::new(root.path());
    assert_eq!(&first, fresh.load(&allo).unwrap());
}

#[test]
fn test_table_rows_keep_declaration_order() {
    let root = allosaurus();
    let mut catalog = StatCatalog::new(root.path());
    let allo = SpeciesId::new("Allosaurus");

    let table = catalog
        .get(&allo, "BalanceAttributes")
        .unwrap()
        .as_table()
        .unwrap()
        .clone();
    let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Health", "AttackPower_Base", "Diet"]);
    assert_eq!(table.get("Diet"), Some(&RowValue::Text("Carnivore".into())));

    let view = TableView::from_table(&table);
    assert_eq!(view.title, "Balance Attributes");
    assert_eq!(view.rows[0], ("Health".to_string(), "900".to_string()));
}

#[test]
fn test_duplicate_growth_keeps_last_declaration() {
    let root = TempDir::new().unwrap();
    write(
        &root
            .path()
            .join("Allosaurus/Attributes/ATT_Allosaurus_Stamina.json"),
        r#"[
            { "Growth": 0.0, "Value": 10 },
            { "Growth": 0.3, "Value": 10 },
            { "Growth": 0.3, "Value": 15 },
            { "Growth": 1.0, "Value": 20 }
        ]"#,
    );

    let mut catalog = StatCatalog::new(root.path());
    let curve = catalog
        .get(&SpeciesId::new("Allosaurus"), "Stamina")
        .unwrap()
        .as_curve()
        .unwrap()
        .primary()
        .unwrap()
        .clone();

    let growths: Vec<f64> = curve.samples().iter().map(|s| s.growth).collect();
    assert_eq!(growths, [0.0, 0.3, 1.0]);
    assert_eq!(curve.value_at(0.3).unwrap(), 15.0);
}

#[test]
fn test_multi_series_curve() {
    let root = allosaurus();
    let mut catalog = StatCatalog::new(root.path());
    let allo = SpeciesId::new("Allosaurus");

    let speed = catalog
        .get(&allo, "RunSpeed")
        .unwrap()
        .as_curve()
        .unwrap()
        .clone();
    let labels: Vec<&str> = speed.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Senior", "Elder"]);
    assert_eq!(speed.series("Elder").unwrap().value_at(1.0).unwrap(), 900.0);

    let view = PlotView::from_curve(&speed, catalog.config()).unwrap();
    assert_eq!(view.title, "Run Speed");
    assert_eq!(view.series.len(), 2);
    assert!((view.series[0].points[2].value - 36.0).abs() < 1e-9);
}

#[test]
fn test_config_file_drives_catalog() {
    let root = allosaurus();
    let config_file = root.path().join("curvestat.json");
    write(&config_file, r#"{ "hide_linear_curves": true }"#);
    write(
        &root
            .path()
            .join("Allosaurus/Attributes/ATT_Allosaurus_Stamina.json"),
        &float_curve(&[(0.0, 100.0), (1.0, 200.0)]),
    );

    let config = CatalogConfig::from_path(&config_file).unwrap();
    let mut catalog = StatCatalog::with_config(root.path(), config);
    let names: Vec<String> = catalog
        .list(&SpeciesId::new("Allosaurus"))
        .unwrap()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, ["BalanceAttributes", "Bite_AttackPower", "RunSpeed"]);
}
