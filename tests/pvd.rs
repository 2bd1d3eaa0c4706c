use vtu::PvdWriter;

#[test]
fn saved_collection_indexes_the_series() {
    let path = std::env::temp_dir().join("vtu_collection_test.pvd");
    let _ = std::fs::remove_file(&path);

    let mut collection = PvdWriter::new(&path);
    for step in 0..3 {
        collection.add_step(step as f64 * 0.1, format!("series_{step:03}.vtu"));
    }
    collection.save().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("type=\"Collection\""));
    assert_eq!(text.matches("<DataSet ").count(), 3);
    assert!(text.contains("file=\"series_002.vtu\""));

    // steps appear in insertion order
    let a = text.find("series_000.vtu").unwrap();
    let b = text.find("series_001.vtu").unwrap();
    let c = text.find("series_002.vtu").unwrap();
    assert!(a < b && b < c);

    let _ = std::fs::remove_file(&path);
}
