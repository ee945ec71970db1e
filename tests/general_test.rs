use jsontree::parse_named;
use miette::Report;
use std::fs;

#[test]
fn test_all_ok_files() {
    let tests_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/ok");
    let entries = fs::read_dir(tests_dir).expect("Failed to read tests directory");

    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            println!("Parsing file: {:?}", path);
            let source =
                fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read file: {:?}", path));

            if let Err(err) = parse_named(&source, &path.to_string_lossy()).into_result() {
                panic!("Failed to parse {:?}. Error: {:?}", path, Report::new(err));
            }
        }
    }
}

#[test]
fn test_all_bad_files_report_errors() {
    let tests_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/bad");
    let entries = fs::read_dir(tests_dir).expect("Failed to read tests directory");

    for entry in entries {
        let path = entry.expect("Failed to read directory entry").path();
        if path.extension().map_or(false, |ext| ext == "json") {
            let source = fs::read_to_string(&path).unwrap();
            let parsed = parse_named(&source, &path.to_string_lossy());
            assert!(!parsed.is_clean(), "{:?} should not parse cleanly", path);
        }
    }
}
