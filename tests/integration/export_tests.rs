//! Integration tests for result export
//!
//! These tests write result sets into temporary folders in every supported
//! format and check the files that land on disk.

use site_gleaner::output::{export_results, load_json_results, ExportFormat};
use site_gleaner::storage::{ImageEntry, ResultSet, TextRecord};
use site_gleaner::ExportError;
use tempfile::TempDir;

fn sample_results() -> ResultSet {
    ResultSet {
        text: vec![
            TextRecord {
                url: "http://x/".to_string(),
                title: "X".to_string(),
                description: "An example".to_string(),
                content: "abc".to_string(),
            },
            TextRecord {
                url: "http://x/rust".to_string(),
                title: String::new(),
                description: String::new(),
                content: "Rust is here".to_string(),
            },
        ],
        images: vec![ImageEntry {
            image_url: "http://x/logo.png".to_string(),
            extracted_text: Some("LOGO".to_string()),
        }],
        videos: vec!["http://x/intro.mp4".to_string()],
    }
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let results = ResultSet {
        text: vec![TextRecord {
            url: "http://x/".to_string(),
            title: String::new(),
            description: String::new(),
            content: "abc".to_string(),
        }],
        ..ResultSet::default()
    };

    let path = export_results(&results, dir.path(), "json", None).expect("Export failed");
    assert_eq!(path, dir.path().join("scraped_data.json"));

    let reloaded = load_json_results(&path).expect("Reload failed");
    assert_eq!(reloaded, results);
    assert_eq!(reloaded.text[0].url, "http://x/");
    assert_eq!(reloaded.text[0].content, "abc");
}

#[test]
fn test_bogus_format_reports_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let folder = dir.path().join("results");
    let results = sample_results();
    let before = results.clone();

    let err = export_results(&results, &folder, "bogus", None).unwrap_err();

    assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "bogus"));
    assert_eq!(results, before);
    assert!(!folder.exists());
}

#[test]
fn test_every_format_writes_scraped_data_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let results = sample_results();

    for format in ExportFormat::ALL {
        let path = export_results(&results, dir.path(), format.extension(), None)
            .unwrap_or_else(|e| panic!("{} export failed: {}", format, e));

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(format!("scraped_data.{}", format.extension()).as_str())
        );
        let size = std::fs::metadata(&path).expect("Missing export").len();
        assert!(size > 0, "{} export is empty", format);
    }
}

#[test]
fn test_existing_folder_reused() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let folder = dir.path().join("results");
    std::fs::create_dir(&folder).expect("Failed to create folder");
    std::fs::write(folder.join("notes.txt"), "keep me").expect("Failed to write file");

    export_results(&sample_results(), &folder, "txt", None).expect("First export failed");
    export_results(&sample_results(), &folder, "csv", None).expect("Second export failed");

    assert_eq!(
        std::fs::read_to_string(folder.join("notes.txt")).unwrap(),
        "keep me"
    );
    assert!(folder.join("scraped_data.txt").exists());
    assert!(folder.join("scraped_data.csv").exists());
}

#[test]
fn test_keyword_filters_text_in_txt_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let path = export_results(&sample_results(), dir.path(), "TXT", Some("rust"))
        .expect("Export failed");
    let written = std::fs::read_to_string(path).expect("Failed to read export");

    assert!(written.contains("URL: http://x/rust\nContent: Rust is here"));
    assert!(!written.contains("Content: abc"));
    assert!(written.contains("--- IMAGES ---\nURL: http://x/logo.png\nContent: LOGO"));
    assert!(written.contains("--- VIDEOS ---\nURL: http://x/intro.mp4"));
}

#[test]
fn test_csv_export_layout() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let path = export_results(&sample_results(), dir.path(), "csv", None).expect("Export failed");
    let written = std::fs::read_to_string(path).expect("Failed to read export");
    let lines: Vec<&str> = written.lines().collect();

    assert_eq!(lines[0], "Section,URL,Content");
    assert_eq!(lines[1], "text,http://x/,abc");
    assert_eq!(lines[3], "images,http://x/logo.png,LOGO");
    assert_eq!(lines[4], "videos,http://x/intro.mp4,");
}
