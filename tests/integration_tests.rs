use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Run the toolview binary with the given args and optional stdin
fn run_toolview(args: &[&str], stdin: Option<&str>) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_toolview"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut pipe) = child.stdin.take() {
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes())
                .map_err(|e| format!("Failed to write to stdin: {}", e))?;
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_text(args: &[&str]) -> String {
    let mut full = vec!["--format", "text"];
    full.extend_from_slice(args);
    let out = run_toolview(&full, None).expect("toolview failed");
    String::from_utf8(out).expect("text output is not UTF-8")
}

#[test]
fn test_end_to_end_simple_bar() {
    let text = run_text(&["chart", "test/simple_bar.json"]);
    assert!(text.starts_with("Revenue by Region\nQuarterly revenue in USD\n[bar, vertical]\n"));
    assert!(text.contains("  North: revenue=1,200\n"));
    assert!(text.contains("  South: revenue=950.5\n"));
    assert!(text.contains("  West: revenue=4,300\n"));
    assert!(!text.contains("Legend:"));
}

#[test]
fn test_end_to_end_chart_from_stdin() {
    let spec = fs::read_to_string("test/simple_bar.json").expect("Failed to read test spec");
    let out = run_toolview(&["--format", "text", "chart"], Some(&spec)).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Revenue by Region\n"));
}

#[test]
fn test_end_to_end_stacked_groups() {
    let text = run_text(&["chart", "test/stacked_groups.json"]);
    assert!(text.contains("  Q1: web=10 (digital), mobile=5 (digital), store=7 (retail)\n"));
    assert!(text.contains("Legend: Web | Mobile | Store\n"));
}

#[test]
fn test_end_to_end_donut_total() {
    let text = run_text(&["chart", "test/donut_total.json"]);
    assert!(text.contains("[donut]\n"));
    assert!(text.contains("  Solar: 1,500"));
    assert!(text.contains("  Total: 5,000\n"));
}

#[test]
fn test_end_to_end_unsupported_chart() {
    let text = run_text(&["chart", "test/unsupported.json"]);
    assert_eq!(text, "Unsupported chart type: sankey\n");
}

#[test]
fn test_end_to_end_csv_data_replaces_rows() {
    let spec = r#"{ "type": "bar", "title": "GDP", "legend": false }"#;
    let out = run_toolview(
        &["--format", "text", "chart", "--data", "test/gdp.csv"],
        Some(spec),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  Services: gdp=9,800\n"));
    assert!(text.contains("  Agriculture: gdp=760\n"));
}

#[test]
fn test_end_to_end_invalid_chart_json() {
    let result = run_toolview(&["chart"], Some("{ not json"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to parse chart spec JSON"));
}

#[test]
fn test_end_to_end_missing_file() {
    let result = run_toolview(&["chart", "test/does_not_exist.json"], None);
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_unknown_tool() {
    let text = run_text(&["tool", "test/call_unknown.json"]);
    assert!(text.starts_with("[error] Tool: \"weather_view\" doesn't exist.\n"));
}

#[test]
fn test_end_to_end_loading_tool() {
    let text = run_text(&["tool", "test/call_loading.json"]);
    assert_eq!(
        text,
        "[in progress] (live) Loading Images...\n  Fetching image information...\n"
    );
}

#[test]
fn test_end_to_end_invalid_arguments() {
    let text = run_text(&["tool", "test/call_invalid.json"]);
    assert_eq!(
        text,
        "[error] Invalid data for tool.\n  The data received is malformed.\n"
    );
}

#[test]
fn test_end_to_end_error_call_renders_nothing() {
    let text = run_text(&["tool", "test/call_error.json"]);
    assert!(text.is_empty());

    let text = run_text(&["tool", "test/call_error.json", "--surface-errors"]);
    assert!(text.starts_with("[error] Operation failed\n"));
}

#[test]
fn test_end_to_end_status_tool() {
    let text = run_text(&["tool", "test/call_status.json"]);
    assert_eq!(text, "[completed] Order placed\n  Confirmation sent\n");
}

#[test]
fn test_end_to_end_status_svg() {
    let out = run_toolview(&["--format", "svg", "tool", "test/call_status.json"], None).unwrap();
    let svg = String::from_utf8(out).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn test_end_to_end_products_tool() {
    let text = run_text(&["tool", "test/call_products.json"]);
    assert!(text.starts_with("[carousel: 2 products"));
    assert!(text.contains("- Ceramic Mug\n"));
    assert!(text.contains("$9.99"));
    assert!(text.contains("40 units"));
    assert!(text.contains("  800 ml glass\n"));
}

#[test]
fn test_end_to_end_images_tool() {
    let text = run_text(&["tool", "test/call_images.json"]);
    assert!(text.starts_with("[images: 5]\n"));
    assert!(text.contains("- https://images.example.com/a.jpg First [1 / 5]\n"));
    assert!(text.contains("[+1 more]"));
    assert!(!text.contains("e.jpg"));
}

#[test]
fn test_end_to_end_list_tools() {
    let out = run_toolview(&["tools"], None).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "chart_view\nimage_view\nproduct_view\nstatus_view\n"
    );
}

#[test]
fn test_end_to_end_showcase_final() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_str().unwrap();
    let out = run_toolview(
        &["--format", "text", "showcase", "--tools", "status_view", "--out", out_dir],
        None,
    )
    .unwrap();
    let report = String::from_utf8(out).unwrap();
    assert!(report.starts_with("Analysis complete - 3 status updates generated\n"));

    let written = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(written, 3);

    let first = fs::read_to_string(dir.path().join("01-order-placed.txt")).unwrap();
    assert!(first.starts_with("[completed] Order placed\n"));
}

#[test]
fn test_end_to_end_showcase_mid_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_str().unwrap();
    let out = run_toolview(
        &[
            "--format", "text", "showcase", "--tools", "image_view,product_view", "--at", "1600",
            "--out", out_dir,
        ],
        None,
    )
    .unwrap();
    let report = String::from_utf8(out).unwrap();
    assert!(report.starts_with("Generating items... (2/4)\n"));

    // second item revealed at 1500ms is still loading
    let second = fs::read_to_string(dir.path().join("02-image-pair.txt")).unwrap();
    assert!(second.starts_with("[in progress] (live) Loading Images...\n"));
    let first = fs::read_to_string(dir.path().join("01-image-gallery.txt")).unwrap();
    assert!(first.starts_with("[in progress]"));
}

#[test]
fn test_end_to_end_showcase_unknown_selection() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_str().unwrap();
    let result = run_toolview(&["showcase", "--tools", "bogus", "--out", out_dir], None);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Available tools: chart_view"));
}
