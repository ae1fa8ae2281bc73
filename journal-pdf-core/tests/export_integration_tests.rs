//! End-to-end tests for the export pipeline
//!
//! Covers the documented scenarios plus structural checks on the produced
//! file: object numbering, reference resolution, cross-reference offsets,
//! determinism and concurrent use.

use journal_pdf::{render, render_with_config, wrap_line, LayoutConfig, PdfExport};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

/// Extracts the body of every content stream, in file order.
fn content_streams(pdf: &str) -> Vec<&str> {
    pdf.split("\nstream\n")
        .skip(1)
        .filter_map(|chunk| chunk.split("\nendstream").next())
        .collect()
}

/// Object numbers whose `<n> 0 obj` header appears in the file.
fn object_numbers(pdf: &str) -> Vec<u32> {
    pdf.lines()
        .filter_map(|line| line.strip_suffix(" 0 obj"))
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// Offsets listed in the cross-reference table, excluding the free entry.
fn xref_offsets(pdf: &str) -> Vec<usize> {
    let xref = &pdf[pdf.rfind("\nxref\n").unwrap() + 1..];
    let mut lines = xref.lines().skip(1);
    let header = lines.next().unwrap();
    let size: usize = header.split(' ').nth(1).unwrap().parse().unwrap();
    lines
        .skip(1)
        .take(size - 1)
        .map(|line| line[..10].parse().unwrap())
        .collect()
}

fn assert_well_formed(export: &PdfExport) {
    let pdf = &export.document;
    assert!(pdf.starts_with("%PDF-1.4\n"));
    assert!(pdf.ends_with("%%EOF"));
    assert!(pdf.is_ascii());
    assert!(export.page_count >= 1);

    let numbers = object_numbers(pdf);
    let expected: Vec<u32> = (1..=export.object_count as u32).collect();
    assert_eq!(numbers, expected);
    assert_eq!(export.object_count, 3 + 2 * export.page_count);

    let trailer_size = format!("<</Size {}/Root 1 0 R>>", export.object_count + 1);
    assert!(pdf.contains(&trailer_size));

    let offsets = xref_offsets(pdf);
    assert_eq!(offsets.len(), export.object_count);
    for (i, offset) in offsets.iter().enumerate() {
        let header = format!("{} 0 obj\n", i + 1);
        assert!(
            pdf[*offset..].starts_with(&header),
            "xref entry {} does not point at its object",
            i + 1
        );
    }

    let defined: HashSet<u32> = numbers.into_iter().collect();
    for (idx, _) in pdf.match_indices(" 0 R") {
        let start = pdf[..idx]
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|p| p + 1)
            .unwrap_or(0);
        let referenced: u32 = pdf[start..idx].parse().unwrap();
        assert!(defined.contains(&referenced), "dangling reference {referenced}");
    }

    for stream in content_streams(pdf) {
        assert!(stream.starts_with("BT\n"));
        assert!(stream.ends_with("ET"));
        assert_eq!(stream.matches("BT\n").count(), stream.matches("ET").count());
        let declared = format!("<</Length {}>>\nstream\n{}", stream.len(), stream);
        assert!(pdf.contains(&declared));
    }
}

#[test]
fn test_scenario_empty_input() {
    let export = render("");
    assert_eq!(export.page_count, 1);
    assert!(!export.truncated);
    assert_eq!(content_streams(&export.document), vec!["BT\n/F1 11 Tf\nET"]);
    assert_well_formed(&export);
}

#[test]
fn test_scenario_header_then_body() {
    let export = render("# Title\nBody line");
    assert_eq!(export.page_count, 1);
    assert!(!export.truncated);

    let streams = content_streams(&export.document);
    assert_eq!(streams.len(), 1);
    let stream = streams[0];

    let header_block = stream.find("/F1 14 Tf\n").unwrap();
    let title = stream.find("(Title) Tj").unwrap();
    let body_block = stream[title..].find("/F1 11 Tf\n").unwrap() + title;
    let body = stream.find("(Body line) Tj").unwrap();
    assert!(header_block < title && title < body_block && body_block < body);
    assert!(!stream.contains("# Title"));
    assert_well_formed(&export);
}

#[test]
fn test_scenario_page_ceiling() {
    let export = render(&"x\n".repeat(1000));
    assert_eq!(export.page_count, 20);
    assert!(export.truncated);

    let streams = content_streams(&export.document);
    assert_eq!(streams.len(), 20);
    assert!(streams.iter().all(|s| s.ends_with("\nET")));
    assert!(export.document.contains("/Count 20"));
    assert_well_formed(&export);
}

#[test]
fn test_scenario_unbroken_run() {
    let line: String = "abcdefghij".repeat(20);
    let segments = wrap_line(&line, 80);
    let lengths: Vec<usize> = segments.iter().map(String::len).collect();
    assert_eq!(lengths, vec![80, 80, 40]);
    assert_eq!(segments.concat(), line);

    let export = render(&line);
    let stream = content_streams(&export.document)[0].to_string();
    for segment in &segments {
        assert!(stream.contains(&format!("({segment}) Tj")));
    }
    assert_well_formed(&export);
}

#[test]
fn test_page_tree_lists_pages_in_order() {
    let export = render(&"line\n".repeat(130));
    assert_eq!(export.page_count, 3);
    assert!(export.document.contains("/Kids [5 0 R 7 0 R 9 0 R]/Count 3"));
    assert!(export.document.contains("/Contents 4 0 R"));
    assert!(export.document.contains("/Contents 8 0 R"));
    assert!(export.document.contains("/MediaBox [0 0 595 842]"));
    assert!(export.document.contains("/Resources <</Font <</F1 3 0 R>>>>"));
    assert!(export
        .document
        .contains("3 0 obj\n<</Type /Font/Subtype /Type1/BaseFont /Helvetica>>\nendobj\n"));
    assert_well_formed(&export);
}

#[test]
fn test_non_ascii_and_reserved_characters() {
    let export = render("Café (naïve) \\ “quotes” 🎴");
    let stream = content_streams(&export.document)[0].to_string();
    assert!(stream.contains("(Caf? \\(na?ve\\) \\\\ ?quotes? ?) Tj"));
    assert_well_formed(&export);
}

#[test]
fn test_output_is_deterministic() {
    let text = "# Reading\n\nThe Tower, reversed.\n".repeat(40);
    let first = render(&text);
    let second = render(&text);
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_exports_do_not_interfere() {
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("# Entry {i}\n{}", "word ".repeat(300 * (i + 1))))
        .collect();
    let expected: Vec<PdfExport> = inputs.iter().map(|t| render(t)).collect();

    let results: Vec<PdfExport> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| scope.spawn(move || render(text)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
}

#[test]
fn test_custom_ceiling() {
    let config = LayoutConfig::default().with_max_pages(2);
    let export = render_with_config(&"x\n".repeat(200), &config);
    assert_eq!(export.page_count, 2);
    assert!(export.truncated);
    assert_well_formed(&export);
}

#[test]
fn test_crlf_input_matches_lf_input() {
    let lf = render("# Title\nbody\n\nmore");
    let crlf = render("# Title\r\nbody\r\n\r\nmore");
    assert_eq!(lf, crlf);
}

#[test]
fn test_headers_only_for_literal_prefixes() {
    let export = render("#NoSpace\n#### Deep\n## Real");
    let stream = content_streams(&export.document)[0].to_string();
    assert!(stream.contains("(#NoSpace) Tj"));
    assert!(stream.contains("(#### Deep) Tj"));
    assert!(stream.contains("(Real) Tj"));
    assert_eq!(stream.matches("/F1 14 Tf").count(), 1);
}

#[test]
fn test_header_dense_input() {
    let text = vec!["# h"; 50].join("\n");
    let export = render(&text);
    assert_eq!(export.page_count, 2);
    assert!(!export.truncated);

    let streams = content_streams(&export.document);
    // First header sits one line below the top; the last one on the page
    // stays above the bottom margin.
    assert!(streams[0].contains("/F1 14 Tf\n50 736 Td\n(h) Tj"));
    assert!(streams[0].contains("/F1 14 Tf\n50 64 Td\n(h) Tj"));
    assert_eq!(streams[0].matches("(h) Tj").count(), 33);
    assert_eq!(streams[1].matches("(h) Tj").count(), 17);
    assert_well_formed(&export);
}
