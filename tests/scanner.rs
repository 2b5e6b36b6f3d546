use incdeps::core::scanner::{scan_bytes, RawInclude, ScanOptions};

fn scan(src: &str) -> Vec<(String, bool)> {
    scan_bytes(src.as_bytes(), &ScanOptions::default())
        .includes
        .into_iter()
        .map(|RawInclude { text, angle }| (text, angle))
        .collect()
}

#[test]
fn extracts_angle_and_quote_forms_in_order() {
    let src = "#include <a/b.h>\n// #include <ignored.h>\n/* #include <also_ignored.h> */\n#include \"local.h\"\n";
    let result = scan_bytes(src.as_bytes(), &ScanOptions::default());
    assert_eq!(
        result.includes,
        vec![
            RawInclude {
                text: "a/b.h".to_string(),
                angle: true
            },
            RawInclude {
                text: "local.h".to_string(),
                angle: false
            },
        ]
    );
    assert_eq!(result.loc, 4);
}

#[test]
fn empty_buffer_has_no_includes_and_zero_lines() {
    let result = scan_bytes(b"", &ScanOptions::default());
    assert!(result.includes.is_empty());
    assert_eq!(result.loc, 0);
}

#[test]
fn line_comment_suppresses_directive_mid_line() {
    // byte-driven, not line-start driven: the comment may open anywhere
    let src = "int x; // trailing #include <a.h>\n#include <b.h>\n";
    assert_eq!(scan(src), vec![("b.h".to_string(), true)]);
}

#[test]
fn block_comment_spanning_lines_is_skipped() {
    let src = "/* start\n#include <hidden.h>\nmore */ #include <seen.h>\n";
    assert_eq!(scan(src), vec![("seen.h".to_string(), true)]);
}

#[test]
fn import_directive_is_recognized() {
    let src = "#import <Foundation/Foundation.h>\n";
    assert_eq!(
        scan(src),
        vec![("Foundation/Foundation.h".to_string(), true)]
    );
}

#[test]
fn whitespace_between_hash_and_keyword_is_allowed() {
    let src = "#  include  <spaced.h>\n#\tinclude\t\"tabbed.h\"\n";
    assert_eq!(
        scan(src),
        vec![
            ("spaced.h".to_string(), true),
            ("tabbed.h".to_string(), false)
        ]
    );
}

#[test]
fn missing_delimiter_abandons_the_directive() {
    let src = "#include foo.h\n#include <ok.h>\n";
    assert_eq!(scan(src), vec![("ok.h".to_string(), true)]);
}

#[test]
fn newline_inside_bracket_abandons_the_directive() {
    let src = "#include <broken.h\n#include \"fine.h\"\n";
    assert_eq!(scan(src), vec![("fine.h".to_string(), false)]);
}

#[test]
fn other_directives_are_ignored() {
    let src = "#pragma once\n#define FOO 1\n#include <real.h>\n#ifdef FOO\n#endif\n";
    assert_eq!(scan(src), vec![("real.h".to_string(), true)]);
}

#[test]
fn guarded_header_scans_identically_with_and_without_fast_path() {
    let src = "#ifndef GUARD_H\n#define GUARD_H\n#include <dep/one.h>\n#include \"two.h\"\nstruct S {};\n#endif\n";
    let fast = scan_bytes(src.as_bytes(), &ScanOptions::default());
    let full = scan_bytes(
        src.as_bytes(),
        &ScanOptions {
            final_guard_fast_path: false,
        },
    );
    assert_eq!(fast, full);
    assert_eq!(fast.includes.len(), 2);
}

#[test]
fn lone_endif_yields_nothing() {
    assert!(scan("#endif\n").is_empty());
    assert!(scan("#endif").is_empty());
}

#[test]
fn final_line_without_newline_still_counts() {
    let result = scan_bytes(b"#include <a.h>\nint x;", &ScanOptions::default());
    assert_eq!(result.loc, 2);
    assert_eq!(result.includes.len(), 1);
}

#[test]
fn duplicate_directives_are_both_emitted() {
    // collapsing duplicates is the file record's concern, not the scanner's
    let src = "#include <a.h>\n#include <a.h>\n";
    assert_eq!(scan(src).len(), 2);
}
