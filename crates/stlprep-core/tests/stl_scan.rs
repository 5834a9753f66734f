mod common;

use stlprep_core::stl::{parse_vertex, SolidBlock, StlDocument};
use stlprep_core::StlError;

#[test]
fn finds_solids_in_source_order() {
    let text = format!(
        "{}{}{}",
        common::solid("surface 1", 1, 0.0),
        common::solid("surface 2", 3, 5.0),
        common::solid("wall", 2, -2.0)
    );
    let doc = StlDocument::from_text(&text);
    let blocks = doc.solids().unwrap();

    let names: Vec<_> = blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(vec!["surface 1", "surface 2", "wall"], names);
    assert_eq!(0, blocks[0].start_line);
    assert_eq!(8, blocks[0].end_line);
    assert_eq!(9, blocks[1].start_line);
    assert_eq!(7, blocks[0].interior_len());
    assert_eq!(21, blocks[1].interior_len());
}

#[test]
fn solid_name_drops_crlf() {
    let doc = StlDocument::from_text("solid inlet\r\nendsolid inlet\r\n");
    let blocks = doc.solids().unwrap();
    assert_eq!("inlet", blocks[0].name);
    assert_eq!(0, blocks[0].interior_len());
}

#[test]
fn markers_need_the_trailing_space() {
    // `solidity` and indented markers are not boundaries.
    let doc = StlDocument::from_text("solidity\n  solid a\n  endsolid a\n");
    assert!(doc.solids().unwrap().is_empty());
}

#[test]
fn empty_input_has_no_solids_and_no_vertices() {
    let doc = StlDocument::from_text("");
    assert!(doc.is_empty());
    assert!(doc.solids().unwrap().is_empty());
    assert!(doc.vertices().unwrap().is_empty());
}

#[test]
fn unbalanced_markers_are_errors() {
    let doc = StlDocument::from_text("solid a\nsolid b\nendsolid b\n");
    assert!(matches!(
        doc.solids(),
        Err(StlError::UnbalancedSolids { starts: 2, ends: 1 })
    ));
}

#[test]
fn nested_blocks_are_errors() {
    let doc = StlDocument::from_text("solid a\nsolid b\nendsolid b\nendsolid a\n");
    assert!(matches!(
        doc.solids(),
        Err(StlError::OverlappingSolids { start: 1, next: 2, .. })
    ));
}

#[test]
fn end_before_start_is_an_error() {
    let doc = StlDocument::from_text("endsolid a\nsolid a\n");
    assert!(matches!(doc.solids(), Err(StlError::OrphanEnd { line: 1 })));
}

#[test]
fn collects_vertices_anywhere() {
    let text = format!("{}junk\n{}", common::solid("a", 1, 0.0), common::solid("b", 1, 10.0));
    let vertices = StlDocument::from_text(&text).vertices().unwrap();
    assert_eq!(6, vertices.len());
    assert_eq!(11.0, vertices[4].x);
    assert_eq!(10.0, vertices[4].y);
}

#[test]
fn vertex_lines_parse_as_f64() {
    let v = parse_vertex("   vertex 1.5e-3 -2 3.25\n", 1).unwrap().unwrap();
    assert_eq!(0.0015, v.x);
    assert_eq!(-2.0, v.y);
    assert_eq!(3.25, v.z);

    assert_eq!(None, parse_vertex("outer loop\n", 2).unwrap());
}

#[test]
fn malformed_vertex_reports_line() {
    let doc = StlDocument::from_text("solid a\n vertex 1 2\nendsolid a\n");
    match doc.vertices() {
        Err(StlError::MalformedVertex { line, text }) => {
            assert_eq!(2, line);
            assert_eq!(" vertex 1 2", text);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(parse_vertex("vertex a b c", 7).is_err());
}

#[test]
fn non_finite_coordinates_are_malformed() {
    for line in ["vertex inf 0 0", "vertex nan 0 0", "vertex 1 -inf 2", "vertex 1 2 NaN"] {
        assert!(
            matches!(parse_vertex(line, 3), Err(StlError::MalformedVertex { line: 3, .. })),
            "{line}"
        );
    }

    // A file of only nan vertices is malformed, not empty.
    let doc = StlDocument::from_text("solid a\n vertex nan nan nan\nendsolid a\n");
    assert!(matches!(doc.vertices(), Err(StlError::MalformedVertex { line: 2, .. })));
}

#[test]
fn interior_len_of_degenerate_block_is_zero() {
    let backwards = SolidBlock {
        name: "a".to_string(),
        start_line: 5,
        end_line: 2,
    };
    assert_eq!(0, backwards.interior_len());

    let same_line = SolidBlock {
        name: "a".to_string(),
        start_line: 4,
        end_line: 4,
    };
    assert_eq!(0, same_line.interior_len());
}
