mod common;

use stlprep_core::naming::SuffixTokenResolver;
use stlprep_core::reassemble::{reassemble, reassemble_file, MergePolicy, ReassembleOutcome};
use stlprep_core::stl::StlDocument;
use stlprep_core::StlError;

fn three_surfaces() -> String {
    common::surfaces(&[1, 3, 5])
}

#[test]
fn merge_wraps_all_facets_in_one_solid() {
    let doc = StlDocument::from_text(&three_surfaces());
    let blocks = doc.solids().unwrap();
    let interior: usize = blocks.iter().map(|b| b.interior_len()).sum();

    let out = reassemble(&doc, &blocks, MergePolicy::MERGE, "wall");
    let merged = StlDocument::from_text(&out);
    let merged_blocks = merged.solids().unwrap();

    assert_eq!(1, merged_blocks.len());
    assert_eq!("wall", merged_blocks[0].name);
    assert_eq!(interior, merged_blocks[0].interior_len());
    assert!(out.starts_with("solid wall\n"));
    assert!(out.ends_with("endsolid wall\n"));
    assert!(!out.contains("surface_3"));
    assert_eq!(doc.vertices().unwrap(), merged.vertices().unwrap());
}

#[test]
#[should_panic]
fn blocks_from_another_document_panic() {
    let long = StlDocument::from_text(&three_surfaces());
    let short = StlDocument::from_text("solid a\nendsolid a\n");
    let blocks = long.solids().unwrap();
    reassemble(&short, &blocks, MergePolicy::MERGE, "wall");
}

#[test]
fn keep_mode_preserves_blocks_byte_for_byte() {
    let text = three_surfaces();
    let doc = StlDocument::from_text(&text);
    let blocks = doc.solids().unwrap();

    let out = reassemble(&doc, &blocks, MergePolicy::KEEP, "ignored");
    assert_eq!(text, out);

    let again = StlDocument::from_text(&out).solids().unwrap();
    assert_eq!(blocks, again);
}

#[test]
fn keep_mode_drops_text_between_blocks() {
    let text = format!("{}stray line\n{}", common::solid("a", 1, 0.0), common::solid("b", 1, 1.0));
    let doc = StlDocument::from_text(&text);
    let out = reassemble(&doc, &doc.solids().unwrap(), MergePolicy::KEEP, "x");
    assert!(!out.contains("stray"));
    let names: Vec<_> = StlDocument::from_text(&out)
        .solids()
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(vec!["a", "b"], names);
}

#[test]
fn file_reassembly_names_solid_from_filename_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bc_wall_pre_formatted.stl");
    let target = dir.path().join("bc_wall.stl");
    std::fs::write(&source, three_surfaces()).unwrap();
    let resolver = SuffixTokenResolver::default();

    let outcome = reassemble_file(&source, &target, MergePolicy::MERGE, &resolver).unwrap();
    match outcome {
        ReassembleOutcome::Written {
            solid_name,
            source_solids,
            ..
        } => {
            assert_eq!("wall", solid_name);
            assert_eq!(vec!["surface_1", "surface_3", "surface_5"], source_solids);
        }
        ReassembleOutcome::NoSolids => panic!("expected output"),
    }
    let first = std::fs::read(&target).unwrap();

    reassemble_file(&source, &target, MergePolicy::MERGE, &resolver).unwrap();
    let second = std::fs::read(&target).unwrap();
    assert_eq!(first, second);
}

#[test]
fn overwrites_existing_target() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bc_inlet_pre_formatted.stl");
    let target = dir.path().join("bc_inlet.stl");
    std::fs::write(&source, common::surfaces(&[4])).unwrap();
    std::fs::write(&target, "old content that is much longer than nothing\n".repeat(100)).unwrap();

    reassemble_file(&source, &target, MergePolicy::MERGE, &SuffixTokenResolver::default()).unwrap();
    let text = std::fs::read_to_string(&target).unwrap();
    assert!(!text.contains("old content"));
    assert!(text.starts_with("solid inlet\n"));
}

#[test]
fn no_solids_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bc_outlet_pre_formatted.stl");
    let target = dir.path().join("bc_outlet.stl");
    std::fs::write(&source, "").unwrap();

    let outcome =
        reassemble_file(&source, &target, MergePolicy::MERGE, &SuffixTokenResolver::default())
            .unwrap();
    assert_eq!(ReassembleOutcome::NoSolids, outcome);
    assert!(!target.exists());
}

#[test]
fn malformed_source_leaves_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bc_wall_pre_formatted.stl");
    let target = dir.path().join("bc_wall.stl");
    std::fs::write(&source, "solid a\nsolid b\nendsolid b\n").unwrap();
    std::fs::write(&target, "previous\n").unwrap();

    let err = reassemble_file(&source, &target, MergePolicy::MERGE, &SuffixTokenResolver::default())
        .unwrap_err();
    assert!(matches!(err, StlError::UnbalancedSolids { .. }));
    assert_eq!("previous\n", std::fs::read_to_string(&target).unwrap());
}

#[test]
fn custom_resolver_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("my-inlet.stl");
    let target = dir.path().join("out.stl");
    std::fs::write(&source, common::surfaces(&[2])).unwrap();

    let resolver = |name: &str| -> Result<String, StlError> {
        Ok(name.trim_end_matches(".stl").replace('-', "_"))
    };
    reassemble_file(&source, &target, MergePolicy::MERGE, &resolver).unwrap();
    assert!(std::fs::read_to_string(&target).unwrap().starts_with("solid my_inlet\n"));
}
