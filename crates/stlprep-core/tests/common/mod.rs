#![allow(dead_code)]

/// One triangle facet, seven lines, vertices offset by `o`.
pub fn facet(o: f64) -> String {
    format!(
        "  facet normal 0 0 1\n    outer loop\n      vertex {x0} {y0} 0\n      vertex {x1} {y0} 0\n      vertex {x0} {y1} 0\n    endloop\n  endfacet\n",
        x0 = o,
        y0 = o,
        x1 = o + 1.0,
        y1 = o + 1.0,
    )
}

pub fn solid(name: &str, facets: usize, offset: f64) -> String {
    let mut s = format!("solid {name}\n");
    for i in 0..facets {
        s.push_str(&facet(offset + i as f64));
    }
    s.push_str(&format!("endsolid {name}\n"));
    s
}

/// Raw export shape: one solid per surface id.
pub fn surfaces(ids: &[u32]) -> String {
    ids.iter()
        .map(|&id| solid(&format!("surface_{id}"), 2, id as f64))
        .collect()
}
