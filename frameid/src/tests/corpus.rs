use hashbrown::HashMap;

use crate::graph::*;
use crate::report;
use crate::test_utils::{hashmap, load_graphs};

const PARSES: &str = include_str!("./resources/toy.all.lemma.tags");
const FRAME_ELEMENTS: &str = include_str!("./resources/toy.frame.elements");

fn roles(g: &DependencyGraph) -> HashMap<NodeId, &str> {
    g.nodes()
        .filter_map(|(id, n)| n.role().map(|r| (id, r)))
        .collect()
}

/// トイコーパスのグラフ構築
#[test]
fn test_load_toy_corpus() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    // the annotation of the malformed fifth sentence is dropped
    assert_eq!(4, graphs.len());
    for (i, g) in graphs.iter().enumerate() {
        assert_eq!(Some(i), g.gid());
    }
    let frames: Vec<&str> = graphs
        .iter()
        .map(|g| g.predicate().unwrap().frame())
        .collect();
    assert_eq!(vec!["Self_motion", "Self_motion", "Placing", "Motion"], frames);
}

#[test]
fn test_roles_on_group_heads() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    assert_eq!(hashmap![1 => "Self_mover", 3 => "Goal"], roles(&graphs[0]));
    // "to school" is headed by the preposition
    assert_eq!(hashmap![1 => "Theme", 3 => "Goal"], roles(&graphs[3]));
}

#[test]
fn test_multiword_predicate_offsets_are_unrolled() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let placing = graphs[2].predicate().unwrap();
    assert_eq!(&[2, 3, 4], placing.nodes());
    assert_eq!(2, placing.head());
    assert_eq!(vec!["put", "it", "down"], graphs[2].predicate_node_words());
}

#[test]
fn test_paths_in_loaded_graph() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let g = &graphs[3];
    assert_eq!("school", g.get_node_label(3).unwrap());
    let map = g.path_map();
    assert_eq!(Some("prep_to->pobj"), map.get(2, 4));
    assert_eq!(Some(vec![4]), map.find_nodes(2, "prep_to->pobj"));
    assert_eq!(Some(vec![1]), map.find_nodes(2, "nsubj"));
    assert_eq!(None, map.find_nodes(2, "dobj"));
}

#[test]
fn test_corpus_echo() {
    let graphs = load_graphs(PARSES, FRAME_ELEMENTS);
    let mut out = vec![];
    report::write_corpus(&mut out, &graphs[1..2]).unwrap();
    let expected = "\
1\t1\tMary\t2\tnsubj\tSelf_mover\t_
1\t2\truns\t0\troot\t_\tSelf_motion

";
    assert_eq!(expected, String::from_utf8(out).unwrap());
}
