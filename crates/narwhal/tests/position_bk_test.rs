use narwhal::layering::LinkKind;
use narwhal::position::bk::{
    BlockForest, SlotLink, find_alignable_links, horizontal_compaction, vertical_alignment,
};

fn regular(upper: usize, lower: usize) -> SlotLink {
    SlotLink::new(upper, lower, LinkKind::Regular)
}

/// Positions for rows laid out as consecutive slot ranges.
fn positions(rows: &[Vec<usize>]) -> Vec<usize> {
    let n = rows.iter().map(Vec::len).sum();
    let mut pos = vec![0; n];
    for row in rows {
        for (i, &s) in row.iter().enumerate() {
            pos[s] = i;
        }
    }
    pos
}

#[test]
fn find_alignable_links_keeps_the_first_of_two_equal_crossing_links() {
    let pos = positions(&[vec![0, 1], vec![2, 3]]);
    let kept = find_alignable_links(&[regular(1, 2), regular(0, 3)], &pos);
    assert_eq!(kept, vec![regular(0, 3)]);
}

#[test]
fn find_alignable_links_prefers_stronger_kinds() {
    let pos = positions(&[vec![0, 1], vec![2, 3]]);
    let structural = SlotLink::new(1, 2, LinkKind::Structural);
    let kept = find_alignable_links(&[regular(0, 3), structural], &pos);
    assert_eq!(kept, vec![structural]);

    let inner = SlotLink::new(0, 3, LinkKind::InnerSegment);
    let kept = find_alignable_links(&[inner, regular(1, 2)], &pos);
    assert_eq!(kept, vec![inner]);
}

#[test]
fn find_alignable_links_prefers_smaller_skew() {
    let pos = positions(&[vec![0, 1, 2], vec![3, 4, 5]]);
    let kept = find_alignable_links(&[regular(0, 5), regular(1, 3)], &pos);
    assert_eq!(kept, vec![regular(1, 3)]);
}

#[test]
fn find_alignable_links_keeps_non_crossing_links() {
    let pos = positions(&[vec![0, 1, 2], vec![3, 4, 5]]);
    let links = [regular(2, 5), regular(0, 3), regular(1, 4)];
    let kept = find_alignable_links(&links, &pos);
    assert_eq!(kept, vec![regular(0, 3), regular(1, 4), regular(2, 5)]);
}

#[test]
fn vertical_alignment_chains_blocks_through_rows() {
    let rows = vec![vec![0, 1], vec![2, 3], vec![4, 5]];
    let pos = positions(&rows);
    let gaps = vec![
        vec![regular(0, 2), regular(1, 3)],
        vec![regular(2, 4), regular(3, 5)],
    ];
    let forest = vertical_alignment(6, &gaps, &pos);
    assert_eq!(forest.members(0), vec![0, 2, 4]);
    assert_eq!(forest.members(1), vec![1, 3, 5]);
    assert_eq!(forest.root(5), 1);
    assert!(forest.is_block_bottom(4));
    assert!(!forest.is_block_bottom(2));
    assert_eq!(forest.next(4), 0);
}

#[test]
fn vertical_alignment_aligns_each_port_once() {
    let rows = vec![vec![0], vec![1, 2]];
    let pos = positions(&rows);
    let forest = vertical_alignment(3, &[vec![regular(0, 1), regular(0, 2)]], &pos);
    assert_eq!(forest.members(0), vec![0, 1]);
    assert!(forest.is_unaligned(2));
}

#[test]
fn horizontal_compaction_packs_blocks_leftwards() {
    let rows = vec![vec![0, 1], vec![2, 3]];
    let pos = positions(&rows);
    let mut forest = vertical_alignment(4, &[vec![regular(0, 2), regular(1, 3)]], &pos);
    let xs = horizontal_compaction(&mut forest, &rows, |_, _| 10.0);
    assert_eq!(xs, vec![0.0, 10.0, 0.0, 10.0]);
}

#[test]
fn horizontal_compaction_pulls_a_block_right_of_its_widest_neighbour() {
    // Slot 0 sits above slot 2; slot 1 in the lower row forces the block right.
    let rows = vec![vec![0], vec![1, 2]];
    let pos = positions(&rows);
    let mut forest = vertical_alignment(3, &[vec![regular(0, 2)]], &pos);
    let xs = horizontal_compaction(&mut forest, &rows, |_, _| 10.0);
    assert_eq!(xs, vec![10.0, 0.0, 10.0]);
}

#[test]
fn horizontal_compaction_shifts_classes_against_each_other() {
    // Block {1, 4} first meets slot 0 in the upper row, then the class of slots 2 and 3 in the
    // lower row; that class is shifted left so both rows stay packed.
    let rows = vec![vec![0, 1], vec![2, 3, 4]];
    let pos = positions(&rows);
    let mut forest = vertical_alignment(5, &[vec![regular(1, 4)]], &pos);
    let xs = horizontal_compaction(&mut forest, &rows, |_, _| 10.0);
    assert_eq!(xs, vec![0.0, 10.0, -10.0, 0.0, 10.0]);
}

#[test]
fn horizontal_compaction_uses_pairwise_separation() {
    let rows = vec![vec![0, 1, 2]];
    let mut forest = BlockForest::new(3);
    let xs = horizontal_compaction(&mut forest, &rows, |a, _| if a == 0 { 4.0 } else { 7.0 });
    assert_eq!(xs, vec![0.0, 4.0, 11.0]);
}
