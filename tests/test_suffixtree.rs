#[cfg(test)]
mod test_suffixtree {

    use std::collections::HashSet;

    use suggest_rs::suffixtree::tree::SuffixTree;

    fn set_of(values: &[&'static str]) -> HashSet<&'static str> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_single_sequence() {
        // tokens a=0, b=1, c=2
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&[0, 1, 2], "doc1");

        assert_eq!(tree.retrieve(&[1, 2]), set_of(&["doc1"]));
        assert_eq!(tree.retrieve(&[2, 1]), set_of(&[]));
        assert_eq!(tree.retrieve(&[]), set_of(&[]));
    }

    #[test]
    fn test_union_on_shared_substrings() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&[0, 1, 2], "doc1");
        tree.insert(&[1, 2, 0], "doc2");

        assert_eq!(tree.retrieve(&[1, 2]), set_of(&["doc1", "doc2"]));
        // 0 appears in both sequences
        assert_eq!(tree.retrieve(&[0]), set_of(&["doc1", "doc2"]));
        assert_eq!(tree.retrieve(&[2, 0]), set_of(&["doc2"]));
        assert_eq!(tree.retrieve(&[0, 1, 2]), set_of(&["doc1"]));
    }

    #[test]
    fn test_containment_of_every_window() {
        let sequence: Vec<u32> = vec![0, 1, 2, 0, 1, 3];
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&sequence, "doc1");

        for start in 0..sequence.len() {
            for end in (start + 1)..=sequence.len() {
                let window = &sequence[start..end];
                assert!(
                    tree.retrieve(window).contains("doc1"),
                    "window {:?} not found",
                    window
                );
            }
        }
    }

    #[test]
    fn test_non_containment() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&[0, 1, 2, 0, 1, 3], "doc1");

        assert!(tree.retrieve(&[3, 1]).is_empty());
        assert!(tree.retrieve(&[2, 1]).is_empty());
        assert!(tree.retrieve(&[4]).is_empty());
        assert!(tree.retrieve(&[0, 1, 3, 0]).is_empty());
    }

    #[test]
    fn test_idempotent_insert() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);

        tree.insert(&[0, 1, 2], "doc1");
        tree.compute_stats();
        let first_pass = tree.stats.clone();

        tree.insert(&[0, 1, 2], "doc1");
        tree.compute_stats();

        // no structural duplication of edges and no duplicate values
        assert_eq!(tree.stats, first_pass);
        assert_eq!(tree.retrieve(&[1, 2]), set_of(&["doc1"]));
    }

    #[test]
    fn test_min_query_len_threshold() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(2);
        tree.insert(&[0, 1, 2], "doc1");

        // below the threshold nothing is ever returned
        assert!(tree.retrieve(&[0]).is_empty());
        assert!(tree.retrieve(&[]).is_empty());

        assert_eq!(tree.retrieve(&[0, 1]), set_of(&["doc1"]));
    }

    #[test]
    fn test_empty_sequence_is_noop() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&[], "doc1");
        tree.compute_stats();

        // only the root exists
        assert_eq!(tree.stats.num_nodes, 1);
        assert!(tree.retrieve(&[0]).is_empty());
    }

    #[test]
    fn test_stats() {
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);

        tree.insert(&[0, 1, 2], "doc1");
        tree.compute_stats();

        // three distinct tokens: one leaf per suffix, nothing to split
        assert_eq!(tree.stats.num_nodes, 4);
        assert_eq!(tree.stats.num_leaves, 3);
        assert_eq!(tree.stats.num_internal, 0);

        tree.insert(&[1, 2, 0], "doc2");
        tree.compute_stats();

        println!("{}", tree);

        assert_eq!(tree.stats.num_nodes, 7);
        assert_eq!(tree.stats.num_internal, 3);
        assert_eq!(tree.stats.num_leaves, 3);
        assert_eq!(tree.stats.max_token_depth, 2);
        assert_eq!(tree.stats.average_token_depth, 4.0 / 3.0);
    }

    #[test]
    fn test_many_sequences() {
        let mut tree: SuffixTree<u32> = SuffixTree::new(1);
        tree.insert(&[10, 11, 12, 13], 1);
        tree.insert(&[11, 12, 14], 2);
        tree.insert(&[12, 13, 14, 15], 3);

        assert_eq!(tree.retrieve(&[11, 12]), [1, 2].into_iter().collect());
        assert_eq!(tree.retrieve(&[12, 13]), [1, 3].into_iter().collect());
        assert_eq!(tree.retrieve(&[12]), [1, 2, 3].into_iter().collect());
        assert_eq!(tree.retrieve(&[13, 14]), [3].into_iter().collect());
        assert_eq!(tree.retrieve(&[14, 15]), [3].into_iter().collect());
        assert!(tree.retrieve(&[15, 14]).is_empty());
        assert!(tree.retrieve(&[10, 12]).is_empty());
    }

    #[test]
    fn test_repeated_tokens() {
        // b a n a n a as 0 1 2 1 2 1, plus a second sentence sharing "ana"
        let mut tree: SuffixTree<&str> = SuffixTree::new(1);
        tree.insert(&[0, 1, 2, 1, 2, 1], "banana");
        tree.insert(&[1, 2, 1, 0], "anab");

        assert_eq!(tree.retrieve(&[1, 2, 1]), set_of(&["banana", "anab"]));
        assert_eq!(tree.retrieve(&[2, 1, 2]), set_of(&["banana"]));
        assert_eq!(tree.retrieve(&[1, 0]), set_of(&["anab"]));
        assert_eq!(tree.retrieve(&[0, 1, 2, 1, 2, 1]), set_of(&["banana"]));
        assert!(tree.retrieve(&[0, 0]).is_empty());
    }
}
