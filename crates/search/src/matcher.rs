use metagraph_graph::{NodeIndex, SchemaGraph};
use std::collections::BTreeSet;

/// Finds nodes whose id contains a keyword, case-insensitively
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMatcher;

/// Adds the direct neighbors of matched nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborExpander;

impl NodeMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn find_matches<S: AsRef<str>>(&self, graph: &SchemaGraph, keywords: &[S]) -> BTreeSet<NodeIndex> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return BTreeSet::new();
        }

        graph
            .nodes()
            .filter(|(_, node)| {
                let haystack = node.id.to_lowercase();
                keywords.iter().any(|k| haystack.contains(k.as_str()))
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl NeighborExpander {
    pub fn new() -> Self {
        Self
    }

    /// Matches plus their one-hop neighbors; no further traversal
    pub fn expand(&self, graph: &SchemaGraph, matches: &BTreeSet<NodeIndex>) -> BTreeSet<NodeIndex> {
        let mut relevant = matches.clone();
        for &node in matches {
            relevant.extend(graph.neighbors(node));
        }
        relevant
    }
}

/// Relevant node ids for a keyword list: direct matches and their neighbors
pub fn retrieve<S: AsRef<str>>(graph: &SchemaGraph, keywords: &[S]) -> BTreeSet<String> {
    let matches = NodeMatcher::new().find_matches(graph, keywords);
    let relevant = NeighborExpander::new().expand(graph, &matches);
    ids(graph, &relevant)
}

pub(crate) fn ids(graph: &SchemaGraph, nodes: &BTreeSet<NodeIndex>) -> BTreeSet<String> {
    nodes
        .iter()
        .filter_map(|&idx| graph.get_node(idx))
        .map(|node| node.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metagraph_graph::{ForeignKey, GraphBuilder, SchemaModel, TableInfo};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn chain_graph() -> SchemaGraph {
        // Invoices.OrderRef -> Orders.OrderID, Orders.CustomerRef -> Customers.CustomerID
        let schema = SchemaModel::new()
            .with_table("Invoices", TableInfo::new().column("InvoiceID", "INTEGER").column("OrderRef", "INTEGER"))
            .with_table("Orders", TableInfo::new().column("OrderID", "INTEGER").column("CustomerRef", "TEXT"))
            .with_table("Customers", TableInfo::new().column("CustomerID", "TEXT").column("Region", "TEXT"))
            .with_relationship(ForeignKey::new("Invoices", "OrderRef", "Orders", "OrderID"))
            .with_relationship(ForeignKey::new("Orders", "CustomerRef", "Customers", "CustomerID"));
        GraphBuilder::new().build(&schema).unwrap()
    }

    #[test]
    fn test_substring_matching_is_case_insensitive() {
        let graph = chain_graph();
        let matches = NodeMatcher::new().find_matches(&graph, &["REGION"]);
        assert_eq!(ids(&graph, &matches), set(&["Customers.Region"]));
    }

    #[test]
    fn test_keyword_matches_tables_and_columns() {
        let graph = chain_graph();
        let matches = NodeMatcher::new().find_matches(&graph, &["order"]);
        assert_eq!(
            ids(&graph, &matches),
            set(&["Invoices.OrderRef", "Orders", "Orders.CustomerRef", "Orders.OrderID"])
        );
    }

    #[test]
    fn test_expansion_is_exactly_one_hop() {
        let graph = chain_graph();

        // Region -> Customers; Customers' other column is two hops away
        let relevant = retrieve(&graph, &["region"]);
        assert_eq!(relevant, set(&["Customers", "Customers.Region"]));

        // InvoiceID -> Invoices; Invoices.OrderRef and its FK target stay out
        let relevant = retrieve(&graph, &["invoiceid"]);
        assert_eq!(relevant, set(&["Invoices", "Invoices.InvoiceID"]));
    }

    #[test]
    fn test_column_match_pulls_fk_partner_and_table() {
        let graph = chain_graph();
        let relevant = retrieve(&graph, &["orderref"]);
        assert_eq!(relevant, set(&["Invoices", "Invoices.OrderRef", "Orders.OrderID"]));
        assert!(!relevant.contains("Orders"));
    }

    #[test]
    fn test_empty_keywords_give_empty_set() {
        let graph = chain_graph();
        let none: [&str; 0] = [];
        assert!(retrieve(&graph, &none).is_empty());
        assert!(retrieve(&graph, &[""]).is_empty());
    }

    #[test]
    fn test_unmatched_keywords_give_empty_set() {
        assert!(retrieve(&chain_graph(), &["shipper", "zzz"]).is_empty());
    }

    fn arb_schema() -> impl Strategy<Value = SchemaModel> {
        let columns = prop::collection::btree_set("[a-c]{1,2}", 0..3);
        let tables = prop::collection::btree_map("[A-C][a-c]{0,1}", columns, 1..4);
        let fk = ("[A-C][a-c]{0,1}", "[a-c]{1,2}", "[A-C][a-c]{0,1}", "[a-c]{1,2}")
            .prop_map(|(ft, fc, tt, tc)| ForeignKey::new(ft, fc, tt, tc));
        (tables, prop::collection::vec(fk, 0..6)).prop_map(|(tables, relationships)| {
            let mut schema = SchemaModel::new();
            for (name, columns) in tables {
                let info = columns
                    .into_iter()
                    .fold(TableInfo::new(), |info, col| info.column(col, "TEXT"));
                schema = schema.with_table(name, info);
            }
            schema.relationships = relationships;
            schema
        })
    }

    proptest! {
        #[test]
        fn proptest_relevant_set_is_matches_plus_one_hop(
            schema in arb_schema(),
            keyword in "[a-cA-C.]{1,3}",
        ) {
            let graph = GraphBuilder::new().build(&schema).unwrap();
            let matches = NodeMatcher::new().find_matches(&graph, &[keyword.as_str()]);
            let relevant = NeighborExpander::new().expand(&graph, &matches);

            let mut expected = matches.clone();
            for edge in graph.edges() {
                if matches.contains(&edge.source) {
                    expected.insert(edge.target);
                }
                if matches.contains(&edge.target) {
                    expected.insert(edge.source);
                }
            }
            prop_assert_eq!(&relevant, &expected);

            for (idx, node) in graph.nodes() {
                let is_match = node.id.to_lowercase().contains(&keyword.to_lowercase());
                prop_assert_eq!(matches.contains(&idx), is_match);
            }
        }
    }
}
