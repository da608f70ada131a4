pub mod zigzag_graph;
