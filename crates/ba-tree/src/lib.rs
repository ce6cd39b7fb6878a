//! The lazily-materialized Dirichlet tree: a Bayesian prior/posterior over
//! ranked ballots, represented as an arena of sparsely-visited nodes rather
//! than a fully-enumerated permutation tree.

mod node;
mod sampling;
mod tree;

pub use node::NodeId;
pub use node::TreeNode;
pub use sampling::draw_theta;
pub use sampling::multinomial_stick_break;
pub use tree::DirichletTree;
